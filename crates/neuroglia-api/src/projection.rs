// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Projections
//!
//! A projection is the container for all connections of a given type between
//! two populations. The connector object passed at construction does the
//! actual wiring; the resulting sparse weight matrix is registered with the
//! backend network and shared immutably with this handle.
//!
//! This backend fixes weights and delays entirely at connector-construction
//! time and has no dynamic synapse models. The mutation methods exist to
//! fulfil the neutral API contract and always fail with a descriptive
//! error; `save_connections`, `print_weights` and `weight_histogram` are
//! unimplemented rather than unsupported.

use std::path::Path;
use std::sync::Arc;

use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use neuroglia_engine::{CellId, ConnectionMatrix, MatrixId};
use neuroglia_neural::SynapticTarget;

use crate::connectors::Connector;
use crate::error::{ApiError, Result};
use crate::population::Population;
use crate::simulation::Simulation;

/// Descriptor for short- or long-term synaptic plasticity mechanisms.
///
/// This backend supports none; passing one to [`Projection::new`] is an
/// unsupported-operation error.
#[derive(Debug, Clone)]
pub struct SynapseDynamics {
    pub description: String,
}

/// Optional projection construction arguments
#[derive(Debug, Clone, Default)]
pub struct ProjectionOptions {
    /// Presynaptic signal port; `None` means the spike output
    pub source: Option<String>,
    /// Postsynaptic target port; `None` means `excitatory`
    pub target: Option<String>,
    /// Must be `None` for this backend
    pub synapse_dynamics: Option<SynapseDynamics>,
    pub label: Option<String>,
    /// Seed for the connector RNG; derived from the label when absent
    pub seed: Option<u64>,
}

/// One connection's descriptor, yielded by [`Projection::connections`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Position in the projection, `0..len`
    pub index: usize,
    pub source: CellId,
    pub target: CellId,
    pub weight: f64,
    /// Homogeneous projection delay in ms
    pub delay: f64,
}

/// Directed synaptic connections between two populations
#[derive(Debug)]
pub struct Projection {
    label: String,
    source_port: String,
    target: SynapticTarget,
    matrix: Arc<ConnectionMatrix>,
    matrix_id: MatrixId,
    pre_first: CellId,
    post_first: CellId,
    /// Connection count reported by the connector at build time
    nconn: usize,
}

impl Projection {
    /// Wire `pre` to `post` using `method`, register the resulting matrix
    /// with the backend network, and return the projection handle.
    pub fn new(
        sim: &mut Simulation,
        pre: &Population,
        post: &Population,
        method: &dyn Connector,
        options: ProjectionOptions,
    ) -> Result<Self> {
        if let Some(dynamics) = &options.synapse_dynamics {
            return Err(ApiError::Unsupported(format!(
                "dynamic synapses are not supported by this backend (requested: {})",
                dynamics.description
            )));
        }
        let target = SynapticTarget::from_port(options.target.as_deref())?;
        let source_port = options.source.unwrap_or_else(|| "spikes".to_string());
        let label = options
            .label
            .unwrap_or_else(|| format!("{}->{}", pre.label(), post.label()));

        let seed = options
            .seed
            .unwrap_or_else(|| label.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64)));
        let mut rng = StdRng::seed_from_u64(seed);

        let triplets = method.build(pre, post, &mut rng)?;
        let nconn = triplets.len();
        let delay_ms = method.delay().unwrap_or_else(|| sim.get_min_delay());
        let matrix = ConnectionMatrix::from_triplets(
            pre.group_id(),
            post.group_id(),
            pre.size(),
            post.size(),
            target,
            delay_ms,
            sim.net().state(),
            &triplets,
        )?;
        let (matrix_id, matrix) = sim.net_mut().add_matrix(matrix)?;
        debug!(
            label = %label,
            nconn,
            nnz = matrix.nnz(),
            delay_ms,
            target = target.port_name(),
            "projection created"
        );
        Ok(Self {
            label,
            source_port,
            target,
            matrix,
            matrix_id,
            pre_first: pre.first_id(),
            post_first: post.first_id(),
            nconn,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source_port(&self) -> &str {
        &self.source_port
    }

    pub fn target(&self) -> SynapticTarget {
        self.target
    }

    pub fn matrix_id(&self) -> MatrixId {
        self.matrix_id
    }

    /// Connection count reported by the connector, including entries later
    /// dropped for having zero weight.
    pub fn connection_count(&self) -> usize {
        self.nconn
    }

    /// Homogeneous delay of every connection, in ms.
    pub fn delay(&self) -> f64 {
        self.matrix.delay_ms()
    }

    /// Total number of stored (non-zero) connections.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.matrix.nnz()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.nnz() == 0
    }

    /// Iterate the connection descriptors, indexed `0..len`.
    ///
    /// The sequence is lazy and finite; restart it by calling the method
    /// again.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        let delay = self.matrix.delay_ms();
        self.matrix
            .iter()
            .enumerate()
            .map(move |(index, (pre_idx, post_idx, weight))| Connection {
                index,
                source: CellId(self.pre_first.0 + pre_idx),
                target: CellId(self.post_first.0 + post_idx),
                weight,
                delay,
            })
    }

    // --- Mutation operations: unsupported by this backend -----------------

    /// Always fails: weights are baked into the connector step.
    pub fn set_weights(&mut self, _w: f64) -> Result<()> {
        Err(ApiError::Unsupported(
            "weights must be specified in the connector object and cannot be changed afterwards"
                .to_string(),
        ))
    }

    /// Always fails: weights are baked into the connector step.
    pub fn randomize_weights<D: Distribution<f64>>(&mut self, _rand_distr: D) -> Result<()> {
        Err(ApiError::Unsupported(
            "weights must be specified in the connector object and cannot be changed afterwards"
                .to_string(),
        ))
    }

    /// Always fails: delays are baked into the connector step.
    pub fn set_delays(&mut self, _d: f64) -> Result<()> {
        Err(ApiError::Unsupported(
            "delays must be specified in the connector object and cannot be changed afterwards"
                .to_string(),
        ))
    }

    /// Always fails: this backend only supports homogeneous delays.
    pub fn randomize_delays<D: Distribution<f64>>(&mut self, _rand_distr: D) -> Result<()> {
        Err(ApiError::Unsupported(
            "non-homogeneous delays are not supported by this backend".to_string(),
        ))
    }

    /// Always fails: this backend has no dynamic synapse models.
    pub fn set_synapse_dynamics(&mut self, _param: &str, _value: f64) -> Result<()> {
        Err(ApiError::Unsupported(
            "dynamic synapses are not supported by this backend".to_string(),
        ))
    }

    /// Always fails: this backend has no dynamic synapse models.
    pub fn randomize_synapse_dynamics<D: Distribution<f64>>(
        &mut self,
        _param: &str,
        _rand_distr: D,
    ) -> Result<()> {
        Err(ApiError::Unsupported(
            "dynamic synapses are not supported by this backend".to_string(),
        ))
    }

    // --- File operations: not implemented yet ------------------------------

    /// Save connections in a form suitable for a from-file connector.
    pub fn save_connections(&self, _path: &Path, _gather: bool) -> Result<()> {
        Err(ApiError::NotImplemented("save_connections"))
    }

    /// Print synaptic weights to file.
    pub fn print_weights(&self, _path: &Path, _gather: bool) -> Result<()> {
        Err(ApiError::NotImplemented("print_weights"))
    }

    /// Histogram of synaptic weights.
    pub fn weight_histogram(
        &self,
        _min: Option<f64>,
        _max: Option<f64>,
        _nbins: usize,
    ) -> Result<Vec<usize>> {
        Err(ApiError::NotImplemented("weight_histogram"))
    }
}
