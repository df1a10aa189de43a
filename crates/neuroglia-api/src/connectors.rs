// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connectors
//!
//! A connector encapsulates a wiring strategy and is consumed by
//! [`Projection`](crate::projection::Projection) construction. Weights and
//! the (homogeneous) delay are specified on the connector, because this
//! backend bakes both into the connection matrix at build time.

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{ApiError, Result};
use crate::population::Population;

/// Weight specification: a fixed value or a uniform random range sampled
/// from the projection RNG per connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightSpec {
    Fixed(f64),
    Uniform { low: f64, high: f64 },
}

impl WeightSpec {
    pub fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            WeightSpec::Fixed(w) => *w,
            WeightSpec::Uniform { low, high } => rng.gen_range(*low..*high),
        }
    }
}

impl From<f64> for WeightSpec {
    fn from(w: f64) -> Self {
        WeightSpec::Fixed(w)
    }
}

/// A wiring strategy consumed by projection construction.
///
/// `build` returns `(pre_index, post_index, weight)` triplets over flat
/// row-major population indices; the projection turns them into the engine
/// matrix.
pub trait Connector: core::fmt::Debug {
    /// Connection delay in ms; `None` selects the simulation's min_delay.
    fn delay(&self) -> Option<f64>;

    fn build(
        &self,
        pre: &Population,
        post: &Population,
        rng: &mut StdRng,
    ) -> Result<Vec<(u32, u32, f64)>>;
}

/// Connect every presynaptic cell to every postsynaptic cell
#[derive(Debug, Clone)]
pub struct AllToAllConnector {
    weights: WeightSpec,
    delay: Option<f64>,
    allow_self_connections: bool,
}

impl AllToAllConnector {
    pub fn new(weights: impl Into<WeightSpec>, delay: Option<f64>) -> Self {
        Self {
            weights: weights.into(),
            delay,
            allow_self_connections: true,
        }
    }

    pub fn allow_self_connections(mut self, allow: bool) -> Self {
        self.allow_self_connections = allow;
        self
    }
}

impl Connector for AllToAllConnector {
    fn delay(&self) -> Option<f64> {
        self.delay
    }

    fn build(
        &self,
        pre: &Population,
        post: &Population,
        rng: &mut StdRng,
    ) -> Result<Vec<(u32, u32, f64)>> {
        let recurrent = pre.first_id() == post.first_id();
        let mut triplets = Vec::with_capacity(pre.size() * post.size());
        for i in 0..pre.size() as u32 {
            for j in 0..post.size() as u32 {
                if recurrent && !self.allow_self_connections && i == j {
                    continue;
                }
                triplets.push((i, j, self.weights.sample(rng)));
            }
        }
        Ok(triplets)
    }
}

/// Connect cell `i` of the presynaptic population to cell `i` of the
/// postsynaptic population; requires equal sizes.
#[derive(Debug, Clone)]
pub struct OneToOneConnector {
    weights: WeightSpec,
    delay: Option<f64>,
}

impl OneToOneConnector {
    pub fn new(weights: impl Into<WeightSpec>, delay: Option<f64>) -> Self {
        Self {
            weights: weights.into(),
            delay,
        }
    }
}

impl Connector for OneToOneConnector {
    fn delay(&self) -> Option<f64> {
        self.delay
    }

    fn build(
        &self,
        pre: &Population,
        post: &Population,
        rng: &mut StdRng,
    ) -> Result<Vec<(u32, u32, f64)>> {
        if pre.size() != post.size() {
            return Err(ApiError::SizeMismatch(format!(
                "one-to-one connector requires equal sizes, got {} ('{}') and {} ('{}')",
                pre.size(),
                pre.label(),
                post.size(),
                post.label()
            )));
        }
        Ok((0..pre.size() as u32)
            .map(|i| (i, i, self.weights.sample(rng)))
            .collect())
    }
}

/// Connect each pair with fixed probability `p`
#[derive(Debug, Clone)]
pub struct FixedProbabilityConnector {
    p_connect: f64,
    weights: WeightSpec,
    delay: Option<f64>,
    allow_self_connections: bool,
}

impl FixedProbabilityConnector {
    pub fn new(p_connect: f64, weights: impl Into<WeightSpec>, delay: Option<f64>) -> Self {
        Self {
            p_connect,
            weights: weights.into(),
            delay,
            allow_self_connections: true,
        }
    }

    pub fn allow_self_connections(mut self, allow: bool) -> Self {
        self.allow_self_connections = allow;
        self
    }
}

impl Connector for FixedProbabilityConnector {
    fn delay(&self) -> Option<f64> {
        self.delay
    }

    fn build(
        &self,
        pre: &Population,
        post: &Population,
        rng: &mut StdRng,
    ) -> Result<Vec<(u32, u32, f64)>> {
        if !(0.0..=1.0).contains(&self.p_connect) {
            return Err(ApiError::InvalidConnectionList {
                index: 0,
                reason: format!("connection probability {} outside [0, 1]", self.p_connect),
            });
        }
        let recurrent = pre.first_id() == post.first_id();
        let mut triplets = Vec::new();
        for i in 0..pre.size() as u32 {
            for j in 0..post.size() as u32 {
                if recurrent && !self.allow_self_connections && i == j {
                    continue;
                }
                if rng.gen::<f64>() < self.p_connect {
                    triplets.push((i, j, self.weights.sample(rng)));
                }
            }
        }
        Ok(triplets)
    }
}

/// Connect explicitly listed (pre_index, post_index, weight) triples
#[derive(Debug, Clone)]
pub struct FromListConnector {
    list: Vec<(usize, usize, f64)>,
    delay: Option<f64>,
}

impl FromListConnector {
    pub fn new(list: Vec<(usize, usize, f64)>, delay: Option<f64>) -> Self {
        Self { list, delay }
    }
}

impl Connector for FromListConnector {
    fn delay(&self) -> Option<f64> {
        self.delay
    }

    fn build(
        &self,
        pre: &Population,
        post: &Population,
        _rng: &mut StdRng,
    ) -> Result<Vec<(u32, u32, f64)>> {
        let mut triplets = Vec::with_capacity(self.list.len());
        for (index, &(i, j, weight)) in self.list.iter().enumerate() {
            if i >= pre.size() {
                return Err(ApiError::InvalidConnectionList {
                    index,
                    reason: format!(
                        "presynaptic index {} out of range for population of size {}",
                        i,
                        pre.size()
                    ),
                });
            }
            if j >= post.size() {
                return Err(ApiError::InvalidConnectionList {
                    index,
                    reason: format!(
                        "postsynaptic index {} out of range for population of size {}",
                        j,
                        post.size()
                    ),
                });
            }
            triplets.push((i as u32, j as u32, weight));
        }
        Ok(triplets)
    }
}
