// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cell groups
//!
//! A group is a homogeneous array of cells sharing one native model. State
//! lives in per-group `ndarray` vectors (membrane potential, synaptic
//! state, refractory countdowns) so the update is a tight indexed loop.
//!
//! ## Step protocol
//!
//! Per step the network drives each group through three phases:
//! 1. `begin_step`: clear the injected-current accumulator
//! 2. input accumulation: current sources call `inject`, matrix deliveries
//!    call `add_synaptic_input`
//! 3. `update`: integrate one dt, consume the accumulators, report fired
//!    local cell indices

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;

use neuroglia_neural::{
    ArraySourceParameters, LifCondParameters, LifParameters, NativeParameters, PoissonParameters,
    SynapticTarget,
};

use crate::error::{EngineError, Result};
use crate::ids::{CellId, GroupId};
use crate::state::EngineState;

/// Vectorized state for the LIF group kinds
#[derive(Debug, Clone)]
struct LifState {
    params: LifParameters,
    v: Array1<f64>,
    /// Excitatory synaptic state: current (nA) for current-based groups,
    /// conductance (uS) for conductance-based groups
    syn_e: Array1<f64>,
    syn_i: Array1<f64>,
    refrac_left: Array1<u32>,
    // Precomputed per-dt constants
    decay_e: f64,
    decay_i: f64,
    refrac_steps: u32,
}

impl LifState {
    fn new(params: LifParameters, n: usize, dt: f64) -> Self {
        Self {
            v: Array1::from_elem(n, params.v_init),
            syn_e: Array1::zeros(n),
            syn_i: Array1::zeros(n),
            refrac_left: Array1::zeros(n),
            decay_e: (-dt / params.tau_syn_e).exp(),
            decay_i: (-dt / params.tau_syn_i).exp(),
            refrac_steps: (params.tau_refrac / dt).round() as u32,
            params,
        }
    }

    fn refresh_constants(&mut self, dt: f64) {
        self.decay_e = (-dt / self.params.tau_syn_e).exp();
        self.decay_i = (-dt / self.params.tau_syn_i).exp();
        self.refrac_steps = (self.params.tau_refrac / dt).round() as u32;
    }
}

#[derive(Debug, Clone)]
enum GroupKind {
    LifCurrExp(LifState),
    LifCondExp {
        state: LifState,
        e_rev_e: f64,
        e_rev_i: f64,
    },
    PoissonSource(PoissonParameters),
    ArraySource {
        params: ArraySourceParameters,
        /// Index of the next unfired spike time
        cursor: usize,
    },
}

/// A homogeneous array of cells with contiguous global ids
#[derive(Debug, Clone)]
pub struct CellGroup {
    id: GroupId,
    first_id: u32,
    n: usize,
    kind: GroupKind,
    /// Per-step excitatory arrivals (weight sums), cleared by `update`
    input_e: Array1<f64>,
    /// Per-step inhibitory arrivals (weight sums), cleared by `update`
    input_i: Array1<f64>,
    /// Per-step injected current from attached sources, cleared by `begin_step`
    injected: Array1<f64>,
}

impl CellGroup {
    pub(crate) fn new(
        id: GroupId,
        first_id: u32,
        n: usize,
        native: &NativeParameters,
        dt: f64,
    ) -> Result<Self> {
        if n == 0 {
            return Err(EngineError::EmptyGroup);
        }
        let kind = match native {
            NativeParameters::LifCurrExp(p) => GroupKind::LifCurrExp(LifState::new(*p, n, dt)),
            NativeParameters::LifCondExp(LifCondParameters { lif, e_rev_e, e_rev_i }) => {
                GroupKind::LifCondExp {
                    state: LifState::new(*lif, n, dt),
                    e_rev_e: *e_rev_e,
                    e_rev_i: *e_rev_i,
                }
            }
            NativeParameters::PoissonSource(p) => GroupKind::PoissonSource(*p),
            NativeParameters::ArraySource(p) => GroupKind::ArraySource {
                params: p.clone(),
                cursor: 0,
            },
        };
        Ok(Self {
            id,
            first_id,
            n,
            kind,
            input_e: Array1::zeros(n),
            input_i: Array1::zeros(n),
            injected: Array1::zeros(n),
        })
    }

    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    #[inline]
    pub fn first_id(&self) -> u32 {
        self.first_id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// True for spike-source kinds that cannot receive synaptic input.
    pub fn is_source(&self) -> bool {
        matches!(
            self.kind,
            GroupKind::PoissonSource(_) | GroupKind::ArraySource { .. }
        )
    }

    #[inline]
    pub fn contains(&self, cell: CellId) -> bool {
        cell.0 >= self.first_id && (cell.0 - self.first_id) < self.n as u32
    }

    /// Local (group-relative) index of a cell.
    pub fn local_index(&self, cell: CellId) -> Result<usize> {
        if self.contains(cell) {
            Ok((cell.0 - self.first_id) as usize)
        } else {
            Err(EngineError::CellNotFound(cell))
        }
    }

    /// Membrane potentials, `None` for spike sources.
    pub fn voltages(&self) -> Option<&Array1<f64>> {
        match &self.kind {
            GroupKind::LifCurrExp(s) => Some(&s.v),
            GroupKind::LifCondExp { state, .. } => Some(&state.v),
            _ => None,
        }
    }

    pub(crate) fn begin_step(&mut self) {
        self.injected.fill(0.0);
    }

    /// Add an injected current (nA) for this step.
    pub(crate) fn inject(&mut self, index: usize, amplitude: f64) {
        self.injected[index] += amplitude;
    }

    /// Accumulate a delivered synaptic weight for this step.
    pub(crate) fn add_synaptic_input(&mut self, target: SynapticTarget, index: usize, weight: f64) {
        match target {
            SynapticTarget::Excitatory => self.input_e[index] += weight,
            SynapticTarget::Inhibitory => self.input_i[index] += weight,
        }
    }

    /// Integrate one timestep and append fired local indices to `fired`.
    ///
    /// `state` has already been advanced, so `state.time()` is the time at
    /// the end of this step.
    pub(crate) fn update(&mut self, state: &EngineState, rng: &mut StdRng, fired: &mut Vec<u32>) {
        let dt = state.dt();
        let t_end = state.time();
        match &mut self.kind {
            GroupKind::LifCurrExp(s) => {
                for i in 0..self.n {
                    s.syn_e[i] = s.syn_e[i] * s.decay_e + self.input_e[i];
                    s.syn_i[i] = s.syn_i[i] * s.decay_i + self.input_i[i];
                    if s.refrac_left[i] > 0 {
                        s.refrac_left[i] -= 1;
                        s.v[i] = s.params.v_reset;
                        continue;
                    }
                    let i_total =
                        s.syn_e[i] - s.syn_i[i] + s.params.i_offset + self.injected[i];
                    s.v[i] += dt
                        * ((s.params.v_rest - s.v[i]) / s.params.tau_m
                            + i_total / s.params.cm);
                    if s.v[i] >= s.params.v_thresh {
                        s.v[i] = s.params.v_reset;
                        s.refrac_left[i] = s.refrac_steps;
                        fired.push(i as u32);
                    }
                }
            }
            GroupKind::LifCondExp { state: s, e_rev_e, e_rev_i } => {
                for i in 0..self.n {
                    s.syn_e[i] = s.syn_e[i] * s.decay_e + self.input_e[i];
                    s.syn_i[i] = s.syn_i[i] * s.decay_i + self.input_i[i];
                    if s.refrac_left[i] > 0 {
                        s.refrac_left[i] -= 1;
                        s.v[i] = s.params.v_reset;
                        continue;
                    }
                    let i_syn = s.syn_e[i] * (*e_rev_e - s.v[i])
                        + s.syn_i[i] * (*e_rev_i - s.v[i]);
                    let i_total = i_syn + s.params.i_offset + self.injected[i];
                    s.v[i] += dt
                        * ((s.params.v_rest - s.v[i]) / s.params.tau_m
                            + i_total / s.params.cm);
                    if s.v[i] >= s.params.v_thresh {
                        s.v[i] = s.params.v_reset;
                        s.refrac_left[i] = s.refrac_steps;
                        fired.push(i as u32);
                    }
                }
            }
            GroupKind::PoissonSource(p) => {
                let active = t_end > p.start && t_end <= p.start + p.duration;
                if active && p.rate > 0.0 {
                    let prob = (p.rate * dt / 1000.0).min(1.0);
                    for i in 0..self.n {
                        if rng.gen::<f64>() < prob {
                            fired.push(i as u32);
                        }
                    }
                }
            }
            GroupKind::ArraySource { params, cursor } => {
                // All cells share the spike-time list; a step absorbs every
                // programmed time inside (t_end - dt, t_end].
                let mut fires = false;
                while *cursor < params.spike_times.len()
                    && params.spike_times[*cursor] <= t_end + 1e-9
                {
                    fires = true;
                    *cursor += 1;
                }
                if fires {
                    for i in 0..self.n {
                        fired.push(i as u32);
                    }
                }
            }
        }
        self.input_e.fill(0.0);
        self.input_i.fill(0.0);
    }

    /// Forward a scalar parameter update onto the group, for the model kinds
    /// that accept one. Synaptic weights and delays are never settable here.
    pub(crate) fn set_parameter(&mut self, name: &str, value: f64, dt: f64) -> Result<()> {
        let unknown = || EngineError::UnknownGroupParameter {
            group: self.id,
            name: name.to_string(),
        };
        match &mut self.kind {
            GroupKind::LifCurrExp(s)
            | GroupKind::LifCondExp { state: s, .. } => {
                match name {
                    "v_rest" => s.params.v_rest = value,
                    "v_reset" => s.params.v_reset = value,
                    "v_thresh" => s.params.v_thresh = value,
                    "i_offset" => s.params.i_offset = value,
                    "tau_m" => s.params.tau_m = value,
                    "tau_refrac" => {
                        s.params.tau_refrac = value;
                        s.refresh_constants(dt);
                    }
                    "tau_syn_E" => {
                        s.params.tau_syn_e = value;
                        s.refresh_constants(dt);
                    }
                    "tau_syn_I" => {
                        s.params.tau_syn_i = value;
                        s.refresh_constants(dt);
                    }
                    _ => return Err(unknown()),
                }
                Ok(())
            }
            GroupKind::PoissonSource(p) => {
                match name {
                    "rate" => p.rate = value,
                    "start" => p.start = value,
                    "duration" => p.duration = value,
                    _ => return Err(unknown()),
                }
                Ok(())
            }
            GroupKind::ArraySource { .. } => Err(unknown()),
        }
    }
}
