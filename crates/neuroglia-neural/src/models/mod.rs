// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Standard Cell Types
//!
//! Each standard cell type pairs a neutral parameter vocabulary with a
//! translation into the engine-native [`NativeParameters`] form:
//!
//! - [`IfCurrExp`]: LIF with decaying-exponential current synapses
//! - [`IfCondExp`]: LIF with decaying-exponential conductance synapses
//! - [`SpikeSourcePoisson`]: Poisson spike train source
//! - [`SpikeSourceArray`]: explicit spike-time source
//! - [`HhCondExp`]: registered but not translatable by this backend
//!
//! Translation validates parameter domains, so a successfully translated set
//! is safe for the engine to consume without further checks.

mod hh;
mod lif;
mod sources;

pub use hh::HhCondExp;
pub use lif::{IfCondExp, IfCurrExp};
pub use sources::{SpikeSourceArray, SpikeSourcePoisson};

use core::fmt;

use crate::error::Result;
use crate::parameters::ParameterSet;

/// Engine-native cell-group parameters produced by cell-type translation
///
/// All times are in ms, voltages in mV, currents in nA, capacitance in nF,
/// conductance in uS.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeParameters {
    LifCurrExp(LifParameters),
    LifCondExp(LifCondParameters),
    PoissonSource(PoissonParameters),
    ArraySource(ArraySourceParameters),
}

/// Leaky integrate-and-fire core parameters shared by the LIF variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifParameters {
    pub tau_m: f64,
    pub cm: f64,
    pub v_rest: f64,
    pub v_reset: f64,
    pub v_thresh: f64,
    pub v_init: f64,
    pub tau_refrac: f64,
    pub tau_syn_e: f64,
    pub tau_syn_i: f64,
    pub i_offset: f64,
}

/// Conductance-based LIF parameters: the current-based core plus reversal
/// potentials for the two synaptic conductances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifCondParameters {
    pub lif: LifParameters,
    pub e_rev_e: f64,
    pub e_rev_i: f64,
}

/// Poisson spike-source parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonParameters {
    /// Mean firing rate in Hz
    pub rate: f64,
    /// Onset time in ms
    pub start: f64,
    /// Active window length in ms
    pub duration: f64,
}

/// Explicit spike-time source parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySourceParameters {
    /// Non-decreasing spike times in ms, shared by every cell in the group
    pub spike_times: Vec<f64>,
}

/// A simulator-neutral neuron-model descriptor.
///
/// Implementations are stateless unit structs; parameter state lives in the
/// [`ParameterSet`] handed to [`StandardCellType::translate`].
pub trait StandardCellType: fmt::Debug + Sync {
    /// Neutral model name, e.g. `IF_curr_exp`.
    fn model_name(&self) -> &'static str;

    /// Full defaults table. Every parameter the model accepts appears here.
    fn default_parameters(&self) -> ParameterSet;

    /// Translate a merged parameter set into engine-native form, validating
    /// domains along the way.
    fn translate(&self, params: &ParameterSet) -> Result<NativeParameters>;

    /// Merge caller overrides onto the defaults and validate the result by
    /// translating it. Returns the merged set.
    fn checked_parameters(&self, overrides: Option<&ParameterSet>) -> Result<ParameterSet> {
        let merged =
            ParameterSet::merged_with(&self.default_parameters(), overrides, self.model_name())?;
        self.translate(&merged)?;
        Ok(merged)
    }
}

/// All registered standard cell types.
///
/// Registration does not imply backend support; `list_standard_models` in the
/// API layer filters out the ones this backend cannot instantiate.
pub fn standard_cell_types() -> &'static [&'static dyn StandardCellType] {
    static TYPES: [&dyn StandardCellType; 5] = [
        &IfCurrExp,
        &IfCondExp,
        &SpikeSourcePoisson,
        &SpikeSourceArray,
        &HhCondExp,
    ];
    &TYPES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_unique() {
        let mut names: Vec<_> = standard_cell_types()
            .iter()
            .map(|t| t.model_name())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), standard_cell_types().len());
    }

    #[test]
    fn test_defaults_translate_for_supported_models() {
        for cell_type in standard_cell_types() {
            let translated = cell_type.translate(&cell_type.default_parameters());
            if cell_type.model_name() == "HH_cond_exp" {
                assert!(translated.is_err());
            } else {
                assert!(translated.is_ok(), "{} defaults must translate", cell_type.model_name());
            }
        }
    }
}
