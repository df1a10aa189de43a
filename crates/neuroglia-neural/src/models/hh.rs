// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Hodgkin-Huxley cell type (registered, not translatable)
//!
//! The neutral vocabulary includes `HH_cond_exp`, but this backend has no
//! native Hodgkin-Huxley group kind. The type stays in the registry so the
//! best-effort `list_standard_models` filter can discover and report it.

use super::{NativeParameters, StandardCellType};
use crate::error::{ParameterError, Result};
use crate::parameters::ParameterSet;

/// Single-compartment Hodgkin-Huxley neuron with exponential conductance
/// synapses. Not supported by this backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct HhCondExp;

impl StandardCellType for HhCondExp {
    fn model_name(&self) -> &'static str {
        "HH_cond_exp"
    }

    fn default_parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .with("gbar_Na", 20.0)
            .with("gbar_K", 6.0)
            .with("g_leak", 0.01)
            .with("cm", 0.2)
            .with("v_offset", -63.0)
            .with("e_rev_Na", 50.0)
            .with("e_rev_K", -90.0)
            .with("e_rev_leak", -65.0)
            .with("e_rev_E", 0.0)
            .with("e_rev_I", -80.0)
            .with("tau_syn_E", 0.2)
            .with("tau_syn_I", 2.0)
            .with("i_offset", 0.0)
            .with("v_init", -65.0)
    }

    fn translate(&self, _params: &ParameterSet) -> Result<NativeParameters> {
        Err(ParameterError::UnsupportedModel(self.model_name()))
    }
}
