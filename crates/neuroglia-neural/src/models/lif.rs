// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Leaky integrate-and-fire cell types
//!
//! ```text
//! Membrane:
//!     dv/dt = (v_rest - v)/tau_m + i_total/cm
//!
//! Current-based synapses (IF_curr_exp):
//!     i_total = i_syn_e - i_syn_i + i_offset + i_inj
//!     d(i_syn)/dt = -i_syn/tau_syn
//!
//! Conductance-based synapses (IF_cond_exp):
//!     i_total = g_e*(e_rev_E - v) + g_i*(e_rev_I - v) + i_offset + i_inj
//!     d(g)/dt = -g/tau_syn
//!
//! Firing:
//!     v >= v_thresh and not refractory -> spike, v := v_reset,
//!     refractory for tau_refrac
//! ```

use super::{LifCondParameters, LifParameters, NativeParameters, StandardCellType};
use crate::error::{ParameterError, Result};
use crate::parameters::ParameterSet;

fn lif_core(params: &ParameterSet) -> Result<LifParameters> {
    let lif = LifParameters {
        tau_m: params.scalar("tau_m")?,
        cm: params.scalar("cm")?,
        v_rest: params.scalar("v_rest")?,
        v_reset: params.scalar("v_reset")?,
        v_thresh: params.scalar("v_thresh")?,
        v_init: params.scalar("v_init")?,
        tau_refrac: params.scalar("tau_refrac")?,
        tau_syn_e: params.scalar("tau_syn_E")?,
        tau_syn_i: params.scalar("tau_syn_I")?,
        i_offset: params.scalar("i_offset")?,
    };

    if lif.tau_m <= 0.0 {
        return Err(ParameterError::OutOfDomain {
            name: "tau_m",
            reason: format!("must be > 0, got {}", lif.tau_m),
        });
    }
    if lif.cm <= 0.0 {
        return Err(ParameterError::OutOfDomain {
            name: "cm",
            reason: format!("must be > 0, got {}", lif.cm),
        });
    }
    if lif.tau_refrac < 0.0 {
        return Err(ParameterError::OutOfDomain {
            name: "tau_refrac",
            reason: format!("must be >= 0, got {}", lif.tau_refrac),
        });
    }
    if lif.tau_syn_e <= 0.0 {
        return Err(ParameterError::OutOfDomain {
            name: "tau_syn_E",
            reason: format!("must be > 0, got {}", lif.tau_syn_e),
        });
    }
    if lif.tau_syn_i <= 0.0 {
        return Err(ParameterError::OutOfDomain {
            name: "tau_syn_I",
            reason: format!("must be > 0, got {}", lif.tau_syn_i),
        });
    }
    Ok(lif)
}

/// LIF neuron with fixed threshold and decaying-exponential current synapses
#[derive(Debug, Clone, Copy, Default)]
pub struct IfCurrExp;

impl StandardCellType for IfCurrExp {
    fn model_name(&self) -> &'static str {
        "IF_curr_exp"
    }

    fn default_parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .with("tau_m", 20.0)
            .with("cm", 1.0)
            .with("v_rest", -65.0)
            .with("v_reset", -65.0)
            .with("v_thresh", -50.0)
            .with("v_init", -65.0)
            .with("tau_refrac", 0.1)
            .with("tau_syn_E", 5.0)
            .with("tau_syn_I", 5.0)
            .with("i_offset", 0.0)
    }

    fn translate(&self, params: &ParameterSet) -> Result<NativeParameters> {
        Ok(NativeParameters::LifCurrExp(lif_core(params)?))
    }
}

/// LIF neuron with fixed threshold and decaying-exponential conductance synapses
#[derive(Debug, Clone, Copy, Default)]
pub struct IfCondExp;

impl StandardCellType for IfCondExp {
    fn model_name(&self) -> &'static str {
        "IF_cond_exp"
    }

    fn default_parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .with("tau_m", 20.0)
            .with("cm", 1.0)
            .with("v_rest", -65.0)
            .with("v_reset", -65.0)
            .with("v_thresh", -50.0)
            .with("v_init", -65.0)
            .with("tau_refrac", 0.1)
            .with("tau_syn_E", 5.0)
            .with("tau_syn_I", 5.0)
            .with("i_offset", 0.0)
            .with("e_rev_E", 0.0)
            .with("e_rev_I", -70.0)
    }

    fn translate(&self, params: &ParameterSet) -> Result<NativeParameters> {
        Ok(NativeParameters::LifCondExp(LifCondParameters {
            lif: lif_core(params)?,
            e_rev_e: params.scalar("e_rev_E")?,
            e_rev_i: params.scalar("e_rev_I")?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if_curr_exp_defaults_translate() {
        let cell_type = IfCurrExp;
        let native = cell_type
            .translate(&cell_type.default_parameters())
            .unwrap();
        match native {
            NativeParameters::LifCurrExp(lif) => {
                assert_eq!(lif.tau_m, 20.0);
                assert_eq!(lif.v_thresh, -50.0);
            }
            other => panic!("unexpected translation: {:?}", other),
        }
    }

    #[test]
    fn test_negative_tau_m_rejected() {
        let cell_type = IfCurrExp;
        let params = ParameterSet::merged_with(
            &cell_type.default_parameters(),
            Some(&ParameterSet::new().with("tau_m", -1.0)),
            cell_type.model_name(),
        )
        .unwrap();
        assert!(matches!(
            cell_type.translate(&params),
            Err(ParameterError::OutOfDomain { name: "tau_m", .. })
        ));
    }

    #[test]
    fn test_cond_exp_carries_reversal_potentials() {
        let cell_type = IfCondExp;
        let native = cell_type
            .translate(&cell_type.default_parameters())
            .unwrap();
        match native {
            NativeParameters::LifCondExp(p) => {
                assert_eq!(p.e_rev_e, 0.0);
                assert_eq!(p.e_rev_i, -70.0);
            }
            other => panic!("unexpected translation: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_parameter_rejected_by_checked_parameters() {
        let cell_type = IfCurrExp;
        let overrides = ParameterSet::new().with("gbar_Na", 20.0);
        assert!(matches!(
            cell_type.checked_parameters(Some(&overrides)),
            Err(ParameterError::UnknownParameter { .. })
        ));
    }
}
