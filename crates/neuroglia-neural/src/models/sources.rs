// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spike-source cell types
//!
//! Spike sources emit spikes instead of integrating synaptic input; incoming
//! projections onto a source group are a construction-time error in the
//! engine.

use super::{ArraySourceParameters, NativeParameters, PoissonParameters, StandardCellType};
use crate::error::{ParameterError, Result};
use crate::parameters::ParameterSet;

/// Poisson spike train with a fixed mean rate inside an active window
#[derive(Debug, Clone, Copy, Default)]
pub struct SpikeSourcePoisson;

impl StandardCellType for SpikeSourcePoisson {
    fn model_name(&self) -> &'static str {
        "SpikeSourcePoisson"
    }

    fn default_parameters(&self) -> ParameterSet {
        ParameterSet::new()
            .with("rate", 1.0)
            .with("start", 0.0)
            // Effectively unbounded; the run loop never reaches this.
            .with("duration", 1.0e10)
    }

    fn translate(&self, params: &ParameterSet) -> Result<NativeParameters> {
        let poisson = PoissonParameters {
            rate: params.scalar("rate")?,
            start: params.scalar("start")?,
            duration: params.scalar("duration")?,
        };
        if poisson.rate < 0.0 {
            return Err(ParameterError::OutOfDomain {
                name: "rate",
                reason: format!("must be >= 0, got {}", poisson.rate),
            });
        }
        if poisson.start < 0.0 {
            return Err(ParameterError::OutOfDomain {
                name: "start",
                reason: format!("must be >= 0, got {}", poisson.start),
            });
        }
        if poisson.duration < 0.0 {
            return Err(ParameterError::OutOfDomain {
                name: "duration",
                reason: format!("must be >= 0, got {}", poisson.duration),
            });
        }
        Ok(NativeParameters::PoissonSource(poisson))
    }
}

/// Spike source firing at explicitly listed times
#[derive(Debug, Clone, Copy, Default)]
pub struct SpikeSourceArray;

impl StandardCellType for SpikeSourceArray {
    fn model_name(&self) -> &'static str {
        "SpikeSourceArray"
    }

    fn default_parameters(&self) -> ParameterSet {
        ParameterSet::new().with("spike_times", Vec::<f64>::new())
    }

    fn translate(&self, params: &ParameterSet) -> Result<NativeParameters> {
        let spike_times = params.list("spike_times")?.to_vec();
        if spike_times.windows(2).any(|w| w[1] < w[0]) {
            return Err(ParameterError::OutOfDomain {
                name: "spike_times",
                reason: "spike times must be non-decreasing".to_string(),
            });
        }
        if spike_times.iter().any(|t| *t < 0.0) {
            return Err(ParameterError::OutOfDomain {
                name: "spike_times",
                reason: "spike times must be >= 0".to_string(),
            });
        }
        Ok(NativeParameters::ArraySource(ArraySourceParameters {
            spike_times,
        }))
    }
}
