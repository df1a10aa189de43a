// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that loaded values are internally consistent before any simulation
//! state is built from them.

use crate::{ConfigError, ConfigResult, NeurogliaConfig};

/// Validate the complete configuration
///
/// Checks:
/// - `timestep > 0`
/// - `0 < min_delay <= max_delay`
/// - delays representable in whole timesteps (`min_delay >= timestep`)
/// - `num_processes >= 1` and `rank < num_processes`
pub fn validate_config(config: &NeurogliaConfig) -> ConfigResult<()> {
    let sim = &config.simulation;
    if !(sim.timestep.is_finite() && sim.timestep > 0.0) {
        return Err(ConfigError::InvalidValue {
            field: "simulation.timestep".to_string(),
            reason: format!("must be finite and > 0, got {}", sim.timestep),
        });
    }
    if !(sim.min_delay > 0.0) {
        return Err(ConfigError::InvalidValue {
            field: "simulation.min_delay".to_string(),
            reason: format!("must be > 0, got {}", sim.min_delay),
        });
    }
    if sim.max_delay < sim.min_delay {
        return Err(ConfigError::InvalidValue {
            field: "simulation.max_delay".to_string(),
            reason: format!(
                "must be >= min_delay ({}), got {}",
                sim.min_delay, sim.max_delay
            ),
        });
    }
    if sim.min_delay < sim.timestep {
        return Err(ConfigError::InvalidValue {
            field: "simulation.min_delay".to_string(),
            reason: format!(
                "must be >= timestep ({}) so delays round to whole steps, got {}",
                sim.timestep, sim.min_delay
            ),
        });
    }

    let parallel = &config.parallel;
    if parallel.num_processes == 0 {
        return Err(ConfigError::InvalidValue {
            field: "parallel.num_processes".to_string(),
            reason: "must be >= 1".to_string(),
        });
    }
    if parallel.rank >= parallel.num_processes {
        return Err(ConfigError::InvalidValue {
            field: "parallel.rank".to_string(),
            reason: format!(
                "must be < num_processes ({}), got {}",
                parallel.num_processes, parallel.rank
            ),
        });
    }
    Ok(())
}
