// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Structs map one-to-one onto sections of `neuroglia.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NeurogliaConfig {
    pub simulation: SimulationConfig,
    pub recording: RecordingConfig,
    pub parallel: ParallelConfig,
}

/// Simulation clock and delay bounds
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Integration timestep in ms
    pub timestep: f64,
    /// Smallest admissible synaptic delay in ms
    pub min_delay: f64,
    /// Largest admissible synaptic delay in ms
    pub max_delay: f64,
    /// Seed for the network RNG (sources, probabilistic connectors)
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 0.1,
            min_delay: 0.1,
            max_delay: 10.0,
            seed: 0,
        }
    }
}

/// Recorder output settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Directory recorder files are written into
    pub output_dir: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
        }
    }
}

/// Emulated process layout for locality partitioning
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParallelConfig {
    pub num_processes: usize,
    pub rank: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_processes: 1,
            rank: 0,
        }
    }
}
