// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuroglia-config
//!
//! Type-safe configuration loader for neuroglia simulations:
//! - TOML file parsing (`neuroglia.toml`)
//! - Environment variable overrides (`NEUROGLIA_*`)
//! - Validation of timestep/delay/process-layout consistency
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neuroglia_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("timestep: {} ms", config.simulation.timestep);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_environment_overrides, find_config_file, load_config};
pub use types::{NeurogliaConfig, ParallelConfig, RecordingConfig, SimulationConfig};
pub use validation::validate_config;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
