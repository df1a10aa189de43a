// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Two-tier loading: the TOML file supplies base values, then `NEUROGLIA_*`
//! environment variables override individual fields.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::validation::validate_config;
use crate::{ConfigError, ConfigResult, NeurogliaConfig};

/// Find the neuroglia configuration file
///
/// Search order:
/// 1. `NEUROGLIA_CONFIG` environment variable
/// 2. Current working directory: `./neuroglia.toml`
/// 3. Parent directories (up to 5 levels)
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("NEUROGLIA_CONFIG") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "config file specified by NEUROGLIA_CONFIG not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join("neuroglia.toml"));
        let mut current = cwd;
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join("neuroglia.toml"));
                    current = parent.to_path_buf();
                }
                None => break,
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "neuroglia.toml not found in any of these locations:\n{}\n\nSet NEUROGLIA_CONFIG to specify a custom location.",
        search_list
    )))
}

/// Load configuration from a TOML file with environment overrides applied.
///
/// With `config_path == None` the file is searched for; a missing file is an
/// error in that case too. Callers that can run without a file use
/// `NeurogliaConfig::default()` directly.
pub fn load_config(config_path: Option<&Path>) -> ConfigResult<NeurogliaConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: NeurogliaConfig = toml::from_str(&content)?;
    apply_environment_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported variables:
/// - `NEUROGLIA_TIMESTEP` -> `simulation.timestep`
/// - `NEUROGLIA_MIN_DELAY` -> `simulation.min_delay`
/// - `NEUROGLIA_MAX_DELAY` -> `simulation.max_delay`
/// - `NEUROGLIA_SEED` -> `simulation.seed`
/// - `NEUROGLIA_OUTPUT_DIR` -> `recording.output_dir`
/// - `NEUROGLIA_NUM_PROCESSES` -> `parallel.num_processes`
/// - `NEUROGLIA_RANK` -> `parallel.rank`
pub fn apply_environment_overrides(config: &mut NeurogliaConfig) {
    if let Ok(value) = env::var("NEUROGLIA_TIMESTEP") {
        if let Ok(timestep) = value.parse::<f64>() {
            config.simulation.timestep = timestep;
        }
    }
    if let Ok(value) = env::var("NEUROGLIA_MIN_DELAY") {
        if let Ok(min_delay) = value.parse::<f64>() {
            config.simulation.min_delay = min_delay;
        }
    }
    if let Ok(value) = env::var("NEUROGLIA_MAX_DELAY") {
        if let Ok(max_delay) = value.parse::<f64>() {
            config.simulation.max_delay = max_delay;
        }
    }
    if let Ok(value) = env::var("NEUROGLIA_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.simulation.seed = seed;
        }
    }
    if let Ok(value) = env::var("NEUROGLIA_OUTPUT_DIR") {
        config.recording.output_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("NEUROGLIA_NUM_PROCESSES") {
        if let Ok(n) = value.parse::<usize>() {
            config.parallel.num_processes = n;
        }
    }
    if let Ok(value) = env::var("NEUROGLIA_RANK") {
        if let Ok(rank) = value.parse::<usize>() {
            config.parallel.rank = rank;
        }
    }
}
