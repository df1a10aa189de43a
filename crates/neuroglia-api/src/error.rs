// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the API layer
//!
//! Three classes of failure:
//! - [`ApiError::Unsupported`]: the backend cannot do this by design
//!   (weight/delay/synapse-dynamics mutation after construction)
//! - [`ApiError::NotImplemented`]: missing functionality rather than a
//!   backend limitation
//! - everything else propagates from the engine/model layers unmodified

use neuroglia_config::ConfigError;
use neuroglia_engine::EngineError;
use neuroglia_neural::ParameterError;

/// Errors raised by the API layer
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unsupported by this backend: {0}")]
    Unsupported(String),

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("population size mismatch: {0}")]
    SizeMismatch(String),

    #[error("invalid connection list entry {index}: {reason}")]
    InvalidConnectionList { index: usize, reason: String },

    #[error("invalid current source: {0}")]
    InvalidCurrentSource(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = core::result::Result<T, ApiError>;
