// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for parameter handling and cell-type translation

/// Errors raised while merging, validating or translating cell parameters
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParameterError {
    #[error("unknown parameter '{name}' for cell type {cell_type}")]
    UnknownParameter { cell_type: &'static str, name: String },

    #[error("parameter '{name}' must be a scalar value")]
    ExpectedScalar { name: String },

    #[error("parameter '{name}' must be a list of values")]
    ExpectedList { name: String },

    #[error("parameter '{name}' out of domain: {reason}")]
    OutOfDomain { name: &'static str, reason: String },

    #[error("cell model '{0}' is not supported by this backend")]
    UnsupportedModel(&'static str),

    #[error("unknown synaptic target '{0}' (expected 'excitatory' or 'inhibitory')")]
    UnknownTarget(String),
}

pub type Result<T> = core::result::Result<T, ParameterError>;
