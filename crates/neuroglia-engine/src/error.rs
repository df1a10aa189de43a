// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for engine operations

use neuroglia_neural::ParameterError;

use crate::ids::{CellId, GroupId};

/// Errors raised by the backend engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid timestep: {0} (must be > 0)")]
    InvalidTimestep(f64),

    #[error("invalid delay bounds: min_delay={min_delay}, max_delay={max_delay}")]
    InvalidDelayBounds { min_delay: f64, max_delay: f64 },

    #[error("delay {delay} ms outside [{min_delay}, {max_delay}] ms")]
    DelayOutOfRange {
        delay: f64,
        min_delay: f64,
        max_delay: f64,
    },

    #[error("invalid process layout: rank {rank} with {num_processes} process(es)")]
    InvalidProcessLayout { rank: usize, num_processes: usize },

    #[error("cell group must contain at least one cell")]
    EmptyGroup,

    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("cell not found: {0}")]
    CellNotFound(CellId),

    #[error("cell index {index} out of range for group of size {size}")]
    CellIndexOutOfRange { index: usize, size: usize },

    #[error("spike sources cannot receive connections (group {0})")]
    SourceAsTarget(GroupId),

    #[error("cannot inject current into spike-source group {0}")]
    InjectIntoSource(GroupId),

    #[error("group {0} has no membrane potential to record")]
    NoVoltage(GroupId),

    #[error("matrix shape mismatch: {0}")]
    MatrixShapeMismatch(String),

    #[error("group {group} does not accept parameter '{name}'")]
    UnknownGroupParameter { group: GroupId, name: String },

    #[error("negative run duration: {0} ms")]
    NegativeDuration(f64),

    #[error("recorder output error: {0}")]
    RecorderIo(#[from] std::io::Error),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

pub type Result<T> = core::result::Result<T, EngineError>;
