// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuroglia-engine
//!
//! The clock-driven backend engine behind the neuroglia API:
//! - **State**: global timestep, current time, delay bounds, process layout
//! - **Groups**: homogeneous cell arrays with vectorized state updates
//! - **Matrices**: immutable sparse connection matrices (CSR, homogeneous delay)
//! - **Network**: the aggregator owning groups, matrices, current sources and
//!   recorders, and the per-step run loop
//!
//! The engine is single-threaded and synchronous. Distributed awareness is
//! emulated: a round-robin locality partition over an advertised process
//! count, so the API layer can exercise locality semantics without any
//! transport underneath.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod group;
pub mod ids;
pub mod matrix;
pub mod network;
pub mod recorder;
pub mod sources;
pub mod state;

pub use error::{EngineError, Result};
pub use group::CellGroup;
pub use ids::{CellId, GroupId, MatrixId, SourceId};
pub use matrix::{ConnectionMatrix, MatrixEntryIter};
pub use network::{CellAllocation, Network};
pub use recorder::{RecordedVariable, Recorder};
pub use sources::CurrentSource;
pub use state::EngineState;
