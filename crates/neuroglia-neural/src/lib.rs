// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuroglia-neural
//!
//! Simulator-neutral cell-model descriptors:
//! - **Parameters**: named parameter sets with defaults, merging and validation
//! - **Standard cell types**: LIF variants and spike sources with backend translation
//! - **Synapse**: synaptic target kinds (excitatory/inhibitory ports)
//!
//! A standard cell type carries the neutral parameter vocabulary (`tau_m`,
//! `v_thresh`, ...) and knows how to translate a merged parameter set into the
//! engine-native [`NativeParameters`] form. Translation is also where domain
//! validation happens, so an invalid parameter never reaches the engine.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod models;
pub mod parameters;
pub mod synapse;

pub use error::{ParameterError, Result};
pub use models::{
    standard_cell_types, ArraySourceParameters, HhCondExp, IfCondExp, IfCurrExp,
    LifCondParameters, LifParameters, NativeParameters, PoissonParameters, SpikeSourceArray,
    SpikeSourcePoisson, StandardCellType,
};
pub use parameters::{ParameterSet, ParameterValue};
pub use synapse::SynapticTarget;
