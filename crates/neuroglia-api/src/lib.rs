// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuroglia-api
//!
//! The simulator-neutral spiking-network API mapped onto the neuroglia
//! backend engine. The adapter's whole job is glue: it translates
//! population/projection/connector abstractions into the engine's cell
//! groups, state vectors and connection matrices, reshapes results into the
//! dimensionality the caller asked for, and raises descriptive errors for
//! the features this backend cannot do.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use neuroglia_api::{
//!     AllToAllConnector, IfCurrExp, Population, Projection, ProjectionOptions,
//!     SetupOptions, Simulation,
//! };
//!
//! let mut sim = Simulation::setup(SetupOptions::default())?;
//! let pre = Population::new(&mut sim, (10, 10), &IfCurrExp, None, Some("exc"))?;
//! let post = Population::new(&mut sim, 25, &IfCurrExp, None, None)?;
//! let prj = Projection::new(
//!     &mut sim,
//!     &pre,
//!     &post,
//!     &AllToAllConnector::new(0.5, Some(1.0)),
//!     ProjectionOptions::default(),
//! )?;
//! sim.record(&post)?;
//! let t = sim.run(100.0)?;
//! sim.end(true)?;
//! # Ok::<(), neuroglia_api::ApiError>(())
//! ```
//!
//! Weights and delays are baked into the connector step: the mutation
//! operations on [`Projection`] exist for API compatibility and always fail.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod connectors;
pub mod electrodes;
pub mod error;
pub mod lowlevel;
pub mod population;
pub mod projection;
pub mod simulation;

pub use connectors::{
    AllToAllConnector, Connector, FixedProbabilityConnector, FromListConnector,
    OneToOneConnector, WeightSpec,
};
pub use electrodes::{DcSource, StepCurrentSource};
pub use error::{ApiError, Result};
pub use lowlevel::{connect, create, list_standard_models, record, record_v, set};
pub use population::{Population, Shape};
pub use projection::{Connection, Projection, ProjectionOptions, SynapseDynamics};
pub use simulation::{SetupOptions, Simulation};

// The neutral cell-type vocabulary is part of the API surface.
pub use neuroglia_neural::{
    standard_cell_types, HhCondExp, IfCondExp, IfCurrExp, ParameterSet, ParameterValue,
    SpikeSourceArray, SpikeSourcePoisson, StandardCellType, SynapticTarget,
};
pub use neuroglia_engine::CellId;
