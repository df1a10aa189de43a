// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neuroglia
//!
//! Umbrella crate for the neuroglia spiking-network stack. Most users only
//! need the API layer, re-exported at the top level here; the backend engine
//! and the configuration loader stay reachable under their own namespaces
//! for code that wants to drive them directly.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! neuroglia = "0.1"
//! ```
//!
//! ```rust,no_run
//! use neuroglia::{
//!     AllToAllConnector, IfCurrExp, Population, Projection, ProjectionOptions,
//!     SetupOptions, Simulation,
//! };
//!
//! let mut sim = Simulation::setup(SetupOptions::default())?;
//! let source = Population::new(&mut sim, 100, &IfCurrExp, None, Some("source"))?;
//! let sink = Population::new(&mut sim, (10, 10), &IfCurrExp, None, None)?;
//! Projection::new(
//!     &mut sim,
//!     &source,
//!     &sink,
//!     &AllToAllConnector::new(0.1, None),
//!     ProjectionOptions::default(),
//! )?;
//! sim.record(&sink)?;
//! sim.run(1000.0)?;
//! sim.end(true)?;
//! # Ok::<(), neuroglia::ApiError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use neuroglia_api::*;

pub use neuroglia_config as config;
pub use neuroglia_engine as engine;
pub use neuroglia_neural as neural;
