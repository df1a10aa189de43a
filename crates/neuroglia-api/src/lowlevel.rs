// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Low-level convenience API
//!
//! One-call wrappers over the population/projection machinery for scripts
//! that do not need the object handles' full surface. Each function takes
//! the simulation context explicitly.

use tracing::warn;

use neuroglia_engine::{EngineState, Network};
use neuroglia_neural::{standard_cell_types, ParameterSet, StandardCellType};

use crate::connectors::FixedProbabilityConnector;
use crate::error::Result;
use crate::population::Population;
use crate::projection::{Projection, ProjectionOptions};
use crate::simulation::Simulation;

/// Create a one-dimensional population of `n` cells.
pub fn create(
    sim: &mut Simulation,
    cellclass: &dyn StandardCellType,
    cellparams: Option<&ParameterSet>,
    n: usize,
) -> Result<Population> {
    Population::new(sim, n, cellclass, cellparams, None)
}

/// Wire `pre` to `post` with fixed probability `p` and uniform weight.
///
/// `target` selects the postsynaptic port (`None` means excitatory); `delay`
/// of `None` selects the simulation's minimum delay.
pub fn connect(
    sim: &mut Simulation,
    pre: &Population,
    post: &Population,
    weight: f64,
    delay: Option<f64>,
    target: Option<&str>,
    p: f64,
) -> Result<Projection> {
    let connector = FixedProbabilityConnector::new(p, weight, delay);
    let options = ProjectionOptions {
        target: target.map(str::to_string),
        ..ProjectionOptions::default()
    };
    Projection::new(sim, pre, post, &connector, options)
}

/// Update one scalar parameter on every cell of the population.
///
/// Only membrane and source parameters the model exposes at runtime can be
/// set; synaptic weights and delays stay frozen in their matrices.
pub fn set(sim: &mut Simulation, population: &Population, name: &str, value: f64) -> Result<()> {
    sim.net_mut()
        .set_group_parameter(population.group_id(), name, value)?;
    Ok(())
}

/// Record spikes from the population's local cells.
pub fn record(sim: &mut Simulation, population: &Population) -> Result<()> {
    sim.record(population)
}

/// Record the membrane potential of the population's local cells.
pub fn record_v(sim: &mut Simulation, population: &Population) -> Result<()> {
    sim.record_v(population)
}

/// Names of the standard cell types this backend can actually simulate.
///
/// Each registered type is tried against a scratch network with its default
/// parameters; types that fail to translate are dropped with a warning
/// rather than failing the call.
pub fn list_standard_models() -> Vec<&'static str> {
    let mut working = Vec::new();
    for celltype in standard_cell_types() {
        match probe(*celltype) {
            Ok(()) => working.push(celltype.model_name()),
            Err(err) => {
                warn!(
                    model = celltype.model_name(),
                    %err,
                    "standard model unavailable on this backend"
                );
            }
        }
    }
    working
}

fn probe(celltype: &dyn StandardCellType) -> Result<()> {
    let native = celltype.translate(&celltype.default_parameters())?;
    let state = EngineState::new(0.1, 0.1, 10.0, 0, 1)?;
    let mut net = Network::new(state, 0);
    net.create_cells(&native, 1)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SetupOptions;
    use neuroglia_neural::IfCurrExp;

    #[test]
    fn test_list_standard_models_filters_unsupported() {
        let models = list_standard_models();
        assert!(models.contains(&"IF_curr_exp"));
        assert!(models.contains(&"IF_cond_exp"));
        assert!(models.contains(&"SpikeSourcePoisson"));
        assert!(models.contains(&"SpikeSourceArray"));
        assert!(!models.contains(&"HH_cond_exp"));
    }

    #[test]
    fn test_create_and_connect() {
        let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
        let pre = create(&mut sim, &IfCurrExp, None, 5).unwrap();
        let post = create(&mut sim, &IfCurrExp, None, 5).unwrap();
        assert_eq!(pre.dim(), &[5]);

        let prj = connect(&mut sim, &pre, &post, 0.5, None, None, 1.0).unwrap();
        assert_eq!(prj.len(), 25);
        assert_eq!(prj.delay(), sim.get_min_delay());
    }

    #[test]
    fn test_set_forwards_runtime_parameters() {
        let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
        let pop = create(&mut sim, &IfCurrExp, None, 3).unwrap();
        set(&mut sim, &pop, "i_offset", 0.5).unwrap();
        assert!(set(&mut sim, &pop, "weights", 0.1).is_err());
    }

    #[test]
    fn test_record_helpers() {
        let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
        let pop = create(&mut sim, &IfCurrExp, None, 2).unwrap();
        record(&mut sim, &pop).unwrap();
        record_v(&mut sim, &pop).unwrap();
    }
}
