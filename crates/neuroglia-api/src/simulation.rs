// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulation lifecycle control
//!
//! [`Simulation`] is the explicit context object the rest of the API hangs
//! off: it owns the backend network (clock, groups, matrices, recorders) and
//! the population label counter. The original design spread this state over
//! process-wide singletons; making it a value means two simulations in one
//! process cannot interfere, and everything resets by dropping the context.

use std::path::{Path, PathBuf};

use tracing::info;

use neuroglia_config::NeurogliaConfig;
use neuroglia_engine::{EngineState, Network, RecordedVariable};

use crate::error::Result;
use crate::population::Population;

/// Options for [`Simulation::setup`]
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Integration timestep in ms
    pub timestep: f64,
    /// Smallest admissible synaptic delay in ms
    pub min_delay: f64,
    /// Largest admissible synaptic delay in ms
    pub max_delay: f64,
    /// Seed for the network RNG (spike sources, probabilistic connectors)
    pub seed: u64,
    /// Emulated process count for locality partitioning
    pub num_processes: usize,
    /// Emulated rank of this process
    pub rank: usize,
    /// Directory recorder files are written into
    pub output_dir: PathBuf,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            timestep: 0.1,
            min_delay: 0.1,
            max_delay: 10.0,
            seed: 0,
            num_processes: 1,
            rank: 0,
            output_dir: PathBuf::from("results"),
        }
    }
}

impl From<&NeurogliaConfig> for SetupOptions {
    fn from(config: &NeurogliaConfig) -> Self {
        Self {
            timestep: config.simulation.timestep,
            min_delay: config.simulation.min_delay,
            max_delay: config.simulation.max_delay,
            seed: config.simulation.seed,
            num_processes: config.parallel.num_processes,
            rank: config.parallel.rank,
            output_dir: config.recording.output_dir.clone(),
        }
    }
}

/// The simulation context: backend network plus API bookkeeping
#[derive(Debug)]
pub struct Simulation {
    net: Network,
    output_dir: PathBuf,
    /// Monotonic counter behind auto-generated population labels. Increments
    /// on every population construction, labeled or not.
    population_count: usize,
}

impl Simulation {
    /// Set up a fresh simulation context. Call this before building any
    /// populations or projections.
    pub fn setup(options: SetupOptions) -> Result<Self> {
        let state = EngineState::new(
            options.timestep,
            options.min_delay,
            options.max_delay,
            options.rank,
            options.num_processes,
        )?;
        info!(
            timestep = options.timestep,
            min_delay = options.min_delay,
            max_delay = options.max_delay,
            rank = options.rank,
            num_processes = options.num_processes,
            "simulation setup"
        );
        Ok(Self {
            net: Network::new(state, options.seed),
            output_dir: options.output_dir,
            population_count: 0,
        })
    }

    /// Set up from a loaded configuration file.
    pub fn from_config(config: &NeurogliaConfig) -> Result<Self> {
        Self::setup(SetupOptions::from(config))
    }

    /// Advance the simulation by `duration` ms and return the new current
    /// time.
    pub fn run(&mut self, duration: f64) -> Result<f64> {
        Ok(self.net.run(duration)?)
    }

    /// Flush all registered recorders to their output files.
    ///
    /// `gather` asks for results from every process first; with the emulated
    /// single-transport layout each rank only ever writes its own cells, so
    /// the flag is recorded in the output metadata and nothing more.
    pub fn end(&mut self, gather: bool) -> Result<()> {
        info!(
            recorders = self.net.recorders().len(),
            gather, "simulation end"
        );
        self.net.write_recorders(gather)?;
        Ok(())
    }

    /// Current simulation time in ms.
    pub fn get_current_time(&self) -> f64 {
        self.net.state().time()
    }

    /// Integration timestep in ms.
    pub fn get_time_step(&self) -> f64 {
        self.net.state().dt()
    }

    /// Smallest admissible synaptic delay in ms.
    pub fn get_min_delay(&self) -> f64 {
        self.net.state().min_delay()
    }

    /// Largest admissible synaptic delay in ms.
    pub fn get_max_delay(&self) -> f64 {
        self.net.state().max_delay()
    }

    /// Advertised process count.
    pub fn num_processes(&self) -> usize {
        self.net.state().num_processes()
    }

    /// Rank of this process.
    pub fn rank(&self) -> usize {
        self.net.state().rank()
    }

    /// Record spikes from the population's local cells.
    pub fn record(&mut self, population: &Population) -> Result<()> {
        self.attach_recorder(population, RecordedVariable::Spikes)
    }

    /// Record the membrane potential of the population's local cells.
    pub fn record_v(&mut self, population: &Population) -> Result<()> {
        self.attach_recorder(population, RecordedVariable::Voltage)
    }

    fn attach_recorder(
        &mut self,
        population: &Population,
        variable: RecordedVariable,
    ) -> Result<()> {
        let output_dir = self.output_dir.clone();
        self.net.attach_recorder(
            population.group_id(),
            variable,
            population.label(),
            &output_dir,
            population.local_cells(),
        )?;
        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub(crate) fn net(&self) -> &Network {
        &self.net
    }

    pub(crate) fn net_mut(&mut self) -> &mut Network {
        &mut self.net
    }

    /// Resolve a population label, consuming one counter value either way
    /// so auto-labels stay strictly increasing across the context lifetime.
    pub(crate) fn allocate_population_label(&mut self, label: Option<&str>) -> String {
        let n = self.population_count;
        self.population_count += 1;
        match label {
            Some(label) => label.to_string(),
            None => format!("population{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_run_returns_elapsed_time() {
        let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
        assert_eq!(sim.get_current_time(), 0.0);
        let t = sim.run(25.0).unwrap();
        assert!((t - 25.0).abs() < 1e-9);
        assert!((sim.get_current_time() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_setup_rejects_bad_options() {
        let options = SetupOptions {
            timestep: -0.1,
            ..SetupOptions::default()
        };
        assert!(Simulation::setup(options).is_err());
    }

    #[test]
    fn test_state_queries_reflect_options() {
        let options = SetupOptions {
            timestep: 0.5,
            min_delay: 0.5,
            max_delay: 20.0,
            num_processes: 4,
            rank: 3,
            ..SetupOptions::default()
        };
        let sim = Simulation::setup(options).unwrap();
        assert_eq!(sim.get_time_step(), 0.5);
        assert_eq!(sim.get_min_delay(), 0.5);
        assert_eq!(sim.get_max_delay(), 20.0);
        assert_eq!(sim.num_processes(), 4);
        assert_eq!(sim.rank(), 3);
    }

    #[test]
    fn test_label_counter_monotonic() {
        let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
        assert_eq!(sim.allocate_population_label(None), "population0");
        assert_eq!(sim.allocate_population_label(Some("named")), "named");
        // The explicit label still consumed a counter slot.
        assert_eq!(sim.allocate_population_label(None), "population2");
    }
}
