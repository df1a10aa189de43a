// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Current injection electrodes
//!
//! Electrodes are value objects describing a current waveform; injection
//! registers the waveform with the network against a set of target cells.
//! Spike source cells have no membrane and cannot be injected into.

use neuroglia_engine::{CellId, CurrentSource};

use crate::error::{ApiError, Result};
use crate::population::Population;
use crate::simulation::Simulation;

/// Constant current over a `[start, stop)` window, in nA
#[derive(Debug, Clone, Copy)]
pub struct DcSource {
    pub amplitude: f64,
    pub start: f64,
    pub stop: f64,
}

impl DcSource {
    pub fn new(amplitude: f64, start: f64, stop: f64) -> Result<Self> {
        if !(start >= 0.0 && stop >= start) {
            return Err(ApiError::InvalidCurrentSource(format!(
                "dc window [{start}, {stop}) is not a valid time range"
            )));
        }
        Ok(Self {
            amplitude,
            start,
            stop,
        })
    }

    /// Inject this current into the population's local cells.
    pub fn inject_into(&self, sim: &mut Simulation, population: &Population) -> Result<()> {
        let cells: Vec<CellId> = population.local_cells().to_vec();
        self.inject_into_cells(sim, &cells)
    }

    /// Inject this current into an explicit cell list.
    pub fn inject_into_cells(&self, sim: &mut Simulation, cells: &[CellId]) -> Result<()> {
        sim.net_mut().attach_current_source(
            CurrentSource::Dc {
                amplitude: self.amplitude,
                start: self.start,
                stop: self.stop,
            },
            cells,
        )?;
        Ok(())
    }
}

/// Piecewise-constant current: at each listed time the amplitude changes to
/// the paired value and holds until the next change point.
#[derive(Debug, Clone)]
pub struct StepCurrentSource {
    pub times: Vec<f64>,
    pub amplitudes: Vec<f64>,
}

impl StepCurrentSource {
    pub fn new(times: Vec<f64>, amplitudes: Vec<f64>) -> Result<Self> {
        if times.len() != amplitudes.len() {
            return Err(ApiError::InvalidCurrentSource(format!(
                "{} change times but {} amplitudes",
                times.len(),
                amplitudes.len()
            )));
        }
        if times.windows(2).any(|w| w[1] < w[0]) {
            return Err(ApiError::InvalidCurrentSource(
                "change times must be non-decreasing".to_string(),
            ));
        }
        if times.first().is_some_and(|t| *t < 0.0) {
            return Err(ApiError::InvalidCurrentSource(
                "change times must be non-negative".to_string(),
            ));
        }
        Ok(Self { times, amplitudes })
    }

    /// Inject this current into the population's local cells.
    pub fn inject_into(&self, sim: &mut Simulation, population: &Population) -> Result<()> {
        let cells: Vec<CellId> = population.local_cells().to_vec();
        self.inject_into_cells(sim, &cells)
    }

    /// Inject this current into an explicit cell list.
    pub fn inject_into_cells(&self, sim: &mut Simulation, cells: &[CellId]) -> Result<()> {
        sim.net_mut().attach_current_source(
            CurrentSource::Step {
                times: self.times.clone(),
                amplitudes: self.amplitudes.clone(),
            },
            cells,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SetupOptions;
    use neuroglia_neural::{IfCurrExp, SpikeSourcePoisson};

    #[test]
    fn test_dc_window_validation() {
        assert!(DcSource::new(1.0, 0.0, 100.0).is_ok());
        assert!(matches!(
            DcSource::new(1.0, 50.0, 10.0),
            Err(ApiError::InvalidCurrentSource(_))
        ));
        assert!(matches!(
            DcSource::new(1.0, -5.0, 10.0),
            Err(ApiError::InvalidCurrentSource(_))
        ));
    }

    #[test]
    fn test_step_source_validation() {
        assert!(StepCurrentSource::new(vec![0.0, 10.0], vec![0.5, 0.0]).is_ok());
        assert!(matches!(
            StepCurrentSource::new(vec![0.0, 10.0], vec![0.5]),
            Err(ApiError::InvalidCurrentSource(_))
        ));
        assert!(matches!(
            StepCurrentSource::new(vec![10.0, 0.0], vec![0.5, 0.0]),
            Err(ApiError::InvalidCurrentSource(_))
        ));
    }

    #[test]
    fn test_injection_into_spike_source_rejected() {
        let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
        let sources = Population::new(&mut sim, 2, &SpikeSourcePoisson, None, None).unwrap();
        let dc = DcSource::new(1.0, 0.0, 10.0).unwrap();
        assert!(dc.inject_into(&mut sim, &sources).is_err());
    }

    #[test]
    fn test_injection_into_neurons_accepted() {
        let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
        let pop = Population::new(&mut sim, 3, &IfCurrExp, None, None).unwrap();
        let dc = DcSource::new(0.5, 0.0, 10.0).unwrap();
        dc.inject_into(&mut sim, &pop).unwrap();
        let step = StepCurrentSource::new(vec![0.0, 5.0], vec![1.0, 0.0]).unwrap();
        step.inject_into(&mut sim, &pop).unwrap();
    }
}
