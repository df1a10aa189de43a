// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Global engine state
//!
//! One [`EngineState`] per network: timestep, current time, delay bounds and
//! the emulated process layout. The original design kept this as a
//! process-wide singleton; here it is an owned field of the network so two
//! simulations never share clocks.

use crate::error::{EngineError, Result};

/// Timestep, clock and process layout for one network
#[derive(Debug, Clone)]
pub struct EngineState {
    /// Integration timestep in ms
    dt: f64,
    /// Smallest admissible synaptic delay in ms
    min_delay: f64,
    /// Largest admissible synaptic delay in ms
    max_delay: f64,
    /// Completed steps since construction
    step: u64,
    /// Rank of this (emulated) process
    rank: usize,
    /// Advertised process count for locality partitioning
    num_processes: usize,
    /// Next cell id to hand out
    next_cell_id: u32,
}

impl EngineState {
    pub fn new(
        dt: f64,
        min_delay: f64,
        max_delay: f64,
        rank: usize,
        num_processes: usize,
    ) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(EngineError::InvalidTimestep(dt));
        }
        if !(min_delay > 0.0 && max_delay >= min_delay) {
            return Err(EngineError::InvalidDelayBounds {
                min_delay,
                max_delay,
            });
        }
        if num_processes == 0 || rank >= num_processes {
            return Err(EngineError::InvalidProcessLayout {
                rank,
                num_processes,
            });
        }
        Ok(Self {
            dt,
            min_delay,
            max_delay,
            step: 0,
            rank,
            num_processes,
            next_cell_id: 0,
        })
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[inline]
    pub fn min_delay(&self) -> f64 {
        self.min_delay
    }

    #[inline]
    pub fn max_delay(&self) -> f64 {
        self.max_delay
    }

    #[inline]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Current simulation time in ms
    #[inline]
    pub fn time(&self) -> f64 {
        self.step as f64 * self.dt
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    #[inline]
    pub fn num_processes(&self) -> usize {
        self.num_processes
    }

    pub(crate) fn advance_step(&mut self) {
        self.step += 1;
    }

    /// Convert a run duration to a whole number of steps, rounding up so the
    /// requested interval is always covered.
    pub fn duration_to_steps(&self, duration: f64) -> Result<u64> {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(EngineError::NegativeDuration(duration));
        }
        Ok((duration / self.dt).ceil() as u64)
    }

    /// Convert a delay in ms to delivery steps, enforcing the configured
    /// bounds. Delays always round to at least one step so recurrent wiring
    /// stays causal.
    pub fn delay_to_steps(&self, delay: f64) -> Result<u32> {
        if !(delay.is_finite()
            && delay >= self.min_delay
            && delay <= self.max_delay)
        {
            return Err(EngineError::DelayOutOfRange {
                delay,
                min_delay: self.min_delay,
                max_delay: self.max_delay,
            });
        }
        Ok(((delay / self.dt).round() as u32).max(1))
    }

    /// Allocate `n` consecutive cell ids, returning the first.
    pub(crate) fn allocate_cell_ids(&mut self, n: usize) -> u32 {
        let first = self.next_cell_id;
        self.next_cell_id += n as u32;
        first
    }

    /// Round-robin locality partition: cell `id` is local iff
    /// `id % num_processes == rank`.
    #[inline]
    pub fn is_local(&self, id: u32) -> bool {
        id as usize % self.num_processes == self.rank
    }
}
