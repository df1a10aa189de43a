// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spike and voltage recorders
//!
//! A recorder watches one variable of one group's recorded cells and buffers
//! samples in memory; `write` appends everything not yet flushed to the
//! output file. The first flush creates the file with a `#`-prefixed JSON
//! metadata header; later flushes only append, so calling `write` twice
//! never duplicates rows.
//!
//! File format, one row per sample:
//! ```text
//! # {"label":"exc","variable":"spikes","dt":0.1,...}
//! <time_ms> <cell_id>            (spikes)
//! <time_ms> <cell_id> <v_mV>     (voltage)
//! ```

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::ids::GroupId;

/// Which variable a recorder samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordedVariable {
    Spikes,
    Voltage,
}

impl RecordedVariable {
    pub fn name(&self) -> &'static str {
        match self {
            RecordedVariable::Spikes => "spikes",
            RecordedVariable::Voltage => "v",
        }
    }
}

/// One recorded sample: time, global cell id, optional value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub cell: u32,
    pub value: Option<f64>,
}

/// Buffered recorder for one (group, variable) pair
#[derive(Debug)]
pub struct Recorder {
    group: GroupId,
    variable: RecordedVariable,
    label: String,
    path: PathBuf,
    /// Local indices of the recorded cells (this process only)
    recorded: Vec<u32>,
    first_id: u32,
    samples: Vec<Sample>,
    /// Number of samples already flushed to disk
    written: usize,
    dt: f64,
}

impl Recorder {
    pub(crate) fn new(
        group: GroupId,
        variable: RecordedVariable,
        label: &str,
        output_dir: &Path,
        recorded: Vec<u32>,
        first_id: u32,
        dt: f64,
    ) -> Self {
        let file_name = format!("{}.{}", label, variable.name());
        Self {
            group,
            variable,
            label: label.to_string(),
            path: output_dir.join(file_name),
            recorded,
            first_id,
            samples: Vec::new(),
            written: 0,
            dt,
        }
    }

    #[inline]
    pub fn group(&self) -> GroupId {
        self.group
    }

    #[inline]
    pub fn variable(&self) -> RecordedVariable {
        self.variable
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub(crate) fn push_spikes(&mut self, time: f64, fired: &[u32]) {
        // `fired` is small most steps; recorded membership via binary search
        // (recorded indices are sorted at construction).
        for &idx in fired {
            if self.recorded.binary_search(&idx).is_ok() {
                self.samples.push(Sample {
                    time,
                    cell: self.first_id + idx,
                    value: None,
                });
            }
        }
    }

    pub(crate) fn push_voltages(&mut self, time: f64, voltages: &ndarray::Array1<f64>) {
        for &idx in &self.recorded {
            self.samples.push(Sample {
                time,
                cell: self.first_id + idx,
                value: Some(voltages[idx as usize]),
            });
        }
    }

    /// Flush unwritten samples to the output file.
    ///
    /// `gather` mirrors the distributed API: with emulated single-transport
    /// runs there is nothing to gather, so the flag only ends up in the
    /// metadata header.
    pub fn write(&mut self, gather: bool) -> Result<()> {
        if self.written == 0 {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let header = json!({
                "label": self.label,
                "variable": self.variable.name(),
                "dt": self.dt,
                "n_cells": self.recorded.len(),
                "first_id": self.first_id,
                "gather": gather,
                "written_at": chrono::Utc::now().to_rfc3339(),
            });
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?;
            writeln!(file, "# {}", header)?;
        }
        if self.written < self.samples.len() {
            let mut file = OpenOptions::new().append(true).open(&self.path)?;
            for sample in &self.samples[self.written..] {
                match sample.value {
                    Some(v) => writeln!(file, "{:.4} {} {:.6}", sample.time, sample.cell, v)?,
                    None => writeln!(file, "{:.4} {}", sample.time, sample.cell)?,
                }
            }
        }
        debug!(
            label = %self.label,
            variable = self.variable.name(),
            flushed = self.samples.len() - self.written,
            "recorder flushed"
        );
        self.written = self.samples.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_spike_filtering_by_recorded_set() {
        let dir = tempdir().unwrap();
        let mut recorder = Recorder::new(
            GroupId(0),
            RecordedVariable::Spikes,
            "pop0",
            dir.path(),
            vec![0, 2],
            10,
            0.1,
        );
        recorder.push_spikes(1.0, &[0, 1, 2]);
        assert_eq!(recorder.sample_count(), 2);
        assert_eq!(recorder.samples[0].cell, 10);
        assert_eq!(recorder.samples[1].cell, 12);
    }

    #[test]
    fn test_write_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut recorder = Recorder::new(
            GroupId(0),
            RecordedVariable::Spikes,
            "pop0",
            dir.path(),
            vec![0, 1],
            0,
            0.1,
        );
        recorder.push_spikes(0.5, &[1]);
        recorder.write(false).unwrap();
        recorder.write(false).unwrap();

        let contents = std::fs::read_to_string(recorder.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("# {"));
        assert_eq!(lines[1], "0.5000 1");
    }
}
