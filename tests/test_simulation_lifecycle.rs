// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the simulation lifecycle: setup, running, current
//! injection, recording and output files.

use std::path::PathBuf;

use tempfile::tempdir;

use neuroglia::{
    connect, create, record, record_v, set, AllToAllConnector, DcSource, IfCurrExp,
    ParameterSet, Population, Projection, ProjectionOptions, SetupOptions, Simulation,
    SpikeSourceArray, SpikeSourcePoisson, StepCurrentSource,
};

fn options_with_output(dir: PathBuf) -> SetupOptions {
    SetupOptions {
        output_dir: dir,
        ..SetupOptions::default()
    }
}

#[test]
fn test_clock_advances_by_requested_duration() {
    let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
    assert_eq!(sim.get_current_time(), 0.0);
    assert_eq!(sim.get_time_step(), 0.1);

    let t = sim.run(10.0).unwrap();
    assert!((t - 10.0).abs() < 1e-9);
    let t = sim.run(2.5).unwrap();
    assert!((t - 12.5).abs() < 1e-9);
    assert!((sim.get_current_time() - 12.5).abs() < 1e-9);
}

#[test]
fn test_delay_bounds_exposed() {
    let options = SetupOptions {
        timestep: 0.5,
        min_delay: 1.0,
        max_delay: 15.0,
        ..SetupOptions::default()
    };
    let sim = Simulation::setup(options).unwrap();
    assert_eq!(sim.get_min_delay(), 1.0);
    assert_eq!(sim.get_max_delay(), 15.0);
    assert_eq!(sim.num_processes(), 1);
    assert_eq!(sim.rank(), 0);
}

#[test]
fn test_negative_duration_rejected() {
    let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
    assert!(sim.run(-1.0).is_err());
}

#[test]
fn test_spike_propagation_through_projection() {
    let dir = tempdir().unwrap();
    let mut sim = Simulation::setup(options_with_output(dir.path().to_path_buf())).unwrap();

    let times = ParameterSet::new().with("spike_times", vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    let stim = Population::new(&mut sim, 1, &SpikeSourceArray, Some(&times), Some("stim")).unwrap();
    let post = Population::new(&mut sim, 1, &IfCurrExp, None, Some("post")).unwrap();
    Projection::new(
        &mut sim,
        &stim,
        &post,
        &AllToAllConnector::new(50.0, Some(0.1)),
        ProjectionOptions::default(),
    )
    .unwrap();

    sim.record(&stim).unwrap();
    sim.record(&post).unwrap();
    sim.run(20.0).unwrap();
    sim.end(false).unwrap();

    let stim_rows = data_rows(&dir.path().join("stim.spikes"));
    assert_eq!(stim_rows.len(), 5);
    let post_rows = data_rows(&dir.path().join("post.spikes"));
    assert!(!post_rows.is_empty());
}

#[test]
fn test_voltage_recording_file_format() {
    let dir = tempdir().unwrap();
    let mut sim = Simulation::setup(options_with_output(dir.path().to_path_buf())).unwrap();
    let pop = Population::new(&mut sim, 2, &IfCurrExp, None, Some("cells")).unwrap();
    sim.record_v(&pop).unwrap();

    sim.run(1.0).unwrap();
    sim.end(true).unwrap();

    let path = dir.path().join("cells.v");
    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("# {"));
    assert!(header.contains("\"variable\":\"v\""));
    // 10 steps, 2 cells, 3 columns per row.
    let rows: Vec<_> = lines.collect();
    assert_eq!(rows.len(), 20);
    assert!(rows.iter().all(|r| r.split_whitespace().count() == 3));
}

#[test]
fn test_end_is_idempotent() {
    let dir = tempdir().unwrap();
    let mut sim = Simulation::setup(options_with_output(dir.path().to_path_buf())).unwrap();
    let pop = Population::new(&mut sim, 1, &IfCurrExp, None, Some("idem")).unwrap();
    sim.record_v(&pop).unwrap();
    sim.run(1.0).unwrap();

    sim.end(false).unwrap();
    let first = std::fs::read_to_string(dir.path().join("idem.v")).unwrap();
    sim.end(false).unwrap();
    let second = std::fs::read_to_string(dir.path().join("idem.v")).unwrap();
    assert_eq!(first.lines().count(), second.lines().count());
}

#[test]
fn test_voltage_recording_of_spike_source_rejected() {
    let mut sim = Simulation::setup(SetupOptions::default()).unwrap();
    let sources = Population::new(&mut sim, 2, &SpikeSourcePoisson, None, None).unwrap();
    assert!(sim.record_v(&sources).is_err());
    assert!(sim.record(&sources).is_ok());
}

#[test]
fn test_dc_injection_drives_spiking() {
    let dir = tempdir().unwrap();
    let mut sim = Simulation::setup(options_with_output(dir.path().to_path_buf())).unwrap();
    let pop = Population::new(&mut sim, 1, &IfCurrExp, None, Some("driven")).unwrap();
    DcSource::new(10.0, 0.0, 100.0)
        .unwrap()
        .inject_into(&mut sim, &pop)
        .unwrap();
    sim.record(&pop).unwrap();
    sim.run(100.0).unwrap();
    sim.end(false).unwrap();

    let rows = data_rows(&dir.path().join("driven.spikes"));
    assert!(rows.len() > 1);
}

#[test]
fn test_step_current_window() {
    let dir = tempdir().unwrap();
    let mut sim = Simulation::setup(options_with_output(dir.path().to_path_buf())).unwrap();
    let pop = Population::new(&mut sim, 1, &IfCurrExp, None, Some("stepped")).unwrap();
    // Current on only between 50 and 80 ms.
    StepCurrentSource::new(vec![50.0, 80.0], vec![10.0, 0.0])
        .unwrap()
        .inject_into(&mut sim, &pop)
        .unwrap();
    sim.record(&pop).unwrap();
    sim.run(120.0).unwrap();
    sim.end(false).unwrap();

    let rows = data_rows(&dir.path().join("stepped.spikes"));
    assert!(!rows.is_empty());
    for row in &rows {
        let t: f64 = row.split_whitespace().next().unwrap().parse().unwrap();
        assert!((50.0..=81.0).contains(&t), "spike at {t} outside window");
    }
}

#[test]
fn test_poisson_rate_zero_is_silent() {
    let dir = tempdir().unwrap();
    let mut sim = Simulation::setup(options_with_output(dir.path().to_path_buf())).unwrap();
    let params = ParameterSet::new().with("rate", 0.0);
    let silent =
        Population::new(&mut sim, 5, &SpikeSourcePoisson, Some(&params), Some("silent")).unwrap();
    sim.record(&silent).unwrap();
    sim.run(100.0).unwrap();
    sim.end(false).unwrap();

    assert!(data_rows(&dir.path().join("silent.spikes")).is_empty());
}

#[test]
fn test_lowlevel_roundtrip() {
    let dir = tempdir().unwrap();
    let mut sim = Simulation::setup(options_with_output(dir.path().to_path_buf())).unwrap();
    let pre = create(&mut sim, &IfCurrExp, None, 4).unwrap();
    let post = create(&mut sim, &IfCurrExp, None, 4).unwrap();
    let prj = connect(&mut sim, &pre, &post, 0.5, Some(1.0), Some("excitatory"), 1.0).unwrap();
    assert_eq!(prj.len(), 16);

    set(&mut sim, &pre, "i_offset", 5.0).unwrap();
    record(&mut sim, &pre).unwrap();
    record_v(&mut sim, &post).unwrap();
    sim.run(50.0).unwrap();
    sim.end(true).unwrap();

    assert!(!data_rows(&dir.path().join("population0.spikes")).is_empty());
    assert!(!data_rows(&dir.path().join("population1.v")).is_empty());
}

/// Non-header rows of a recorder output file.
fn data_rows(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.starts_with('#') && !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}
