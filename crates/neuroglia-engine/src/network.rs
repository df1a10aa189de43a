// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The network aggregator and run loop
//!
//! A [`Network`] owns everything that participates in a run: the engine
//! state, every cell group, the registered connection matrices with their
//! in-flight delivery queues, attached current sources, and the recorder
//! list. The original design held this aggregate in backend-global mutable
//! state; here it is an owned value threaded through the API layer's
//! simulation context.
//!
//! ## Step order
//!
//! 1. advance the clock
//! 2. clear injected currents, evaluate current sources
//! 3. deliver matrix arrivals that fall due this step
//! 4. update every group, collecting fired cells
//! 5. enqueue new arrivals for every matrix whose presynaptic group fired
//! 6. recorders sample spikes and voltages
//!
//! Delays round to at least one step, so recurrent wiring never delivers
//! within the step that produced the spike.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use neuroglia_neural::NativeParameters;

use crate::error::{EngineError, Result};
use crate::group::CellGroup;
use crate::ids::{CellId, GroupId, MatrixId, SourceId};
use crate::matrix::ConnectionMatrix;
use crate::recorder::{RecordedVariable, Recorder};
use crate::sources::CurrentSource;
use crate::state::EngineState;

/// Result of a cell allocation: the full id array, locality mask and id
/// bounds, all still flat (the API layer reshapes them).
#[derive(Debug, Clone)]
pub struct CellAllocation {
    pub group: GroupId,
    pub all_cells: Array1<CellId>,
    pub mask_local: Array1<bool>,
    pub first_id: CellId,
    pub last_id: CellId,
}

#[derive(Debug)]
struct MatrixRuntime {
    matrix: Arc<ConnectionMatrix>,
    /// In-flight deliveries: (due step, fired presynaptic indices). Due
    /// steps are monotone because the per-matrix delay is constant.
    pending: VecDeque<(u64, Vec<u32>)>,
}

#[derive(Debug)]
struct SourceRuntime {
    source: CurrentSource,
    /// (group index, local cell index) attachment points
    cells: Vec<(usize, u32)>,
}

/// The backend network: groups, matrices, sources, recorders and the clock
#[derive(Debug)]
pub struct Network {
    state: EngineState,
    groups: Vec<CellGroup>,
    matrices: Vec<MatrixRuntime>,
    sources: Vec<SourceRuntime>,
    recorders: Vec<Recorder>,
    recorder_index: AHashMap<(GroupId, RecordedVariable), usize>,
    rng: StdRng,
    /// Scratch per-group fired lists, reused across steps
    fired: Vec<Vec<u32>>,
}

impl Network {
    pub fn new(state: EngineState, seed: u64) -> Self {
        Self {
            state,
            groups: Vec::new(),
            matrices: Vec::new(),
            sources: Vec::new(),
            recorders: Vec::new(),
            recorder_index: AHashMap::new(),
            rng: StdRng::seed_from_u64(seed),
            fired: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn group(&self, id: GroupId) -> Result<&CellGroup> {
        self.groups.get(id.0).ok_or(EngineError::GroupNotFound(id))
    }

    /// Allocate a group of `n` cells with the given native parameters.
    ///
    /// Ids are handed out densely in allocation order; the locality mask is
    /// the round-robin partition from the engine state.
    pub fn create_cells(&mut self, native: &NativeParameters, n: usize) -> Result<CellAllocation> {
        if n == 0 {
            return Err(EngineError::EmptyGroup);
        }
        let first = self.state.allocate_cell_ids(n);
        let group_id = GroupId(self.groups.len());
        let group = CellGroup::new(group_id, first, n, native, self.state.dt())?;
        self.groups.push(group);
        self.fired.push(Vec::new());

        let all_cells = Array1::from_iter((first..first + n as u32).map(CellId));
        let mask_local =
            Array1::from_iter((first..first + n as u32).map(|id| self.state.is_local(id)));
        debug!(group = %group_id, n, first_id = first, "cell group allocated");
        Ok(CellAllocation {
            group: group_id,
            all_cells,
            mask_local,
            first_id: CellId(first),
            last_id: CellId(first + n as u32 - 1),
        })
    }

    /// Register a connection matrix for the run loop. Returns the handle and
    /// the shared immutable matrix.
    pub fn add_matrix(
        &mut self,
        matrix: ConnectionMatrix,
    ) -> Result<(MatrixId, Arc<ConnectionMatrix>)> {
        let pre = self.group(matrix.pre())?;
        let post = self.group(matrix.post())?;
        if post.is_source() {
            return Err(EngineError::SourceAsTarget(post.id()));
        }
        if pre.len() != matrix.pre_len() || post.len() != matrix.post_len() {
            return Err(EngineError::MatrixShapeMismatch(format!(
                "matrix is {}x{} but groups are {}x{}",
                matrix.pre_len(),
                matrix.post_len(),
                pre.len(),
                post.len()
            )));
        }
        let id = MatrixId(self.matrices.len());
        let matrix = Arc::new(matrix);
        self.matrices.push(MatrixRuntime {
            matrix: Arc::clone(&matrix),
            pending: VecDeque::new(),
        });
        debug!(matrix = %id, nnz = matrix.nnz(), delay_steps = matrix.delay_steps(), "matrix registered");
        Ok((id, matrix))
    }

    pub fn matrix(&self, id: MatrixId) -> Option<&Arc<ConnectionMatrix>> {
        self.matrices.get(id.0).map(|m| &m.matrix)
    }

    /// Attach a current source to the given cells.
    pub fn attach_current_source(
        &mut self,
        source: CurrentSource,
        cells: &[CellId],
    ) -> Result<SourceId> {
        let mut attachment = Vec::with_capacity(cells.len());
        for &cell in cells {
            let (group_idx, local) = self.locate(cell)?;
            if self.groups[group_idx].is_source() {
                return Err(EngineError::InjectIntoSource(self.groups[group_idx].id()));
            }
            attachment.push((group_idx, local));
        }
        let id = SourceId(self.sources.len());
        self.sources.push(SourceRuntime {
            source,
            cells: attachment,
        });
        Ok(id)
    }

    /// Attach a recorder for `(group, variable)` over the given cells.
    ///
    /// Repeated attachment for the same pair is a no-op returning `false`.
    pub fn attach_recorder(
        &mut self,
        group: GroupId,
        variable: RecordedVariable,
        label: &str,
        output_dir: &Path,
        cells: &[CellId],
    ) -> Result<bool> {
        if self.recorder_index.contains_key(&(group, variable)) {
            return Ok(false);
        }
        let group_ref = self.group(group)?;
        if variable == RecordedVariable::Voltage && group_ref.voltages().is_none() {
            return Err(EngineError::NoVoltage(group));
        }
        let mut recorded = Vec::with_capacity(cells.len());
        for &cell in cells {
            recorded.push(group_ref.local_index(cell)? as u32);
        }
        recorded.sort_unstable();
        recorded.dedup();
        let recorder = Recorder::new(
            group,
            variable,
            label,
            output_dir,
            recorded,
            group_ref.first_id(),
            self.state.dt(),
        );
        self.recorder_index
            .insert((group, variable), self.recorders.len());
        self.recorders.push(recorder);
        Ok(true)
    }

    pub fn recorders(&self) -> &[Recorder] {
        &self.recorders
    }

    /// Flush every recorder to its output file.
    pub fn write_recorders(&mut self, gather: bool) -> Result<()> {
        for recorder in &mut self.recorders {
            recorder.write(gather)?;
        }
        Ok(())
    }

    /// Forward a scalar parameter update to a group.
    pub fn set_group_parameter(&mut self, group: GroupId, name: &str, value: f64) -> Result<()> {
        let dt = self.state.dt();
        self.groups
            .get_mut(group.0)
            .ok_or(EngineError::GroupNotFound(group))?
            .set_parameter(name, value, dt)
    }

    /// Map a global cell id to (group index, local index).
    fn locate(&self, cell: CellId) -> Result<(usize, u32)> {
        // Groups hold contiguous, increasing id ranges.
        let idx = self
            .groups
            .partition_point(|g| g.first_id() + g.len() as u32 <= cell.0);
        match self.groups.get(idx) {
            Some(group) if group.contains(cell) => Ok((idx, cell.0 - group.first_id())),
            _ => Err(EngineError::CellNotFound(cell)),
        }
    }

    /// Advance the network by `duration` ms (rounded up to whole steps) and
    /// return the new current time.
    pub fn run(&mut self, duration: f64) -> Result<f64> {
        let steps = self.state.duration_to_steps(duration)?;
        info!(
            duration_ms = duration,
            steps,
            from_ms = self.state.time(),
            "advancing network"
        );
        for _ in 0..steps {
            self.step();
        }
        Ok(self.state.time())
    }

    fn step(&mut self) {
        self.state.advance_step();
        let t = self.state.time();
        let step = self.state.step();

        // Phase 2: injected currents
        for group in &mut self.groups {
            group.begin_step();
        }
        for source in &self.sources {
            let amplitude = source.source.amplitude_at(t);
            if amplitude != 0.0 {
                for &(group_idx, local) in &source.cells {
                    self.groups[group_idx].inject(local as usize, amplitude);
                }
            }
        }

        // Phase 3: deliveries falling due this step
        for m in 0..self.matrices.len() {
            let matrix = Arc::clone(&self.matrices[m].matrix);
            let post = matrix.post().0;
            let target = matrix.target();
            while self.matrices[m]
                .pending
                .front()
                .is_some_and(|(due, _)| *due == step)
            {
                if let Some((_, batch)) = self.matrices[m].pending.pop_front() {
                    for pre_idx in batch {
                        for (post_idx, weight) in matrix.row(pre_idx) {
                            self.groups[post].add_synaptic_input(target, post_idx as usize, weight);
                        }
                    }
                }
            }
        }

        // Phase 4: group updates
        for g in 0..self.groups.len() {
            self.fired[g].clear();
            self.groups[g].update(&self.state, &mut self.rng, &mut self.fired[g]);
        }

        // Phase 5: enqueue new arrivals
        for m in &mut self.matrices {
            let pre = m.matrix.pre().0;
            if !self.fired[pre].is_empty() {
                m.pending
                    .push_back((step + m.matrix.delay_steps() as u64, self.fired[pre].clone()));
            }
        }

        // Phase 6: recorders
        for recorder in &mut self.recorders {
            let g = recorder.group().0;
            match recorder.variable() {
                RecordedVariable::Spikes => recorder.push_spikes(t, &self.fired[g]),
                RecordedVariable::Voltage => {
                    if let Some(v) = self.groups[g].voltages() {
                        recorder.push_voltages(t, v);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuroglia_neural::{
        ArraySourceParameters, IfCurrExp, StandardCellType, SynapticTarget,
    };
    use tempfile::tempdir;

    fn network() -> Network {
        let state = EngineState::new(0.1, 0.1, 10.0, 0, 1).unwrap();
        Network::new(state, 42)
    }

    fn lif_native() -> NativeParameters {
        IfCurrExp.translate(&IfCurrExp.default_parameters()).unwrap()
    }

    #[test]
    fn test_allocation_is_dense_and_contiguous() {
        let mut net = network();
        let a = net.create_cells(&lif_native(), 3).unwrap();
        let b = net.create_cells(&lif_native(), 2).unwrap();
        assert_eq!(a.first_id, CellId(0));
        assert_eq!(a.last_id, CellId(2));
        assert_eq!(b.first_id, CellId(3));
        assert_eq!(b.last_id, CellId(4));
        assert!(a.mask_local.iter().all(|local| *local));
    }

    #[test]
    fn test_locality_mask_round_robin() {
        let state = EngineState::new(0.1, 0.1, 10.0, 1, 2).unwrap();
        let mut net = Network::new(state, 0);
        let alloc = net.create_cells(&lif_native(), 5).unwrap();
        let mask: Vec<bool> = alloc.mask_local.to_vec();
        assert_eq!(mask, vec![false, true, false, true, false]);
    }

    #[test]
    fn test_matrix_onto_source_rejected() {
        let mut net = network();
        let lif = net.create_cells(&lif_native(), 2).unwrap();
        let source_native = NativeParameters::ArraySource(ArraySourceParameters {
            spike_times: vec![],
        });
        let src = net.create_cells(&source_native, 2).unwrap();
        let matrix = ConnectionMatrix::from_triplets(
            lif.group,
            src.group,
            2,
            2,
            SynapticTarget::Excitatory,
            1.0,
            net.state(),
            &[(0, 0, 1.0)],
        )
        .unwrap();
        assert!(matches!(
            net.add_matrix(matrix),
            Err(EngineError::SourceAsTarget(_))
        ));
    }

    #[test]
    fn test_run_advances_clock() {
        let mut net = network();
        let t = net.run(10.0).unwrap();
        assert!((t - 10.0).abs() < 1e-9);
        let t = net.run(0.0).unwrap();
        assert!((t - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_spike_propagation_drives_postsynaptic_cell() {
        let mut net = network();
        // One source cell firing early, strongly coupled to one LIF cell.
        let source_native = NativeParameters::ArraySource(ArraySourceParameters {
            spike_times: vec![1.0, 1.5, 2.0, 2.5, 3.0],
        });
        let src = net.create_cells(&source_native, 1).unwrap();
        let post = net.create_cells(&lif_native(), 1).unwrap();
        let matrix = ConnectionMatrix::from_triplets(
            src.group,
            post.group,
            1,
            1,
            SynapticTarget::Excitatory,
            0.1,
            net.state(),
            &[(0, 0, 50.0)],
        )
        .unwrap();
        net.add_matrix(matrix).unwrap();

        let dir = tempdir().unwrap();
        net.attach_recorder(
            post.group,
            RecordedVariable::Spikes,
            "post",
            dir.path(),
            &post.all_cells.to_vec(),
        )
        .unwrap();

        net.run(20.0).unwrap();
        assert!(net.recorders()[0].sample_count() > 0);
    }

    #[test]
    fn test_dc_source_fires_cell() {
        let mut net = network();
        let post = net.create_cells(&lif_native(), 1).unwrap();
        net.attach_current_source(
            CurrentSource::Dc {
                amplitude: 10.0,
                start: 0.0,
                stop: 100.0,
            },
            &post.all_cells.to_vec(),
        )
        .unwrap();
        let dir = tempdir().unwrap();
        net.attach_recorder(
            post.group,
            RecordedVariable::Spikes,
            "dc",
            dir.path(),
            &post.all_cells.to_vec(),
        )
        .unwrap();
        net.run(100.0).unwrap();
        assert!(net.recorders()[0].sample_count() > 0);
    }

    #[test]
    fn test_duplicate_recorder_is_noop() {
        let mut net = network();
        let alloc = net.create_cells(&lif_native(), 1).unwrap();
        let dir = tempdir().unwrap();
        let cells = alloc.all_cells.to_vec();
        assert!(net
            .attach_recorder(alloc.group, RecordedVariable::Spikes, "a", dir.path(), &cells)
            .unwrap());
        assert!(!net
            .attach_recorder(alloc.group, RecordedVariable::Spikes, "a", dir.path(), &cells)
            .unwrap());
        assert_eq!(net.recorders().len(), 1);
    }
}
