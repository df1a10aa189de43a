// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Populations
//!
//! A population is an array of neurons all of the same type, used as the
//! generic term for layers, columns, nuclei and the like. Construction
//! delegates allocation to the engine and then reshapes the flat id array
//! and locality mask into the dimensionality the caller asked for. Shape is
//! immutable afterwards.

use ndarray::{ArrayD, IxDyn};
use tracing::debug;

use neuroglia_engine::{CellId, GroupId};
use neuroglia_neural::{ParameterSet, StandardCellType};

use crate::error::{ApiError, Result};
use crate::simulation::Simulation;

/// Population shape descriptor: a scalar for one-dimensional populations or
/// a tuple/slice of dimensions, e.g. `(10, 10)` for a 10x10 grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn size(&self) -> usize {
        self.0.iter().product()
    }
}

impl From<usize> for Shape {
    fn from(n: usize) -> Self {
        Shape(vec![n])
    }
}

impl From<(usize, usize)> for Shape {
    fn from((a, b): (usize, usize)) -> Self {
        Shape(vec![a, b])
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((a, b, c): (usize, usize, usize)) -> Self {
        Shape(vec![a, b, c])
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape(dims.to_vec())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape(dims)
    }
}

/// An N-dimensional array of homogeneous model neurons
#[derive(Debug)]
pub struct Population {
    label: String,
    celltype_name: &'static str,
    /// Merged (defaults + overrides) parameter set the group was built from
    parameters: ParameterSet,
    shape: Shape,
    group: GroupId,
    /// Every cell id, reshaped to the requested dimensions
    all_cells: ArrayD<CellId>,
    /// Locality mask, same shape as `all_cells`
    mask_local: ArrayD<bool>,
    /// Cells resident on this process, in id order
    local_cells: Vec<CellId>,
    first_id: CellId,
    last_id: CellId,
}

impl Population {
    /// Create a population of `shape` cells of the given standard type.
    ///
    /// `cellparams` are overrides onto the cell type's defaults; unknown
    /// names and out-of-domain values are construction errors. Without a
    /// `label` an auto-generated `population<N>` name is used.
    pub fn new(
        sim: &mut Simulation,
        shape: impl Into<Shape>,
        cellclass: &dyn StandardCellType,
        cellparams: Option<&ParameterSet>,
        label: Option<&str>,
    ) -> Result<Self> {
        let shape = shape.into();
        let size = shape.size();
        if size == 0 {
            return Err(ApiError::InvalidShape(format!(
                "population shape {:?} has zero cells",
                shape.dims()
            )));
        }

        let parameters = cellclass.checked_parameters(cellparams)?;
        let native = cellclass.translate(&parameters)?;

        let allocation = sim.net_mut().create_cells(&native, size)?;
        let local_cells: Vec<CellId> = allocation
            .all_cells
            .iter()
            .zip(allocation.mask_local.iter())
            .filter(|(_, local)| **local)
            .map(|(cell, _)| *cell)
            .collect();

        let dims = IxDyn(shape.dims());
        let all_cells = allocation
            .all_cells
            .into_shape_with_order(dims.clone())
            .map_err(|e| ApiError::InvalidShape(e.to_string()))?;
        let mask_local = allocation
            .mask_local
            .into_shape_with_order(dims)
            .map_err(|e| ApiError::InvalidShape(e.to_string()))?;

        let label = sim.allocate_population_label(label);
        debug!(
            label = %label,
            celltype = cellclass.model_name(),
            size,
            local = local_cells.len(),
            "population created"
        );
        Ok(Self {
            label,
            celltype_name: cellclass.model_name(),
            parameters,
            shape,
            group: allocation.group,
            all_cells,
            mask_local,
            local_cells,
            first_id: allocation.first_id,
            last_id: allocation.last_id,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn celltype_name(&self) -> &'static str {
        self.celltype_name
    }

    /// The merged parameter set the population was constructed with.
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Requested dimensions.
    pub fn dim(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Every cell id, in the requested shape.
    pub fn all_cells(&self) -> &ArrayD<CellId> {
        &self.all_cells
    }

    /// Boolean mask marking the cells resident on this process.
    pub fn mask_local(&self) -> &ArrayD<bool> {
        &self.mask_local
    }

    /// Cells resident on this process, in id order.
    pub fn local_cells(&self) -> &[CellId] {
        &self.local_cells
    }

    pub fn first_id(&self) -> CellId {
        self.first_id
    }

    pub fn last_id(&self) -> CellId {
        self.last_id
    }

    /// Cell id at a flat (row-major) index.
    pub fn cell_at(&self, index: usize) -> Option<CellId> {
        self.all_cells.iter().nth(index).copied()
    }

    /// Flat (row-major) index of a cell in this population.
    pub fn index_of(&self, cell: CellId) -> Option<usize> {
        if cell < self.first_id || cell > self.last_id {
            return None;
        }
        Some((cell.0 - self.first_id.0) as usize)
    }

    pub(crate) fn group_id(&self) -> GroupId {
        self.group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SetupOptions;
    use neuroglia_neural::IfCurrExp;

    fn sim() -> Simulation {
        Simulation::setup(SetupOptions::default()).unwrap()
    }

    #[test]
    fn test_shape_matches_request() {
        let mut sim = sim();
        let pop = Population::new(&mut sim, (4, 5), &IfCurrExp, None, None).unwrap();
        assert_eq!(pop.all_cells().shape(), &[4, 5]);
        assert_eq!(pop.mask_local().shape(), &[4, 5]);
        assert_eq!(pop.size(), 20);

        let pop1d = Population::new(&mut sim, 7, &IfCurrExp, None, None).unwrap();
        assert_eq!(pop1d.all_cells().shape(), &[7]);
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut sim = sim();
        assert!(matches!(
            Population::new(&mut sim, (3, 0), &IfCurrExp, None, None),
            Err(ApiError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_local_cells_match_mask() {
        let options = SetupOptions {
            num_processes: 3,
            rank: 0,
            ..SetupOptions::default()
        };
        let mut sim = Simulation::setup(options).unwrap();
        let pop = Population::new(&mut sim, 10, &IfCurrExp, None, None).unwrap();

        let expected: Vec<CellId> = pop
            .all_cells()
            .iter()
            .zip(pop.mask_local().iter())
            .filter(|(_, local)| **local)
            .map(|(cell, _)| *cell)
            .collect();
        assert_eq!(pop.local_cells(), expected.as_slice());
        assert_eq!(pop.local_cells().len(), 4); // ids 0, 3, 6, 9
    }

    #[test]
    fn test_auto_labels_strictly_increase() {
        let mut sim = sim();
        let a = Population::new(&mut sim, 2, &IfCurrExp, None, None).unwrap();
        let b = Population::new(&mut sim, 2, &IfCurrExp, None, Some("named")).unwrap();
        let c = Population::new(&mut sim, 2, &IfCurrExp, None, None).unwrap();
        assert_eq!(a.label(), "population0");
        assert_eq!(b.label(), "named");
        assert_eq!(c.label(), "population2");
    }

    #[test]
    fn test_parameter_overrides_applied() {
        let mut sim = sim();
        let params = ParameterSet::new().with("v_thresh", -40.0);
        let pop = Population::new(&mut sim, 3, &IfCurrExp, Some(&params), None).unwrap();
        assert_eq!(pop.parameters().scalar("v_thresh").unwrap(), -40.0);
        assert_eq!(pop.parameters().scalar("tau_m").unwrap(), 20.0);
    }

    #[test]
    fn test_id_bounds_and_indexing() {
        let mut sim = sim();
        let a = Population::new(&mut sim, (2, 3), &IfCurrExp, None, None).unwrap();
        let b = Population::new(&mut sim, 4, &IfCurrExp, None, None).unwrap();
        assert_eq!(a.first_id(), CellId(0));
        assert_eq!(a.last_id(), CellId(5));
        assert_eq!(b.first_id(), CellId(6));
        assert_eq!(a.cell_at(4), Some(CellId(4)));
        assert_eq!(b.index_of(CellId(7)), Some(1));
        assert_eq!(b.index_of(CellId(2)), None);
    }
}
