// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Immutable sparse connection matrices
//!
//! A matrix stores the connections of one projection in CSR layout keyed by
//! presynaptic local index. Weights and the (homogeneous, per-matrix) delay
//! are fixed at build time: the type exposes no mutating API, so a matrix
//! shared between a projection and the run loop can never drift.
//!
//! Entries with a weight of exactly zero are dropped at build time; the
//! stored entry count is therefore the non-zero count.

use neuroglia_neural::SynapticTarget;

use crate::error::{EngineError, Result};
use crate::ids::GroupId;
use crate::state::EngineState;

/// CSR connection matrix between two cell groups
#[derive(Debug)]
pub struct ConnectionMatrix {
    pre: GroupId,
    post: GroupId,
    pre_n: usize,
    post_n: usize,
    target: SynapticTarget,
    delay_ms: f64,
    delay_steps: u32,
    row_ptr: Vec<usize>,
    col_idx: Vec<u32>,
    weights: Vec<f64>,
}

impl ConnectionMatrix {
    /// Build from (pre_index, post_index, weight) triplets.
    ///
    /// Triplets need not be sorted; zero-weight entries are dropped. Every
    /// index is checked against the group sizes, so a misbehaving wiring
    /// strategy fails here instead of corrupting the run loop.
    pub fn from_triplets(
        pre: GroupId,
        post: GroupId,
        pre_n: usize,
        post_n: usize,
        target: SynapticTarget,
        delay_ms: f64,
        state: &EngineState,
        triplets: &[(u32, u32, f64)],
    ) -> Result<Self> {
        let delay_steps = state.delay_to_steps(delay_ms)?;

        for &(pre_idx, post_idx, _) in triplets {
            if pre_idx as usize >= pre_n {
                return Err(EngineError::CellIndexOutOfRange {
                    index: pre_idx as usize,
                    size: pre_n,
                });
            }
            if post_idx as usize >= post_n {
                return Err(EngineError::CellIndexOutOfRange {
                    index: post_idx as usize,
                    size: post_n,
                });
            }
        }

        let mut counts = vec![0usize; pre_n];
        for &(pre_idx, _, weight) in triplets {
            if weight != 0.0 {
                counts[pre_idx as usize] += 1;
            }
        }

        let mut row_ptr = Vec::with_capacity(pre_n + 1);
        row_ptr.push(0);
        for row in 0..pre_n {
            row_ptr.push(row_ptr[row] + counts[row]);
        }

        let nnz = row_ptr[pre_n];
        let mut col_idx = vec![0u32; nnz];
        let mut weights = vec![0.0f64; nnz];
        let mut cursor = row_ptr.clone();
        for &(pre_idx, post_idx, weight) in triplets {
            if weight != 0.0 {
                let slot = cursor[pre_idx as usize];
                col_idx[slot] = post_idx;
                weights[slot] = weight;
                cursor[pre_idx as usize] += 1;
            }
        }

        Ok(Self {
            pre,
            post,
            pre_n,
            post_n,
            target,
            delay_ms,
            delay_steps,
            row_ptr,
            col_idx,
            weights,
        })
    }

    #[inline]
    pub fn pre(&self) -> GroupId {
        self.pre
    }

    #[inline]
    pub fn post(&self) -> GroupId {
        self.post
    }

    #[inline]
    pub fn pre_len(&self) -> usize {
        self.pre_n
    }

    #[inline]
    pub fn post_len(&self) -> usize {
        self.post_n
    }

    #[inline]
    pub fn target(&self) -> SynapticTarget {
        self.target
    }

    #[inline]
    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    #[inline]
    pub fn delay_steps(&self) -> u32 {
        self.delay_steps
    }

    /// Number of stored (non-zero) connections.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.weights.len()
    }

    /// Stored entries of one presynaptic row as (post_index, weight) pairs.
    pub fn row(&self, pre_idx: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let lo = self.row_ptr[pre_idx as usize];
        let hi = self.row_ptr[pre_idx as usize + 1];
        self.col_idx[lo..hi]
            .iter()
            .copied()
            .zip(self.weights[lo..hi].iter().copied())
    }

    /// Iterate every stored connection in row-major order.
    pub fn iter(&self) -> MatrixEntryIter<'_> {
        MatrixEntryIter {
            matrix: self,
            row: 0,
            slot: 0,
        }
    }
}

/// Row-major iterator over (pre_index, post_index, weight) entries
#[derive(Debug)]
pub struct MatrixEntryIter<'a> {
    matrix: &'a ConnectionMatrix,
    row: usize,
    slot: usize,
}

impl Iterator for MatrixEntryIter<'_> {
    type Item = (u32, u32, f64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.row < self.matrix.pre_n {
            if self.slot < self.matrix.row_ptr[self.row + 1] {
                let slot = self.slot;
                self.slot += 1;
                return Some((
                    self.row as u32,
                    self.matrix.col_idx[slot],
                    self.matrix.weights[slot],
                ));
            }
            self.row += 1;
            if self.row < self.matrix.pre_n {
                self.slot = self.matrix.row_ptr[self.row];
            }
        }
        None
    }
}
