/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use crate::error::ConfigError;

/// An `s x s` logical grid overlaid on `s * s` linearly-ranked workers.
///
/// Rank `r` sits at grid coordinate `(r / s, r % s)`. The grid is the single
/// source of wrap-around neighbor arithmetic: both the one-time alignment
/// (multi-step shifts) and the per-round rotation (single-step shifts) go
/// through [`shift_in_row`](ProcessGrid::shift_in_row) and
/// [`shift_in_col`](ProcessGrid::shift_in_col), so there is exactly one
/// definition of "left" and "up".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessGrid {
    side: usize,
}

impl ProcessGrid {
    /// Build the grid for `workers` ranks.
    ///
    /// Fails if `workers` is zero or not a perfect square. Every worker can
    /// perform this check from the worker count alone, before any
    /// communication.
    pub fn new(workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        let side = workers.isqrt();
        if side * side != workers {
            return Err(ConfigError::NonSquareWorkerCount { workers });
        }
        Ok(Self { side })
    }

    /// The side length `s` of the grid.
    pub fn side(&self) -> usize {
        self.side
    }

    /// The total number of workers `s * s`.
    pub fn workers(&self) -> usize {
        self.side * self.side
    }

    /// Grid coordinate `(row, col)` of `rank`.
    pub fn coords(&self, rank: usize) -> (usize, usize) {
        debug_assert!(rank < self.workers());
        (rank / self.side, rank % self.side)
    }

    /// Linear rank of grid coordinate `(row, col)`.
    pub fn rank_of(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.side && col < self.side);
        row * self.side + col
    }

    /// The rank `steps` positions along `rank`'s grid row, wrapping around.
    ///
    /// Negative steps move left (toward lower columns), positive steps move
    /// right.
    pub fn shift_in_row(&self, rank: usize, steps: isize) -> usize {
        let (row, col) = self.coords(rank);
        let side = self.side as isize;
        let col = (col as isize + steps).rem_euclid(side) as usize;
        self.rank_of(row, col)
    }

    /// The rank `steps` positions along `rank`'s grid column, wrapping
    /// around.
    ///
    /// Negative steps move up (toward lower rows), positive steps move down.
    pub fn shift_in_col(&self, rank: usize, steps: isize) -> usize {
        let (row, col) = self.coords(rank);
        let side = self.side as isize;
        let row = (row as isize + steps).rem_euclid(side) as usize;
        self.rank_of(row, col)
    }
}
