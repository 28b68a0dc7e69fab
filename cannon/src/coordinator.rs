/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use cannon_comm::Communicator;
use cannon_utils::{try_zeroed_vec, Element, SquareMatrix};
use tracing::{debug, info};

use crate::collect;
use crate::error::{CannonResult, ConfigError};
use crate::grid::ProcessGrid;
use crate::layout::BlockLayout;
use crate::{align, rotate};

/// Sequences one distributed multiplication end to end.
///
/// Every worker constructs a `Coordinator` over its communicator and calls
/// [`multiply`](Coordinator::multiply). The root passes the global operands
/// in and receives the global result out; all other workers only ever hold
/// block-sized buffers.
pub struct Coordinator<C> {
    comm: C,
    root: usize,
}

impl<C> Coordinator<C>
where
    C: Communicator,
    C::Elem: Element,
{
    /// The distinguished rank that owns the global matrices.
    pub const ROOT: usize = 0;

    pub fn new(comm: C) -> Self {
        Self {
            comm,
            root: Self::ROOT,
        }
    }

    /// This worker's rank.
    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    /// Whether this worker is the root.
    pub fn is_root(&self) -> bool {
        self.comm.rank() == self.root
    }

    /// Run one distributed multiplication.
    ///
    /// The root passes `Some((a, b))`; every other worker passes `None`.
    /// Returns `Some(a * b)` at the root and `None` elsewhere.
    ///
    /// Validation order matters for uniform failure: the grid shape is
    /// checked first (every worker knows the worker count), then the
    /// dimension is broadcast and divisibility checked (every worker now
    /// knows `n`). Only after both checks pass does any block move.
    ///
    /// # Panics
    ///
    /// Panics if `operands` is `Some` on a non-root worker or `None` on the
    /// root.
    pub fn multiply(
        &self,
        operands: Option<(SquareMatrix<C::Elem>, SquareMatrix<C::Elem>)>,
    ) -> CannonResult<Option<SquareMatrix<C::Elem>>> {
        let rank = self.comm.rank();
        assert_eq!(
            operands.is_some(),
            self.is_root(),
            "operands must be supplied at the root and only at the root"
        );

        let grid = ProcessGrid::new(self.comm.size())?;

        if let Some((a, b)) = &operands {
            if a.dim() != b.dim() {
                return Err(ConfigError::OperandMismatch {
                    a: a.dim(),
                    b: b.dim(),
                }
                .into());
            }
        }

        let dim = self
            .comm
            .broadcast_dim(self.root, operands.as_ref().map(|(a, _)| a.dim()))?;
        let layout = BlockLayout::new(dim, grid.side())?;
        debug!(rank, dim, side = grid.side(), "configuration validated");

        if self.is_root() {
            info!(
                dim,
                workers = grid.workers(),
                block_dim = layout.block_dim(),
                "starting distributed multiply"
            );
        }

        // Root packs to block-major so each scatter chunk is one whole block.
        let packed = match &operands {
            Some((a, b)) => Some((layout.pack(a.as_slice())?, layout.pack(b.as_slice())?)),
            None => None,
        };

        let mut block_a = self.comm.scatter(
            self.root,
            packed.as_ref().map(|(a, _)| a.as_slice()),
            layout.block_len(),
        )?;
        let mut block_b = self.comm.scatter(
            self.root,
            packed.as_ref().map(|(_, b)| b.as_slice()),
            layout.block_len(),
        )?;
        let mut block_c = try_zeroed_vec(layout.block_len())?;
        debug!(rank, block_len = layout.block_len(), "blocks scattered");

        align::skew(&self.comm, &grid, &mut block_a, &mut block_b)?;
        rotate::run_rounds(
            &self.comm,
            &grid,
            layout.block_dim(),
            &mut block_a,
            &mut block_b,
            &mut block_c,
        )?;

        let result = collect::gather_result(&self.comm, &layout, self.root, &block_c)?;
        if self.is_root() {
            info!(dim, "distributed multiply complete");
        }
        Ok(result)
    }
}
