/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use cannon_utils::{try_zeroed_vec, AllocError, Element};

use crate::error::ConfigError;

/// The block decomposition of an `n x n` matrix onto an `s x s` grid.
///
/// Block `(row, col)` — global rows `[row * n/s, (row + 1) * n/s)` and the
/// matching column range — belongs to the worker at grid coordinate
/// `(row, col)`.
///
/// Scatter delivers each rank one contiguous chunk, so the root first packs
/// the row-major global matrix into block-major order: every block laid out
/// contiguously, blocks ordered by owning rank. Unpacking is the exact
/// inverse, which is what makes gather undo scatter bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    dim: usize,
    side: usize,
    block_dim: usize,
}

impl BlockLayout {
    /// Build the layout for dimension `dim` over a grid of side `side`.
    ///
    /// Fails if `dim` is not divisible by `side`.
    pub fn new(dim: usize, side: usize) -> Result<Self, ConfigError> {
        if side == 0 || dim % side != 0 {
            return Err(ConfigError::IndivisibleDimension { dim, side });
        }
        Ok(Self {
            dim,
            side,
            block_dim: dim / side,
        })
    }

    /// The global matrix dimension `n`.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The side length of one local block, `n / s`.
    pub fn block_dim(&self) -> usize {
        self.block_dim
    }

    /// The element count of one local block.
    pub fn block_len(&self) -> usize {
        self.block_dim * self.block_dim
    }

    /// Reorder a row-major global matrix into block-major order: rank 0's
    /// block first, then rank 1's, each block itself row-major.
    pub fn pack<T: Element>(&self, global: &[T]) -> Result<Vec<T>, AllocError> {
        assert_eq!(
            global.len(),
            self.dim * self.dim,
            "global buffer does not match the layout dimension"
        );

        let mut packed = try_zeroed_vec(self.dim * self.dim)?;
        let block_dim = self.block_dim;
        let mut out = 0;
        for rank in 0..self.side * self.side {
            let (block_row, block_col) = (rank / self.side, rank % self.side);
            for local_row in 0..block_dim {
                let start = (block_row * block_dim + local_row) * self.dim + block_col * block_dim;
                packed[out..out + block_dim].copy_from_slice(&global[start..start + block_dim]);
                out += block_dim;
            }
        }
        Ok(packed)
    }

    /// The inverse of [`pack`](BlockLayout::pack): write a block-major
    /// buffer back into a row-major global matrix.
    pub fn unpack<T: Copy>(&self, packed: &[T], global: &mut [T]) {
        assert_eq!(
            packed.len(),
            self.dim * self.dim,
            "packed buffer does not match the layout dimension"
        );
        assert_eq!(
            global.len(),
            self.dim * self.dim,
            "global buffer does not match the layout dimension"
        );

        let block_dim = self.block_dim;
        let mut input = 0;
        for rank in 0..self.side * self.side {
            let (block_row, block_col) = (rank / self.side, rank % self.side);
            for local_row in 0..block_dim {
                let start = (block_row * block_dim + local_row) * self.dim + block_col * block_dim;
                global[start..start + block_dim]
                    .copy_from_slice(&packed[input..input + block_dim]);
                input += block_dim;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_block_dimensions() {
        let layout = BlockLayout::new(12, 3).unwrap();
        assert_eq!(layout.block_dim(), 4);
        assert_eq!(layout.block_len(), 16);
    }

    #[test]
    fn rejects_indivisible_dimension() {
        assert_eq!(
            BlockLayout::new(10, 3).unwrap_err(),
            ConfigError::IndivisibleDimension { dim: 10, side: 3 }
        );
    }

    #[test]
    fn pack_orders_blocks_by_rank() {
        // 4x4 matrix over a 2x2 grid: rank 1 owns the top-right block.
        let global: Vec<i32> = (1..=16).collect();
        let layout = BlockLayout::new(4, 2).unwrap();
        let packed = layout.pack(&global).unwrap();
        assert_eq!(&packed[0..4], &[1, 2, 5, 6]); // rank 0: block (0, 0)
        assert_eq!(&packed[4..8], &[3, 4, 7, 8]); // rank 1: block (0, 1)
        assert_eq!(&packed[8..12], &[9, 10, 13, 14]); // rank 2: block (1, 0)
        assert_eq!(&packed[12..16], &[11, 12, 15, 16]); // rank 3: block (1, 1)
    }

    #[test]
    fn unpack_inverts_pack() {
        let global: Vec<i32> = (0..36).collect();
        let layout = BlockLayout::new(6, 3).unwrap();
        let packed = layout.pack(&global).unwrap();
        let mut restored = vec![0; 36];
        layout.unpack(&packed, &mut restored);
        assert_eq!(restored, global);
    }

    #[test]
    fn single_worker_layout_is_identity() {
        let global: Vec<i32> = (0..16).collect();
        let layout = BlockLayout::new(4, 1).unwrap();
        assert_eq!(layout.pack(&global).unwrap(), global);
    }
}
