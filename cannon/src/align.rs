/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Initial diagonal alignment (skew) of the operand blocks.

use cannon_comm::{CommError, Communicator};
use tracing::trace;

use crate::grid::ProcessGrid;

/// Perform the one-time skew that establishes Cannon's round invariant.
///
/// The worker at grid coordinate `(row, col)` ships its A block `row` steps
/// left along its grid row and its B block `col` steps up along its grid
/// column, each as one bulk exchange with a single destination and source.
/// Afterwards the local A block is global block `(row, (col + row) mod s)`
/// and the local B block is `((row + col) mod s, col)`: exactly the operands
/// of round 0.
///
/// Workers in row 0 (for A) and column 0 (for B) perform a degenerate
/// self-exchange, keeping every rank's communication pattern uniform.
pub fn skew<C: Communicator>(
    comm: &C,
    grid: &ProcessGrid,
    block_a: &mut [C::Elem],
    block_b: &mut [C::Elem],
) -> Result<(), CommError> {
    let rank = comm.rank();
    let (row, col) = grid.coords(rank);
    trace!(rank, row, col, "aligning operand blocks");

    let steps = row as isize;
    comm.exchange(
        grid.shift_in_row(rank, -steps),
        grid.shift_in_row(rank, steps),
        block_a,
    )?;

    let steps = col as isize;
    comm.exchange(
        grid.shift_in_col(rank, -steps),
        grid.shift_in_col(rank, steps),
        block_b,
    )?;

    Ok(())
}
