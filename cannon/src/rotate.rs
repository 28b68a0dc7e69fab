/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! The main loop: `s` rounds of multiply-accumulate and block rotation.

use cannon_comm::{CommError, Communicator};
use cannon_utils::Element;
use tracing::trace;

use crate::grid::ProcessGrid;
use crate::multiply;

/// Run the `s` rounds of Cannon's main loop over pre-aligned blocks.
///
/// Each round accumulates the local block product into `block_c`, then
/// rotates `block_a` one step left along the grid row and `block_b` one step
/// up along the grid column. The rotation is skipped after the final round;
/// with `s == 1` no rotation happens at all and this reduces to a single
/// local multiply.
///
/// After round `t`, every output element has accumulated exactly the terms
/// `k = 0..=t` of its dot product; after all `s` rounds each term has been
/// added exactly once.
pub fn run_rounds<C>(
    comm: &C,
    grid: &ProcessGrid,
    block_dim: usize,
    block_a: &mut [C::Elem],
    block_b: &mut [C::Elem],
    block_c: &mut [C::Elem],
) -> Result<(), CommError>
where
    C: Communicator,
    C::Elem: Element,
{
    let rank = comm.rank();
    let rounds = grid.side();
    for round in 0..rounds {
        trace!(rank, round, rounds, "multiply-accumulate");

        #[cfg(not(feature = "rayon"))]
        multiply::multiply_accumulate(block_dim, block_a, block_b, block_c);
        #[cfg(feature = "rayon")]
        multiply::par_multiply_accumulate(block_dim, block_a, block_b, block_c);

        if round + 1 < rounds {
            comm.exchange(
                grid.shift_in_row(rank, -1),
                grid.shift_in_row(rank, 1),
                block_a,
            )?;
            comm.exchange(
                grid.shift_in_col(rank, -1),
                grid.shift_in_col(rank, 1),
                block_b,
            )?;
        }
    }
    Ok(())
}
