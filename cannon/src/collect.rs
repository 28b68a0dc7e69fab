/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use cannon_comm::Communicator;
use cannon_utils::{Element, SquareMatrix};

use crate::error::CannonResult;
use crate::layout::BlockLayout;

/// Gather every worker's result block at `root` and reassemble the global
/// matrix.
///
/// Gather concatenates chunks in rank order, which is exactly the
/// block-major order [`BlockLayout::pack`] produces, so unpacking restores
/// the row-major global result. Returns `Some(matrix)` at the root, `None`
/// elsewhere.
pub fn gather_result<C>(
    comm: &C,
    layout: &BlockLayout,
    root: usize,
    block_c: &[C::Elem],
) -> CannonResult<Option<SquareMatrix<C::Elem>>>
where
    C: Communicator,
    C::Elem: Element,
{
    let Some(packed) = comm.gather(root, block_c)? else {
        return Ok(None);
    };

    let mut result = SquareMatrix::zeroed(layout.dim())?;
    layout.unpack(&packed, result.as_mut_slice());
    Ok(Some(result))
}
