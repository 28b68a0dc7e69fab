/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use cannon_utils::Element;

#[cfg(feature = "rayon")]
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

/// Accumulate the product of two `block_dim x block_dim` row-major blocks
/// into `block_c`: `C[i][j] += sum_k A[i][k] * B[k][j]`.
///
/// Accumulation stays in the element type; for each output element, terms
/// are added in ascending `k` order, matching the sequential reference.
///
/// # Panics
///
/// Panics if any block's length is not `block_dim * block_dim`.
pub fn multiply_accumulate<T: Element>(
    block_dim: usize,
    block_a: &[T],
    block_b: &[T],
    block_c: &mut [T],
) {
    check_blocks(block_dim, block_a, block_b, block_c);
    for (i, c_row) in block_c.chunks_exact_mut(block_dim).enumerate() {
        accumulate_row(block_dim, i, block_a, block_b, c_row);
    }
}

/// [`multiply_accumulate`] with output rows computed in parallel.
#[cfg(feature = "rayon")]
pub fn par_multiply_accumulate<T: Element>(
    block_dim: usize,
    block_a: &[T],
    block_b: &[T],
    block_c: &mut [T],
) {
    check_blocks(block_dim, block_a, block_b, block_c);
    block_c
        .par_chunks_exact_mut(block_dim)
        .enumerate()
        .for_each(|(i, c_row)| accumulate_row(block_dim, i, block_a, block_b, c_row));
}

fn check_blocks<T>(block_dim: usize, block_a: &[T], block_b: &[T], block_c: &[T]) {
    let len = block_dim * block_dim;
    assert_eq!(block_a.len(), len, "block A has the wrong length");
    assert_eq!(block_b.len(), len, "block B has the wrong length");
    assert_eq!(block_c.len(), len, "block C has the wrong length");
}

fn accumulate_row<T: Element>(
    block_dim: usize,
    i: usize,
    block_a: &[T],
    block_b: &[T],
    c_row: &mut [T],
) {
    for j in 0..block_dim {
        let mut sum = c_row[j];
        for k in 0..block_dim {
            sum += block_a[i * block_dim + k] * block_b[k * block_dim + j];
        }
        c_row[j] = sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_hand_computed_product() {
        let a = [1, 2, 3, 4];
        let b = [5, 6, 7, 8];
        let mut c = [0; 4];
        multiply_accumulate(2, &a, &b, &mut c);
        assert_eq!(c, [19, 22, 43, 50]);
    }

    #[test]
    fn accumulates_into_existing_values() {
        let a = [1, 0, 0, 1]; // identity
        let b = [5, 6, 7, 8];
        let mut c = [100, 0, 0, 100];
        multiply_accumulate(2, &a, &b, &mut c);
        assert_eq!(c, [105, 6, 7, 108]);
    }

    #[test]
    fn works_on_floats() {
        let a = [0.5f64, 0.0, 0.0, 0.5];
        let b = [2.0f64, 4.0, 6.0, 8.0];
        let mut c = [0.0f64; 4];
        multiply_accumulate(2, &a, &b, &mut c);
        assert_eq!(c, [1.0, 2.0, 3.0, 4.0]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_matches_serial() {
        let block_dim = 16;
        let a: Vec<i64> = (0..block_dim * block_dim).map(|v| (v % 7) as i64).collect();
        let b: Vec<i64> = (0..block_dim * block_dim).map(|v| (v % 5) as i64).collect();
        let mut serial = vec![0; block_dim * block_dim];
        let mut parallel = vec![0; block_dim * block_dim];
        multiply_accumulate(block_dim, &a, &b, &mut serial);
        par_multiply_accumulate(block_dim, &a, &b, &mut parallel);
        assert_eq!(serial, parallel);
    }
}
