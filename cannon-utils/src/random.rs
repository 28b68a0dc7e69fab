/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use rand::{rngs::StdRng, SeedableRng};

use crate::element::Element;
use crate::views::{AllocError, SquareMatrix};

/// Generate a `dim x dim` matrix of single-digit values from a fixed seed.
///
/// The same seed always produces the same matrix, so the launcher and the
/// root worker can regenerate identical inputs independently.
pub fn random_matrix<T: Element>(dim: usize, seed: u64) -> Result<SquareMatrix<T>, AllocError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut matrix = SquareMatrix::zeroed(dim)?;
    for value in matrix.as_mut_slice() {
        *value = T::sample_digit(&mut rng);
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_matrix() {
        let a = random_matrix::<i32>(8, 42).unwrap();
        let b = random_matrix::<i32>(8, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = random_matrix::<i32>(8, 42).unwrap();
        let b = random_matrix::<i32>(8, 43).unwrap();
        assert_ne!(a, b);
    }
}
