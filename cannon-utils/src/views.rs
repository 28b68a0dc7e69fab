/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::collections::TryReserveError;
use std::ops::{Index, IndexMut};

use thiserror::Error;

use crate::element::Element;

/// Error returned when a matrix cannot be constructed over a slice of the
/// wrong length.
#[derive(Debug, Error)]
#[non_exhaustive]
#[error("tried to construct a {dim}x{dim} matrix over a buffer of length {len}")]
pub struct DimensionError {
    len: usize,
    dim: usize,
}

/// Error returned when a backing buffer cannot be reserved.
///
/// Buffer allocation is fallible so that an oversized request surfaces as an
/// error at the call site instead of aborting the process.
#[derive(Debug, Error)]
#[error("failed to allocate a buffer of {elements} elements")]
pub struct AllocError {
    elements: usize,
    #[source]
    source: TryReserveError,
}

/// Fallibly allocate a vector of `len` additive identities.
pub fn try_zeroed_vec<T: Element>(len: usize) -> Result<Vec<T>, AllocError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|source| AllocError {
        elements: len,
        source,
    })?;
    data.resize(len, T::ZERO);
    Ok(data)
}

/// An owned, square, row-major matrix.
///
/// This is the only materialized matrix shape the project needs: global
/// operands and results at the root, and the three `local_n` blocks each
/// worker owns.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix<T> {
    data: Box<[T]>,
    dim: usize,
}

impl<T: Element> SquareMatrix<T> {
    /// Allocate a `dim x dim` matrix filled with the additive identity.
    pub fn zeroed(dim: usize) -> Result<Self, AllocError> {
        let data = try_zeroed_vec(dim * dim)?;
        Ok(Self {
            data: data.into_boxed_slice(),
            dim,
        })
    }
}

impl<T> SquareMatrix<T> {
    /// Construct a matrix over `data`, which must have length `dim * dim`.
    pub fn from_parts(data: Box<[T]>, dim: usize) -> Result<Self, DimensionError> {
        if data.len() != dim * dim {
            return Err(DimensionError {
                len: data.len(),
                dim,
            });
        }
        Ok(Self { data, dim })
    }

    /// The side length of the matrix.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The underlying row-major data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The underlying row-major data, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Return row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.dim()`.
    pub fn row(&self, row: usize) -> &[T] {
        assert!(
            row < self.dim,
            "tried to access row {row} of a matrix with {} rows",
            self.dim
        );
        &self.data[row * self.dim..(row + 1) * self.dim]
    }
}

impl<T> Index<(usize, usize)> for SquareMatrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        &self.data[row * self.dim + col]
    }
}

impl<T> IndexMut<(usize, usize)> for SquareMatrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        &mut self.data[row * self.dim + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_is_zero() {
        let m = SquareMatrix::<i32>::zeroed(3).unwrap();
        assert_eq!(m.dim(), 3);
        assert!(m.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn from_parts_checks_length() {
        let err = SquareMatrix::from_parts(vec![1i32; 5].into_boxed_slice(), 2).unwrap_err();
        assert!(err.to_string().contains("2x2"));

        let m = SquareMatrix::from_parts(vec![1i32; 4].into_boxed_slice(), 2).unwrap();
        assert_eq!(m.dim(), 2);
    }

    #[test]
    fn indexing_is_row_major() {
        let m =
            SquareMatrix::from_parts(vec![1i32, 2, 3, 4, 5, 6, 7, 8, 9].into_boxed_slice(), 3)
                .unwrap();
        assert_eq!(m[(0, 0)], 1);
        assert_eq!(m[(1, 2)], 6);
        assert_eq!(m[(2, 0)], 7);
        assert_eq!(m.row(1), &[4, 5, 6]);
    }

    #[test]
    #[should_panic(expected = "tried to access row 2")]
    fn row_out_of_bounds_panics() {
        let m = SquareMatrix::<i32>::zeroed(2).unwrap();
        let _ = m.row(2);
    }
}
