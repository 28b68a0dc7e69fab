/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Sequential triple-loop multiply used as the correctness reference.
//!
//! The distributed algorithm must produce exactly this result for integer
//! element types, regardless of worker count.

use crate::element::Element;
use crate::views::{AllocError, SquareMatrix};

/// Compute `a * b` with a plain sequential triple loop.
///
/// # Panics
///
/// Panics if `a` and `b` have different dimensions.
pub fn multiply<T: Element>(
    a: &SquareMatrix<T>,
    b: &SquareMatrix<T>,
) -> Result<SquareMatrix<T>, AllocError> {
    assert_eq!(
        a.dim(),
        b.dim(),
        "reference multiply requires equal-sized operands"
    );

    let dim = a.dim();
    let mut c = SquareMatrix::zeroed(dim)?;
    for i in 0..dim {
        for j in 0..dim {
            let mut sum = T::ZERO;
            for k in 0..dim {
                sum += a[(i, k)] * b[(k, j)];
            }
            c[(i, j)] = sum;
        }
    }
    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(data: Vec<i32>, dim: usize) -> SquareMatrix<i32> {
        SquareMatrix::from_parts(data.into_boxed_slice(), dim).unwrap()
    }

    #[test]
    fn hand_computed_2x2() {
        let a = matrix(vec![1, 2, 3, 4], 2);
        let b = matrix(vec![5, 6, 7, 8], 2);
        let c = multiply(&a, &b).unwrap();
        assert_eq!(c.as_slice(), &[19, 22, 43, 50]);
    }

    #[test]
    fn identity_is_neutral() {
        let a = matrix((1..=16).collect(), 4);
        let mut id = SquareMatrix::<i32>::zeroed(4).unwrap();
        for i in 0..4 {
            id[(i, i)] = 1;
        }
        assert_eq!(multiply(&a, &id).unwrap(), a);
    }
}
