/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul};

use rand::Rng;

/// Scalar element types that matrix blocks can be built from.
///
/// Accumulation happens in the element type itself with the type's native
/// fixed-width semantics. There is no implicit widening: multiplying two
/// `i32` blocks accumulates in `i32`.
///
/// The `Send + Sync + 'static` bounds allow blocks of elements to move
/// between worker threads and to be shared by parallel row kernels.
pub trait Element:
    Copy
    + PartialEq
    + Debug
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Mul<Output = Self>
    + AddAssign
{
    /// The additive identity, used to initialize accumulator blocks.
    const ZERO: Self;

    /// Sample a small single-digit value in `[0, 10)`.
    ///
    /// Digit-sized inputs keep integer products far from overflow and float
    /// products exactly representable, so distributed and sequential results
    /// can be compared for bit-exact equality.
    fn sample_digit<R: Rng>(rng: &mut R) -> Self;
}

macro_rules! impl_element_int {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                const ZERO: Self = 0;

                fn sample_digit<R: Rng>(rng: &mut R) -> Self {
                    rng.gen_range(0..10)
                }
            }
        )*
    };
}

macro_rules! impl_element_float {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                const ZERO: Self = 0.0;

                fn sample_digit<R: Rng>(rng: &mut R) -> Self {
                    rng.gen_range(0..10) as $t
                }
            }
        )*
    };
}

impl_element_int!(i32, i64);
impl_element_float!(f32, f64);
