/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

pub mod element;
pub use element::Element;

pub mod views;
pub use views::{try_zeroed_vec, AllocError, DimensionError, SquareMatrix};

pub mod random;
pub use random::random_matrix;

pub mod reference;
