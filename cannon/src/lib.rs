/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Cannon's algorithm for dense square-matrix multiplication over a grid of
//! message-passing workers.
//!
//! A global `n x n` matrix is decomposed onto an `s x s` grid of workers
//! (`s = sqrt(p)`), each holding one `n/s` block per operand plus an
//! accumulator block. After an initial diagonal alignment of the operands,
//! the workers run `s` rounds of local multiply-accumulate, rotating operand
//! blocks one grid step between rounds. Per-worker memory is `O(n^2 / p)`
//! and per-round communication is `O(n / s)`.
//!
//! The result is bit-exact against a sequential triple-loop multiply for
//! integer elements, for any valid worker count.
//!
//! Communication goes through the [`cannon_comm::Communicator`] trait; the
//! algorithm never names a concrete transport.

pub mod error;
pub use error::{CannonError, CannonResult, ConfigError};

pub mod grid;
pub use grid::ProcessGrid;

pub mod layout;
pub use layout::BlockLayout;

pub mod align;
pub mod multiply;
pub mod rotate;

pub mod collect;

pub mod coordinator;
pub use coordinator::Coordinator;
