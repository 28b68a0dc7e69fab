/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use thiserror::Error;

use cannon_comm::CommError;
use cannon_utils::AllocError;

/// Convenience alias for a `Result<T, CannonError>`.
pub type CannonResult<T> = Result<T, CannonError>;

/// Configuration problems detected before any data distribution.
///
/// These are checked from values every worker knows identically (the worker
/// count from the mesh, the dimension from the broadcast), so every worker
/// reaches the same verdict and none is left waiting on a collective.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot form a process grid with zero workers")]
    NoWorkers,

    #[error("worker count {workers} is not a perfect square")]
    NonSquareWorkerCount { workers: usize },

    #[error("matrix dimension {dim} is not divisible by the grid side {side}")]
    IndivisibleDimension { dim: usize, side: usize },

    #[error("operand dimensions differ: {a} vs {b}")]
    OperandMismatch { a: usize, b: usize },
}

/// Top-level error taxonomy of the distributed multiply.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CannonError {
    /// Rejected before any block was distributed. No partial computation
    /// was attempted.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// A send, receive, or collective failed mid-computation. Fatal: an
    /// interrupted rotation breaks the accumulation invariant, so there is
    /// no retry and no partial result.
    #[error(transparent)]
    Communication(#[from] CommError),

    /// A local or global buffer could not be reserved.
    #[error(transparent)]
    Allocation(#[from] AllocError),
}
