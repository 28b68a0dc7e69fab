/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use thiserror::Error;

/// Failures of individual communication operations.
///
/// All of these are fatal to the computation that observes them: an
/// interrupted rotation leaves the algorithm's accumulation invariant
/// permanently broken, so nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommError {
    /// The peer's endpoint was dropped before or during the operation.
    #[error("peer {peer} disconnected")]
    Disconnected { peer: usize },

    /// A rank outside `[0, size)` was named as a peer or root.
    #[error("rank {rank} out of range for a mesh of {size} workers")]
    InvalidRank { rank: usize, size: usize },

    /// A transferred block did not have the length the receiver expected.
    #[error("block from peer {peer} has length {actual}, expected {expected}")]
    BlockLengthMismatch {
        peer: usize,
        expected: usize,
        actual: usize,
    },

    /// The root-side buffer cannot be split into `size` equal chunks.
    #[error("scatter buffer of length {len} does not split into {count} chunks of {chunk_len}")]
    ScatterShape {
        len: usize,
        count: usize,
        chunk_len: usize,
    },
}

/// Failures of running a mesh of workers, as opposed to failures of a single
/// communication operation inside one.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeshError {
    #[error("failed to spawn worker thread {rank}")]
    Spawn {
        rank: usize,
        #[source]
        source: std::io::Error,
    },

    /// A worker panicked. Its peers observe this as a disconnect.
    #[error("worker {rank} panicked")]
    WorkerPanicked { rank: usize },
}
