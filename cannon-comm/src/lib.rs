/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Communication substrate for grid-distributed computations.
//!
//! The algorithm crates are written against the [`Communicator`] trait and
//! never against a concrete transport. [`mesh::LocalMesh`] provides the
//! in-process implementation: one worker per OS thread, connected by
//! channels. An MPI-backed implementation would slot in behind the same
//! trait.

pub mod error;
pub use error::{CommError, MeshError};

pub mod mesh;
pub use mesh::{LocalMesh, MeshEndpoint};

/// Blocking message-passing operations between a fixed set of ranked workers.
///
/// Every operation is synchronous: a receive suspends the caller until the
/// matching send has happened, and the collectives complete only once all
/// participants have entered them with compatible arguments. This matches
/// the substrate contract the algorithm relies on for round ordering.
///
/// The four operations are exactly the primitives Cannon's algorithm needs:
/// a scalar broadcast for the matrix dimension, scatter/gather for block
/// distribution (gather is the exact inverse of scatter), and an in-place
/// pairwise exchange for the skew and rotation steps.
pub trait Communicator {
    /// The scalar element type carried by block transfers.
    type Elem: Copy + Send + 'static;

    /// This worker's rank in `[0, size)`.
    fn rank(&self) -> usize;

    /// The total number of workers.
    fn size(&self) -> usize;

    /// Broadcast a dimension-sized scalar from `root` to every worker.
    ///
    /// The root passes `Some(value)`; everyone else passes `None` and
    /// receives the root's value. All workers return the same value.
    fn broadcast_dim(&self, root: usize, value: Option<usize>) -> Result<usize, CommError>;

    /// Split a root-owned buffer into equal contiguous chunks, one per rank
    /// in rank order, and return this worker's chunk.
    ///
    /// The root passes `Some(buffer)` with `buffer.len() == chunk_len * size`;
    /// everyone else passes `None`.
    fn scatter(
        &self,
        root: usize,
        buffer: Option<&[Self::Elem]>,
        chunk_len: usize,
    ) -> Result<Vec<Self::Elem>, CommError>;

    /// The exact inverse of [`scatter`](Communicator::scatter): concatenate
    /// every worker's chunk in rank order at `root`.
    ///
    /// Returns `Some(buffer)` at the root and `None` elsewhere.
    fn gather(
        &self,
        root: usize,
        chunk: &[Self::Elem],
    ) -> Result<Option<Vec<Self::Elem>>, CommError>;

    /// Simultaneously send `block` to `dest` and replace it with the block
    /// received from `src`.
    ///
    /// `dest == src == self.rank()` is a valid degenerate exchange that
    /// leaves `block` unchanged. The replacement must have the same length
    /// as the outgoing block.
    fn exchange(
        &self,
        dest: usize,
        src: usize,
        block: &mut [Self::Elem],
    ) -> Result<(), CommError>;
}
