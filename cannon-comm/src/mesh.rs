/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! In-process mesh of ranked workers connected by channels.
//!
//! Every ordered pair of ranks gets its own FIFO channel, so a message from
//! `a` to `b` can never be observed out of order or intercepted by a third
//! rank. Collectives are built from these point-to-point channels in rank
//! order, which keeps gather the exact inverse of scatter.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::debug;

use crate::error::{CommError, MeshError};
use crate::Communicator;

/// One worker's endpoint into the mesh.
///
/// An endpoint is owned by exactly one worker thread. It holds a sender
/// toward every rank (itself included, which makes degenerate self-exchanges
/// uniform) and a receiver from every rank.
pub struct MeshEndpoint<T> {
    rank: usize,
    size: usize,
    block_tx: Vec<Sender<Vec<T>>>,
    block_rx: Vec<Receiver<Vec<T>>>,
    dim_tx: Vec<Sender<usize>>,
    dim_rx: Vec<Receiver<usize>>,
}

impl<T: Copy + Send + 'static> MeshEndpoint<T> {
    fn check_rank(&self, rank: usize) -> Result<(), CommError> {
        if rank < self.size {
            Ok(())
        } else {
            Err(CommError::InvalidRank {
                rank,
                size: self.size,
            })
        }
    }

    fn send_block(&self, to: usize, block: Vec<T>) -> Result<(), CommError> {
        self.check_rank(to)?;
        self.block_tx[to]
            .send(block)
            .map_err(|_| CommError::Disconnected { peer: to })
    }

    fn recv_block(&self, from: usize) -> Result<Vec<T>, CommError> {
        self.check_rank(from)?;
        self.block_rx[from]
            .recv()
            .map_err(|_| CommError::Disconnected { peer: from })
    }
}

impl<T: Copy + Send + 'static> Communicator for MeshEndpoint<T> {
    type Elem = T;

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast_dim(&self, root: usize, value: Option<usize>) -> Result<usize, CommError> {
        self.check_rank(root)?;
        if self.rank == root {
            let value = value.expect("broadcast root must supply a value");
            for peer in 0..self.size {
                self.dim_tx[peer]
                    .send(value)
                    .map_err(|_| CommError::Disconnected { peer })?;
            }
        }
        self.dim_rx[root]
            .recv()
            .map_err(|_| CommError::Disconnected { peer: root })
    }

    fn scatter(
        &self,
        root: usize,
        buffer: Option<&[T]>,
        chunk_len: usize,
    ) -> Result<Vec<T>, CommError> {
        self.check_rank(root)?;
        if self.rank == root {
            let buffer = buffer.expect("scatter root must supply a buffer");
            if buffer.len() != chunk_len * self.size {
                return Err(CommError::ScatterShape {
                    len: buffer.len(),
                    count: self.size,
                    chunk_len,
                });
            }
            for (peer, chunk) in buffer.chunks_exact(chunk_len).enumerate() {
                self.send_block(peer, chunk.to_vec())?;
            }
        }

        let chunk = self.recv_block(root)?;
        if chunk.len() != chunk_len {
            return Err(CommError::BlockLengthMismatch {
                peer: root,
                expected: chunk_len,
                actual: chunk.len(),
            });
        }
        Ok(chunk)
    }

    fn gather(&self, root: usize, chunk: &[T]) -> Result<Option<Vec<T>>, CommError> {
        self.check_rank(root)?;
        self.send_block(root, chunk.to_vec())?;
        if self.rank != root {
            return Ok(None);
        }

        let mut buffer = Vec::with_capacity(chunk.len() * self.size);
        for peer in 0..self.size {
            let received = self.recv_block(peer)?;
            if received.len() != chunk.len() {
                return Err(CommError::BlockLengthMismatch {
                    peer,
                    expected: chunk.len(),
                    actual: received.len(),
                });
            }
            buffer.extend_from_slice(&received);
        }
        Ok(Some(buffer))
    }

    fn exchange(&self, dest: usize, src: usize, block: &mut [T]) -> Result<(), CommError> {
        self.send_block(dest, block.to_vec())?;
        let received = self.recv_block(src)?;
        if received.len() != block.len() {
            return Err(CommError::BlockLengthMismatch {
                peer: src,
                expected: block.len(),
                actual: received.len(),
            });
        }
        block.copy_from_slice(&received);
        Ok(())
    }
}

/// Builder and runner for an in-process worker mesh.
pub struct LocalMesh;

impl LocalMesh {
    /// Construct fully-wired endpoints for `size` ranks.
    ///
    /// Endpoint `r` in the returned vector is rank `r`. Each endpoint must
    /// be moved to its own worker; the channels block until the
    /// corresponding peer participates.
    pub fn endpoints<T: Send + 'static>(size: usize) -> Vec<MeshEndpoint<T>> {
        let mut block_tx: Vec<Vec<Sender<Vec<T>>>> = (0..size).map(|_| Vec::new()).collect();
        let mut block_rx: Vec<Vec<Receiver<Vec<T>>>> = (0..size).map(|_| Vec::new()).collect();
        let mut dim_tx: Vec<Vec<Sender<usize>>> = (0..size).map(|_| Vec::new()).collect();
        let mut dim_rx: Vec<Vec<Receiver<usize>>> = (0..size).map(|_| Vec::new()).collect();

        for from in 0..size {
            for to in 0..size {
                let (tx, rx) = mpsc::channel();
                block_tx[from].push(tx);
                block_rx[to].push(rx);

                let (tx, rx) = mpsc::channel();
                dim_tx[from].push(tx);
                dim_rx[to].push(rx);
            }
        }

        // The receiver vectors were filled in sender-rank order, so
        // `block_rx[to][from]` is the channel from `from` to `to`.
        let mut endpoints = Vec::with_capacity(size);
        for rank in (0..size).rev() {
            endpoints.push(MeshEndpoint {
                rank,
                size,
                block_tx: block_tx.pop().expect("one sender set per rank"),
                block_rx: block_rx.pop().expect("one receiver set per rank"),
                dim_tx: dim_tx.pop().expect("one sender set per rank"),
                dim_rx: dim_rx.pop().expect("one receiver set per rank"),
            });
        }
        endpoints.reverse();
        endpoints
    }

    /// Run `f` once per rank, each on its own thread, and return the
    /// per-rank results in rank order.
    ///
    /// A panicking worker surfaces as [`MeshError::WorkerPanicked`]; its
    /// peers observe [`CommError::Disconnected`] on their next operation
    /// against it.
    pub fn run<T, R, F>(size: usize, f: F) -> Result<Vec<R>, MeshError>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: FnOnce(MeshEndpoint<T>) -> R + Clone + Send + 'static,
    {
        debug!(size, "starting local mesh");
        let mut handles = Vec::with_capacity(size);
        for (rank, endpoint) in Self::endpoints(size).into_iter().enumerate() {
            let f = f.clone();
            let handle = thread::Builder::new()
                .name(format!("mesh-worker-{rank}"))
                .spawn(move || f(endpoint))
                .map_err(|source| MeshError::Spawn { rank, source })?;
            handles.push(handle);
        }

        handles
            .into_iter()
            .enumerate()
            .map(|(rank, handle)| {
                handle
                    .join()
                    .map_err(|_| MeshError::WorkerPanicked { rank })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_reaches_every_rank() {
        let dims = LocalMesh::run::<i32, _, _>(4, |endpoint| {
            let value = if endpoint.rank() == 0 { Some(17) } else { None };
            endpoint.broadcast_dim(0, value).unwrap()
        })
        .unwrap();
        assert_eq!(dims, vec![17; 4]);
    }

    #[test]
    fn gather_inverts_scatter() {
        let buffers = LocalMesh::run::<i32, _, _>(4, |endpoint| {
            let root_buffer: Vec<i32> = (0..12).collect();
            let buffer = (endpoint.rank() == 0).then_some(root_buffer.as_slice());
            let chunk = endpoint.scatter(0, buffer, 3).unwrap();
            assert_eq!(chunk.len(), 3);
            assert_eq!(chunk[0], endpoint.rank() as i32 * 3);
            endpoint.gather(0, &chunk).unwrap()
        })
        .unwrap();

        assert_eq!(buffers[0].as_deref(), Some((0..12).collect::<Vec<_>>().as_slice()));
        assert!(buffers[1..].iter().all(Option::is_none));
    }

    #[test]
    fn exchange_cycles_a_ring() {
        // Each rank sends its own rank value one step right around a ring;
        // everyone should end up holding the left neighbor's block.
        let blocks = LocalMesh::run::<i32, _, _>(4, |endpoint| {
            let rank = endpoint.rank();
            let mut block = vec![rank as i32; 2];
            let dest = (rank + 1) % 4;
            let src = (rank + 3) % 4;
            endpoint.exchange(dest, src, &mut block).unwrap();
            block
        })
        .unwrap();
        assert_eq!(blocks, vec![vec![3; 2], vec![0; 2], vec![1; 2], vec![2; 2]]);
    }

    #[test]
    fn self_exchange_is_identity() {
        let blocks = LocalMesh::run::<i32, _, _>(1, |endpoint| {
            let mut block = vec![5, 6, 7];
            endpoint.exchange(0, 0, &mut block).unwrap();
            block
        })
        .unwrap();
        assert_eq!(blocks[0], vec![5, 6, 7]);
    }

    #[test]
    fn scatter_rejects_bad_shape() {
        let results = LocalMesh::run::<i32, _, _>(2, |endpoint| {
            if endpoint.rank() == 0 {
                let buffer = vec![1, 2, 3];
                endpoint.scatter(0, Some(buffer.as_slice()), 2).err()
            } else {
                // The root never sends after detecting the shape error, so
                // this rank observes a disconnect.
                endpoint.scatter(0, None, 2).err()
            }
        })
        .unwrap();
        assert!(matches!(results[0], Some(CommError::ScatterShape { .. })));
        assert!(matches!(results[1], Some(CommError::Disconnected { .. })));
    }

    #[test]
    fn invalid_rank_is_rejected() {
        let results = LocalMesh::run::<i32, _, _>(2, |endpoint| {
            endpoint.broadcast_dim(7, Some(1)).err()
        })
        .unwrap();
        assert!(results
            .iter()
            .all(|e| matches!(e, Some(CommError::InvalidRank { rank: 7, size: 2 }))));
    }

    #[test]
    fn worker_panic_is_reported() {
        let err = LocalMesh::run::<i32, _, _>(2, |endpoint| {
            if endpoint.rank() == 1 {
                panic!("boom");
            }
        })
        .unwrap_err();
        assert!(matches!(err, MeshError::WorkerPanicked { rank: 1 }));
    }
}
