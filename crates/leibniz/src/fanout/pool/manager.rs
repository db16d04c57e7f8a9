//! Bounded pool of asynchronous term workers.
//!
//! This module defines the [`WorkerPool`] struct, which owns the dispatch side
//! of a fixed set of workers. Term indices are distributed round-robin and each
//! worker listens on its own bounded [`mpsc::Receiver`], so no locking is
//! needed between workers.

use crate::{Error, Result};
use portable_atomic::{AtomicUsize, Ordering};
use tokio::{sync::mpsc, task::JoinHandle};

/// Dispatch handle for a fixed set of term workers.
///
/// Dropping the pool closes every worker channel, which lets the workers run
/// out their loops. [`WorkerPool::shutdown`] does the same and additionally
/// waits for every worker to exit.
pub struct WorkerPool {
    workers: Vec<mpsc::Sender<u64>>,
    handles: Vec<JoinHandle<()>>,
    next_worker: AtomicUsize,
}

impl WorkerPool {
    /// Constructs a new [`WorkerPool`] from initialized worker channels and the
    /// handles of the tasks consuming them.
    pub const fn new(workers: Vec<mpsc::Sender<u64>>, handles: Vec<JoinHandle<()>>) -> Self {
        Self {
            workers,
            handles,
            next_worker: AtomicUsize::new(0),
        }
    }

    /// Returns the index of the next worker to receive work (round-robin).
    ///
    /// Uses a relaxed atomic increment to minimize contention.
    pub fn next_worker_index(&self) -> usize {
        self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len()
    }

    /// Sends the term index `k` to the next worker in the pool, waiting for a
    /// free slot in that worker's channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelError`] if the pool is empty or the worker's
    /// channel is closed.
    pub async fn send_to_next_worker(&self, k: u64) -> Result<()> {
        if self.workers.is_empty() {
            return Err(Error::ChannelError {
                context: "Worker pool is empty".to_string(),
            });
        }

        let worker_idx = self.next_worker_index();
        let worker = &self.workers[worker_idx];

        match worker.send(k).await {
            Ok(()) => Ok(()),
            Err(_) => Err(Error::ChannelError {
                context: format!("Worker {worker_idx} channel closed"),
            }),
        }
    }

    /// Closes every worker channel and waits for all workers to exit.
    ///
    /// Workers finish the index they are holding before exiting, so this only
    /// completes once their results have been received.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelError`] naming the first worker that panicked.
    pub async fn shutdown(self) -> Result<()> {
        let Self {
            workers, handles, ..
        } = self;

        #[cfg(feature = "tracing")]
        tracing::debug!("Closing {} worker channels", workers.len());
        drop(workers);

        let results = futures::future::join_all(handles).await;
        for (i, res) in results.into_iter().enumerate() {
            if let Err(e) = res {
                #[cfg(feature = "tracing")]
                tracing::error!("Worker {i} failed: {e}");
                return Err(Error::ChannelError {
                    context: format!("Worker {i} failed: {e}"),
                });
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Worker pool shutdown complete");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dispatches_round_robin() -> Result<()> {
        let mut senders = Vec::new();
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = mpsc::channel(8);
            senders.push(tx);
            receivers.push(rx);
        }

        let pool = WorkerPool::new(senders, Vec::new());
        for k in 0..6 {
            pool.send_to_next_worker(k).await?;
        }
        pool.shutdown().await?;

        let mut seen = Vec::new();
        for rx in &mut receivers {
            let mut mine = Vec::new();
            while let Some(k) = rx.recv().await {
                mine.push(k);
            }
            seen.push(mine);
        }
        assert_eq!(seen, vec![vec![0, 3], vec![1, 4], vec![2, 5]]);
        Ok(())
    }

    #[tokio::test]
    async fn closed_worker_is_reported() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let pool = WorkerPool::new(vec![tx], Vec::new());
        assert!(matches!(
            pool.send_to_next_worker(0).await,
            Err(Error::ChannelError { .. })
        ));
    }

    #[tokio::test]
    async fn empty_pool_is_reported() {
        let pool = WorkerPool::new(Vec::new(), Vec::new());
        assert!(matches!(
            pool.send_to_next_worker(0).await,
            Err(Error::ChannelError { .. })
        ));
    }
}
