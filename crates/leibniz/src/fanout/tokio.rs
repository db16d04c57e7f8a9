//! Fan-out over Tokio tasks.
//!
//! [`sum_terms`] starts one task per term with no cap on concurrency.
//! [`sum_terms_pooled`] bounds concurrency with a fixed [`WorkerPool`]. Both
//! publish onto a single result channel of capacity one, the smallest Tokio
//! allows, so every publish waits for the previous value to be taken.

use super::pool::{manager::WorkerPool, worker::worker_loop};
use crate::{Error, Estimate, Result, term};
use tokio::sync::mpsc;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Sums the Leibniz terms `k = 0..=n`, one Tokio task per term.
///
/// Exactly `n + 1` tasks are spawned on the current runtime and exactly `n + 1`
/// values are received before returning. There is no throttling, no timeout
/// and no partial result.
///
/// # Errors
///
/// - [`Error::CountOverflow`] if `n == u64::MAX`.
/// - [`Error::ChannelClosed`] if a task exited without publishing (it
///   panicked).
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
#[cfg_attr(feature = "tracing", instrument(level = "debug"))]
pub async fn sum_terms(n: u64) -> Result<Estimate> {
    let expected = n.checked_add(1).ok_or(Error::CountOverflow(n))?;
    let (tx, mut rx) = mpsc::channel::<f64>(1);

    for k in 0..=n {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(_e) = tx.send(term(k)).await {
                #[cfg(feature = "tracing")]
                tracing::debug!("Term {k} dropped: {_e}");
            }
        });
    }
    // Only the producers hold senders now, so a short count surfaces as a
    // closed channel instead of a hang.
    drop(tx);

    collect(&mut rx, expected).await
}

/// Sums the Leibniz terms `k = 0..=n` on a bounded pool of `workers` tasks.
///
/// Term indices are dispatched round-robin; each worker computes one term at a
/// time and publishes it on the shared result channel. The same invariant as
/// [`sum_terms`] holds: exactly `n + 1` values produced and consumed.
///
/// # Errors
///
/// - [`Error::InvalidRequest`] if `workers == 0`.
/// - [`Error::CountOverflow`] if `n == u64::MAX`.
/// - [`Error::ChannelError`] if a worker stopped accepting work.
/// - [`Error::ChannelClosed`] if results stopped before `n + 1` arrived.
///
/// # Panics
///
/// Panics if called outside of a Tokio runtime.
#[cfg_attr(feature = "tracing", instrument(level = "debug"))]
pub async fn sum_terms_pooled(n: u64, workers: usize) -> Result<Estimate> {
    if workers == 0 {
        return Err(Error::InvalidRequest {
            reason: "worker count must be greater than 0".to_string(),
        });
    }
    let expected = n.checked_add(1).ok_or(Error::CountOverflow(n))?;

    let (result_tx, mut result_rx) = mpsc::channel::<f64>(1);
    let mut senders = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);

    for worker_id in 0..workers {
        // At most one index in flight per worker. Dispatch waits on the slot,
        // which keeps the pool from buffering the whole index range.
        let (tx, rx) = mpsc::channel(1);
        senders.push(tx);
        handles.push(tokio::spawn(worker_loop(worker_id, rx, result_tx.clone())));
    }
    drop(result_tx);

    let pool = WorkerPool::new(senders, handles);

    // Dispatch and drain must run concurrently: a worker blocks on the result
    // channel until the driver receives.
    let dispatcher = tokio::spawn(async move {
        for k in 0..=n {
            pool.send_to_next_worker(k).await?;
        }
        pool.shutdown().await
    });

    let collected = collect(&mut result_rx, expected).await;
    // Unblock any worker still waiting to publish if collection bailed early.
    drop(result_rx);

    let dispatched = match dispatcher.await {
        Ok(res) => res,
        Err(e) => Err(Error::ChannelError {
            context: format!("Dispatcher failed: {e}"),
        }),
    };

    // A dispatch failure explains a short collection better than the closed
    // channel it causes.
    dispatched?;
    collected
}

async fn collect(rx: &mut mpsc::Receiver<f64>, expected: u64) -> Result<Estimate> {
    let mut sum = 0.0;
    let mut received = 0;

    while received < expected {
        match rx.recv().await {
            Some(value) => {
                sum += value;
                received += 1;
            }
            None => return Err(Error::ChannelClosed { received, expected }),
        }
    }

    Ok(Estimate::new(sum, received))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partial_sum;

    const TOLERANCE: f64 = 1e-9;

    #[tokio::test]
    async fn zero_is_exactly_the_first_term() -> Result<()> {
        let estimate = sum_terms(0).await?;
        assert_eq!(estimate.value(), 4.0);
        assert_eq!(estimate.terms(), 1);

        let estimate = sum_terms_pooled(0, 4).await?;
        assert_eq!(estimate.value(), 4.0);
        assert_eq!(estimate.terms(), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn small_counts_match_closed_form() -> Result<()> {
        let one = sum_terms(1).await?;
        assert!((one.value() - 2.666_666_666_666_667).abs() < TOLERANCE);

        let four = sum_terms(4).await?;
        assert!((four.value() - 3.339_682_539_682_54).abs() < TOLERANCE);

        let four = sum_terms_pooled(4, 2).await?;
        assert!((four.value() - 3.339_682_539_682_54).abs() < TOLERANCE);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn ten_thousand_terms_all_arrive() -> Result<()> {
        const N: u64 = 10_000;

        let estimate = sum_terms(N).await?;
        assert_eq!(estimate.terms(), N + 1);
        assert!((estimate.value() - partial_sum(N)).abs() < TOLERANCE);

        let estimate = sum_terms_pooled(N, 8).await?;
        assert_eq!(estimate.terms(), N + 1);
        assert!((estimate.value() - partial_sum(N)).abs() < TOLERANCE);
        Ok(())
    }

    #[tokio::test]
    async fn single_threaded_runtime_does_not_deadlock() -> Result<()> {
        let estimate = sum_terms(1_000).await?;
        assert_eq!(estimate.terms(), 1_001);

        let estimate = sum_terms_pooled(1_000, 3).await?;
        assert_eq!(estimate.terms(), 1_001);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn pool_size_does_not_change_the_result() -> Result<()> {
        let reference = partial_sum(777);
        for workers in [1, 2, 5, 64, 1_000] {
            let estimate = sum_terms_pooled(777, workers).await?;
            assert_eq!(estimate.terms(), 778);
            assert!((estimate.value() - reference).abs() < TOLERANCE);
        }
        Ok(())
    }

    #[tokio::test]
    async fn repeated_runs_agree() -> Result<()> {
        let a = sum_terms(512).await?;
        let b = sum_terms(512).await?;
        assert!((a.value() - b.value()).abs() < TOLERANCE);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_empty_pool_and_overflow() {
        assert!(matches!(
            sum_terms_pooled(10, 0).await,
            Err(Error::InvalidRequest { .. })
        ));
        assert_eq!(
            sum_terms(u64::MAX).await,
            Err(Error::CountOverflow(u64::MAX))
        );
        assert_eq!(
            sum_terms_pooled(u64::MAX, 1).await,
            Err(Error::CountOverflow(u64::MAX))
        );
    }

    #[tokio::test]
    async fn collect_reports_short_channels() {
        let (tx, mut rx) = mpsc::channel(4);
        tx.send(1.0).await.unwrap();
        drop(tx);
        assert_eq!(
            collect(&mut rx, 2).await,
            Err(Error::ChannelClosed {
                received: 1,
                expected: 2
            })
        );
    }
}
