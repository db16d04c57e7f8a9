use crate::term;
use tokio::sync::mpsc;

/// Worker task that turns term indices into term values.
///
/// The worker listens on its own MPSC channel and publishes one value per
/// received index onto the shared result channel. It runs until its index
/// channel is closed, or until the result channel is closed because the driver
/// stopped collecting.
///
/// # Arguments
///
/// - `worker_id`: Numeric identifier for this worker (used for logs/tracing).
/// - `rx`: Receiver through which term indices arrive.
/// - `results`: Shared channel the computed terms are published on.
pub async fn worker_loop(worker_id: usize, mut rx: mpsc::Receiver<u64>, results: mpsc::Sender<f64>) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");
    #[cfg(not(feature = "tracing"))]
    let _ = worker_id;

    while let Some(k) = rx.recv().await {
        if let Err(_e) = results.send(term(k)).await {
            #[cfg(feature = "tracing")]
            tracing::debug!("Worker {worker_id} failed to publish term {k}: {_e}");
            break;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publishes_one_term_per_index() {
        let (tx, rx) = mpsc::channel(4);
        let (result_tx, mut result_rx) = mpsc::channel(4);
        let handle = tokio::spawn(worker_loop(0, rx, result_tx));

        for k in [0, 1, 2] {
            tx.send(k).await.unwrap();
        }
        drop(tx);

        let mut values = Vec::new();
        while let Some(v) = result_rx.recv().await {
            values.push(v);
        }
        handle.await.unwrap();

        assert_eq!(values, vec![term(0), term(1), term(2)]);
    }

    #[tokio::test]
    async fn stops_when_results_are_abandoned() {
        let (tx, rx) = mpsc::channel(4);
        let (result_tx, result_rx) = mpsc::channel(1);
        drop(result_rx);
        let handle = tokio::spawn(worker_loop(1, rx, result_tx));

        tx.send(0).await.unwrap();
        handle.await.unwrap();
        assert!(tx.is_closed());
    }
}
