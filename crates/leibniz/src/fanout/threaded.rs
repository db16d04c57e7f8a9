//! Fan-out over OS threads and a true rendezvous channel.
//!
//! One thread is started per term. Each publishes its single value on a
//! zero-capacity [`crossbeam_channel`], so every send blocks until the driver
//! receives it. Producers are started from a scoped spawner thread while the
//! calling thread collects, so finished producers exit as the fan-out
//! proceeds.

use crate::{Error, Estimate, Result, term};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::{io, thread};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Producers only compute one term and send it.
const PRODUCER_STACK_SIZE: usize = 64 * 1024;

/// Sums the Leibniz terms `k = 0..=n`, each computed on its own thread.
///
/// Exactly `n + 1` threads are spawned and exactly `n + 1` values are received.
/// Arrival order is unspecified; the fold is order-independent within
/// floating-point reassociation error.
///
/// There is no cap on the number of threads. For large `n` the operating
/// system may refuse to spawn more, in which case spawning stops, the threads
/// already running are received from, and [`Error::Spawn`] is returned.
///
/// # Errors
///
/// - [`Error::CountOverflow`] if `n == u64::MAX`.
/// - [`Error::Spawn`] if a thread could not be started.
/// - [`Error::ChannelClosed`] if a producer exited without publishing.
#[cfg_attr(feature = "tracing", instrument(level = "debug"))]
pub fn sum_terms(n: u64) -> Result<Estimate> {
    fan_in(n, |k, producer| {
        thread::Builder::new()
            .name(format!("leibniz-term-{k}"))
            .stack_size(PRODUCER_STACK_SIZE)
            .spawn(move || publish(k, &producer))
            .map(drop)
    })
}

/// Drives one fan-out: `spawn` starts the producer for term `k`, the calling
/// thread receives exactly `n + 1` values.
fn fan_in<F>(n: u64, spawn: F) -> Result<Estimate>
where
    F: Fn(u64, Sender<f64>) -> io::Result<()> + Send,
{
    let expected = n.checked_add(1).ok_or(Error::CountOverflow(n))?;
    let (tx, rx) = bounded::<f64>(0);

    thread::scope(|scope| {
        // The spawner owns the only sender besides the producers, so the
        // channel closes as soon as spawning stops and every producer is done.
        let spawner = thread::Builder::new()
            .name("leibniz-spawner".to_string())
            .spawn_scoped(scope, move || spawn_producers(n, tx, &spawn));

        let spawner = match spawner {
            Ok(handle) => handle,
            Err(e) => {
                return Err(Error::Spawn {
                    context: format!("spawner: {e}"),
                });
            }
        };

        let collected = collect(&rx, expected);
        let spawned = spawner.join().unwrap_or_else(|_| {
            Err(Error::Spawn {
                context: "spawner panicked".to_string(),
            })
        });

        settle(collected, spawned)
    })
}

/// Starts producers for `k = 0..=n`, stopping at the first failure. `tx` is
/// dropped on return either way.
fn spawn_producers<F>(n: u64, tx: Sender<f64>, spawn: &F) -> Result<()>
where
    F: Fn(u64, Sender<f64>) -> io::Result<()>,
{
    for k in 0..=n {
        spawn(k, tx.clone()).map_err(|e| Error::Spawn {
            context: format!("term {k}: {e}"),
        })?;
    }
    Ok(())
}

fn publish(k: u64, producer: &Sender<f64>) {
    if let Err(_e) = producer.send(term(k)) {
        #[cfg(feature = "tracing")]
        tracing::debug!("Term {k} dropped: {_e}");
    }
}

fn collect(rx: &Receiver<f64>, expected: u64) -> Result<Estimate> {
    let mut sum = 0.0;
    let mut received = 0;

    while received < expected {
        match rx.recv() {
            Ok(value) => {
                sum += value;
                received += 1;
            }
            Err(_) => return Err(Error::ChannelClosed { received, expected }),
        }
    }

    Ok(Estimate::new(sum, received))
}

/// A spawn failure explains a short collection better than the closed channel
/// it causes.
fn settle(collected: Result<Estimate>, spawned: Result<()>) -> Result<Estimate> {
    spawned?;
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partial_sum;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn zero_is_exactly_the_first_term() {
        let estimate = sum_terms(0).unwrap();
        assert_eq!(estimate.value(), 4.0);
        assert_eq!(estimate.terms(), 1);
    }

    #[test]
    fn small_counts_match_closed_form() {
        let one = sum_terms(1).unwrap();
        assert!((one.value() - (4.0 - 4.0 / 3.0)).abs() < TOLERANCE);
        assert_eq!(one.terms(), 2);

        let four = sum_terms(4).unwrap();
        assert!((four.value() - 3.339_682_539_682_54).abs() < TOLERANCE);
        assert_eq!(four.terms(), 5);
    }

    #[test]
    fn matches_sequential_reference() {
        for n in [2, 7, 63, 500] {
            let estimate = sum_terms(n).unwrap();
            assert_eq!(estimate.terms(), n + 1);
            assert!(
                (estimate.value() - partial_sum(n)).abs() < TOLERANCE,
                "n={n}: {} vs {}",
                estimate.value(),
                partial_sum(n)
            );
        }
    }

    #[test]
    fn ten_thousand_terms_all_arrive() {
        const N: u64 = 10_000;

        let estimate = sum_terms(N).unwrap();
        assert_eq!(estimate.terms(), N + 1);
        assert!((estimate.value() - partial_sum(N)).abs() < TOLERANCE);
    }

    #[test]
    fn repeated_runs_agree() {
        let a = sum_terms(256).unwrap();
        let b = sum_terms(256).unwrap();
        assert!((a.value() - b.value()).abs() < TOLERANCE);
        assert_eq!(a.terms(), b.terms());
    }

    #[test]
    fn overflowing_count_is_rejected() {
        assert_eq!(sum_terms(u64::MAX), Err(Error::CountOverflow(u64::MAX)));
    }

    #[test]
    fn spawn_failure_stops_without_hanging() {
        let result = fan_in(10, |k, producer| {
            if k == 3 {
                return Err(io::Error::other("thread limit reached"));
            }
            thread::spawn(move || publish(k, &producer));
            Ok(())
        });

        match result {
            Err(Error::Spawn { context }) => assert!(context.contains("term 3"), "{context}"),
            other => panic!("expected a spawn error, got {other:?}"),
        }
    }

    #[test]
    fn failed_spawning_releases_the_sender() {
        let (tx, rx) = bounded::<f64>(0);
        let res = spawn_producers(5, tx, &|k: u64, _producer: Sender<f64>| -> io::Result<()> {
            if k == 2 {
                Err(io::Error::other("no more threads"))
            } else {
                Ok(())
            }
        });

        assert!(matches!(res, Err(Error::Spawn { .. })));
        // Every sender is gone, so a receive fails instead of blocking.
        assert!(rx.recv().is_err());
    }

    #[test]
    fn spawn_errors_take_precedence() {
        let spawn_err = Error::Spawn {
            context: "term 9: limit".to_string(),
        };
        let short = Err(Error::ChannelClosed {
            received: 9,
            expected: 20,
        });

        assert_eq!(settle(short, Err(spawn_err.clone())), Err(spawn_err));
        assert_eq!(
            settle(Ok(Estimate::new(4.0, 1)), Ok(())),
            Ok(Estimate::new(4.0, 1))
        );
    }

    #[test]
    fn collect_reports_short_channels() {
        let (tx, rx) = bounded::<f64>(2);
        tx.send(1.0).unwrap();
        tx.send(2.0).unwrap();
        drop(tx);
        assert_eq!(
            collect(&rx, 3),
            Err(Error::ChannelClosed {
                received: 2,
                expected: 3
            })
        );
    }
}
