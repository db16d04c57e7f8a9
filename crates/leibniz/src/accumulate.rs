use crate::{Deadline, Estimate, MonotonicDeadline, term};
use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Sums consecutive Leibniz terms until `deadline` expires.
///
/// The deadline is polled before every term, so once it reports expired no
/// further term is added. The check and the clock tick are not atomic, so the
/// achieved compute time is approximately, not exactly, the configured budget.
///
/// This never fails. A deadline that is already expired yields
/// [`Estimate::EMPTY`].
///
/// # Example
///
/// ```
/// use core::cell::Cell;
/// use leibniz::{Deadline, accumulate_until};
///
/// // Expires after three polls report "not yet".
/// struct Polls(Cell<u32>);
/// impl Deadline for Polls {
///     fn expired(&self) -> bool {
///         let left = self.0.get();
///         self.0.set(left.saturating_sub(1));
///         left == 0
///     }
/// }
///
/// let estimate = accumulate_until(&Polls(Cell::new(3)));
/// assert_eq!(estimate.terms(), 3);
/// assert_eq!(estimate.value(), 4.0 - 4.0 / 3.0 + 4.0 / 5.0);
/// ```
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
pub fn accumulate_until<D: Deadline + ?Sized>(deadline: &D) -> Estimate {
    let mut sum = 0.0;
    let mut k = 0_u64;

    while !deadline.expired() {
        sum += term(k);
        k += 1;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(terms = k, "Deadline expired");

    Estimate::new(sum, k)
}

/// Approximates π by summing terms for `budget` of wall-clock time, measured
/// on the monotonic clock from the moment of the call.
///
/// A zero budget yields a value in `[0.0, 4.0]`: zero or one term, depending
/// on clock granularity.
#[must_use]
pub fn pi_for(budget: Duration) -> Estimate {
    accumulate_until(&MonotonicDeadline::after(budget))
}
