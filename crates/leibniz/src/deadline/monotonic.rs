use crate::Deadline;
use core::time::Duration;
use std::time::Instant;

/// A [`Deadline`] anchored to a monotonic [`Instant`] read at construction.
///
/// Wall-clock adjustments (NTP, daylight savings) have no effect; the deadline
/// fires once `budget` has elapsed on the monotonic clock.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicDeadline {
    start: Instant,
    budget: Duration,
}

impl MonotonicDeadline {
    /// Starts the clock now. The deadline expires `budget` from this call.
    ///
    /// A zero budget produces a deadline that is already expired.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// The configured duration.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Time elapsed since the deadline was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Absolute point at which the deadline fires, or `None` if it cannot be
    /// represented by the platform clock.
    #[must_use]
    pub fn instant(&self) -> Option<Instant> {
        self.start.checked_add(self.budget)
    }
}

impl Deadline for MonotonicDeadline {
    fn expired(&self) -> bool {
        self.start.elapsed() >= self.budget
    }
}
