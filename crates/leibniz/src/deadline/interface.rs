/// A non-blocking cutoff signal for the time-bounded accumulator.
///
/// This abstraction allows you to plug in a real monotonic deadline, or a
/// deterministic one in tests that expires after a fixed number of polls.
///
/// Implementations must never block: [`expired`](Deadline::expired) is polled
/// once before every term.
///
/// # Example
///
/// ```
/// use leibniz::{Deadline, accumulate_until};
///
/// struct Never;
/// impl Deadline for Never {
///     fn expired(&self) -> bool {
///         false
///     }
/// }
///
/// struct Already;
/// impl Deadline for Already {
///     fn expired(&self) -> bool {
///         true
///     }
/// }
///
/// assert_eq!(accumulate_until(&Already).terms(), 0);
/// assert!(!Never.expired());
/// ```
pub trait Deadline {
    /// Returns `true` once the deadline has passed. Must not block.
    fn expired(&self) -> bool;
}

impl<D: Deadline + ?Sized> Deadline for &D {
    fn expired(&self) -> bool {
        (**self).expired()
    }
}
