/// Returns the `k`-th term of the Leibniz series, `4 * (-1)^k / (2k + 1)`.
///
/// The sign is taken from the parity of `k` rather than from a power, so the
/// result is exact in sign for every index.
///
/// # Example
///
/// ```
/// use leibniz::term;
///
/// assert_eq!(term(0), 4.0);
/// assert_eq!(term(1), -4.0 / 3.0);
/// ```
#[inline]
#[must_use]
pub fn term(k: u64) -> f64 {
    let numerator = if k % 2 == 0 { 4.0 } else { -4.0 };
    numerator / (2.0 * k as f64 + 1.0)
}

/// Sequential reference sum of the terms `k = 0..=n`.
///
/// Used as the ground truth that the concurrent strategies are compared
/// against.
#[must_use]
pub fn partial_sum(n: u64) -> f64 {
    (0..=n).map(term).sum()
}
