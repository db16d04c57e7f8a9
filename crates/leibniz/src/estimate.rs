use core::fmt;

/// The result of one approximation run.
///
/// Carries the accumulated sum together with the number of terms that went
/// into it. [`Display`](fmt::Display) renders only the value, using the
/// shortest decimal text that round-trips back to the same `f64` and never
/// exponent notation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    value: f64,
    terms: u64,
}

impl Estimate {
    /// An estimate with no terms summed.
    pub const EMPTY: Self = Self::new(0.0, 0);

    #[must_use]
    pub const fn new(value: f64, terms: u64) -> Self {
        Self { value, terms }
    }

    /// The approximation of π.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// How many series terms were added to produce [`Self::value`].
    #[must_use]
    pub const fn terms(&self) -> u64 {
        self.terms
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
