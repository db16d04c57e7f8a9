//! Count-bounded summation: fan out one unit of work per term, fan the terms
//! back in over a single channel and fold them.
//!
//! - [`threaded`] - scoped OS threads over a zero-capacity rendezvous channel.
//! - [`tokio`] - Tokio tasks, unbounded or on a bounded worker pool (requires
//!   `async-tokio`).

#[cfg(feature = "async-tokio")]
mod pool;
pub mod threaded;
#[cfg(feature = "async-tokio")]
pub mod tokio;
