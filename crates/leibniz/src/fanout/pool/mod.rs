//! Bounded worker pool backing [`sum_terms_pooled`](super::tokio::sum_terms_pooled).
//!
//! - [`manager`] - round-robin dispatch and shutdown (`WorkerPool`).
//! - [`worker`] - the per-worker loop turning indices into terms.

pub mod manager;
pub mod worker;
