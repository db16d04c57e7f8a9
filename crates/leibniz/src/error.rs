//! Error types for the count-bounded summation strategies.
//!
//! The arithmetic itself is total. What can fail is the plumbing around it:
//! spawning units of work, or a channel closing before every term has been
//! received.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the concurrent summation strategies.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The result channel closed before all expected terms arrived. This means
    /// a producer panicked or was dropped without publishing.
    #[error("Channel closed after receiving {received} of {expected} terms")]
    ChannelClosed { received: u64, expected: u64 },

    /// Internal channel send/receive failure between the driver and a worker.
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// `n + 1` terms cannot be represented.
    #[error("Term count {0} overflows the number of units of work")]
    CountOverflow(u64),

    /// A unit of work could not be started.
    #[error("Failed to spawn unit of work: {context}")]
    Spawn { context: String },

    /// The caller asked for an unusable configuration.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}
