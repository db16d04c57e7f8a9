//! Error types for blob sinks.
//!
//! Every failure is terminal for the caller: sinks never retry.
//!
//! ## Error Cases
//! - `Client`: the object store client for a bucket could not be built.
//! - `Write`: the store rejected the object.
//! - `Read`: reading an object back failed.
//! - `Io`: local preparation (e.g. creating the bucket directory) failed.
//! - `InvalidDestination`: a destination string could not be parsed.

use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, SinkError>;

/// Unified error type for blob sinks.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("Failed to create storage client for bucket `{bucket}`: {source}")]
    Client {
        bucket: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Failed to write `{key}` to bucket `{bucket}`: {source}")]
    Write {
        bucket: String,
        key: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Failed to read `{key}` from bucket `{bucket}`: {source}")]
    Read {
        bucket: String,
        key: String,
        #[source]
        source: object_store::Error,
    },

    #[error("Failed to prepare `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid destination `{input}`: {reason}")]
    InvalidDestination { input: String, reason: String },
}
