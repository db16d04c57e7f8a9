use crate::{BlobSink, Destination, GcsSink, LocalSink, MemorySink, Result};

/// A sink chosen at runtime from a parsed [`Destination`].
#[derive(Clone, Debug)]
pub enum AnySink {
    Gcs(GcsSink),
    Local(LocalSink),
    Memory(MemorySink),
}

impl AnySink {
    /// Builds the backend that serves `destination`.
    ///
    /// No I/O happens here; clients are created on the first `put`.
    #[must_use]
    pub fn for_destination(destination: &Destination) -> Self {
        match destination {
            Destination::Gcs { .. } => Self::Gcs(GcsSink),
            Destination::Local { root, .. } => Self::Local(LocalSink::new(root.clone())),
            Destination::Memory { .. } => Self::Memory(MemorySink::new()),
        }
    }
}

impl BlobSink for AnySink {
    async fn put(&self, bucket: &str, key: &str, contents: &str) -> Result<()> {
        match self {
            Self::Gcs(sink) => sink.put(bucket, key, contents).await,
            Self::Local(sink) => sink.put(bucket, key, contents).await,
            Self::Memory(sink) => sink.put(bucket, key, contents).await,
        }
    }
}
