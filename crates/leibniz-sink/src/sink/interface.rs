use crate::{Result, SinkError};
use bytes::Bytes;
use object_store::{ObjectStore, PutPayload, path::Path};

/// An object-storage collaborator that accepts named payloads.
///
/// `put` either stores `contents` under `bucket`/`key` or fails. Sinks never
/// retry; callers decide whether a failure is fatal.
///
/// # Example
///
/// ```
/// use leibniz_sink::{BlobSink, Result};
///
/// struct Discard;
/// impl BlobSink for Discard {
///     async fn put(&self, _bucket: &str, _key: &str, _contents: &str) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait BlobSink {
    /// Stores `contents` as the object `key` in `bucket`.
    fn put(
        &self,
        bucket: &str,
        key: &str,
        contents: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Writes `contents` to `key` in an already-built store for `bucket`.
pub(crate) async fn put_object(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    contents: &str,
) -> Result<()> {
    let payload = PutPayload::from(Bytes::copy_from_slice(contents.as_bytes()));
    store
        .put(&Path::from(key), payload)
        .await
        .map_err(|source| SinkError::Write {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(bucket, key, bytes = contents.len(), "Object written");

    Ok(())
}

/// Reads `key` back from an already-built store for `bucket`.
pub(crate) async fn get_object(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<Bytes> {
    let read_err = |source| SinkError::Read {
        bucket: bucket.to_string(),
        key: key.to_string(),
        source,
    };

    store
        .get(&Path::from(key))
        .await
        .map_err(read_err)?
        .bytes()
        .await
        .map_err(read_err)
}
