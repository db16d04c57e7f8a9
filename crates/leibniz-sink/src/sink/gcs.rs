use crate::{BlobSink, Result, SinkError, sink::interface::put_object};
use object_store::gcp::GoogleCloudStorageBuilder;

/// Google Cloud Storage sink.
///
/// A client is built per `put` from the environment (service account file,
/// application default credentials, or an emulator endpoint), scoped to the
/// requested bucket. Client construction failures surface as
/// [`SinkError::Client`], rejected writes as [`SinkError::Write`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GcsSink;

impl BlobSink for GcsSink {
    async fn put(&self, bucket: &str, key: &str, contents: &str) -> Result<()> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|source| SinkError::Client {
                bucket: bucket.to_string(),
                source,
            })?;

        put_object(&store, bucket, key, contents).await
    }
}
