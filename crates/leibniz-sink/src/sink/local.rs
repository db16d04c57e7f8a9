use crate::{
    BlobSink, Result, SinkError,
    sink::interface::{get_object, put_object},
};
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use std::path::{Path, PathBuf};

/// Filesystem sink: bucket `b` is the directory `root/b`, created on demand.
#[derive(Clone, Debug)]
pub struct LocalSink {
    root: PathBuf,
}

impl LocalSink {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn store(&self, bucket: &str) -> Result<LocalFileSystem> {
        let dir = self.root.join(bucket);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| SinkError::Io {
                path: dir.clone(),
                source,
            })?;

        LocalFileSystem::new_with_prefix(&dir).map_err(|source| SinkError::Client {
            bucket: bucket.to_string(),
            source,
        })
    }

    /// Reads an object back from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Read`] if the object does not exist.
    pub async fn get(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let store = self.store(bucket).await?;
        get_object(&store, bucket, key).await
    }
}

impl BlobSink for LocalSink {
    async fn put(&self, bucket: &str, key: &str, contents: &str) -> Result<()> {
        let store = self.store(bucket).await?;
        put_object(&store, bucket, key, contents).await
    }
}
