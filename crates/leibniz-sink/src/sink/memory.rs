use crate::{
    BlobSink, Result,
    sink::interface::{get_object, put_object},
};
use bytes::Bytes;
use object_store::memory::InMemory;
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};

/// Process-local sink keeping one [`InMemory`] store per bucket.
///
/// Clones share the same buckets, so a clone handed to the code under test
/// can be inspected afterwards.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    buckets: Arc<Mutex<HashMap<String, Arc<InMemory>>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, bucket: &str) -> Arc<InMemory> {
        let mut buckets = self.buckets.lock();
        Arc::clone(
            buckets
                .entry(bucket.to_string())
                .or_insert_with(|| Arc::new(InMemory::new())),
        )
    }

    /// Reads an object back.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Read`](crate::SinkError::Read) if the object does
    /// not exist.
    pub async fn get(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let store = self.store(bucket);
        get_object(store.as_ref(), bucket, key).await
    }

    /// Names of all buckets that have been touched.
    #[must_use]
    pub fn buckets(&self) -> Vec<String> {
        let mut names: Vec<_> = self.buckets.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl BlobSink for MemorySink {
    async fn put(&self, bucket: &str, key: &str, contents: &str) -> Result<()> {
        let store = self.store(bucket);
        put_object(store.as_ref(), bucket, key, contents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SinkError;

    #[tokio::test]
    async fn clones_share_buckets() -> Result<()> {
        let sink = MemorySink::new();
        let writer = sink.clone();

        writer.put("a", "k", "3.14").await?;
        writer.put("b", "k", "2.71").await?;

        assert_eq!(sink.get("a", "k").await?, b"3.14".as_slice());
        assert_eq!(sink.get("b", "k").await?, b"2.71".as_slice());
        assert_eq!(sink.buckets(), vec!["a".to_string(), "b".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn buckets_are_isolated() -> Result<()> {
        let sink = MemorySink::new();
        sink.put("a", "k", "1").await?;
        assert!(matches!(
            sink.get("b", "k").await,
            Err(SinkError::Read { .. })
        ));
        Ok(())
    }
}
