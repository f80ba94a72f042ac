use async_trait::async_trait;
use aws_sdk_s3::Client;

use clerkship_core::doc_keys;
use clerkship_core::models::record::{Document, SessionRecord};

use crate::error::StorageError;
use crate::state;
use crate::store::{merge_documents, DocumentStore};

/// Session documents stored as JSON objects under `{collection}/` in one
/// bucket.
///
/// A merge is read-modify-write guarded by the ETag read (or by absence for
/// a new document), so a concurrent writer to the same code surfaces as a
/// failed write instead of a lost update.
#[derive(Clone)]
pub struct S3DocumentStore {
    client: Client,
    bucket: String,
    collection: String,
}

impl S3DocumentStore {
    pub fn new(client: Client, bucket: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            collection: collection.into(),
        }
    }

    /// Build the store and check the bucket is reachable.
    pub async fn connect(
        client: Client,
        bucket: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let store = Self::new(client, bucket, collection);
        crate::objects::head_bucket(&store.client, &store.bucket).await?;
        tracing::info!(bucket = %store.bucket, collection = %store.collection, "document store connected");
        Ok(store)
    }

    fn key(&self, code: &str) -> String {
        doc_keys::session_record(&self.collection, code)
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn get(&self, code: &str) -> Result<Option<SessionRecord>, StorageError> {
        let key = self.key(code);
        let loaded = state::load_document(&self.client, &self.bucket, &key).await?;
        Ok(loaded.map(|l| SessionRecord::new(l.doc)))
    }

    async fn merge(&self, code: &str, partial: Document) -> Result<(), StorageError> {
        let key = self.key(code);
        let write_failed = |e: StorageError| StorageError::WriteFailed {
            code: code.to_string(),
            reason: e.to_string(),
        };

        let loaded = state::load_document(&self.client, &self.bucket, &key)
            .await
            .map_err(write_failed)?;
        let (mut doc, etag) = match loaded {
            Some(l) => (l.doc, Some(l.etag)),
            None => (Document::new(), None),
        };
        let field_count = partial.len();
        merge_documents(&mut doc, partial);

        state::save_document(&self.client, &self.bucket, &key, &doc, etag.as_deref())
            .await
            .map_err(write_failed)?;

        tracing::debug!(key = %key, fields = field_count, "document merged");
        Ok(())
    }
}
