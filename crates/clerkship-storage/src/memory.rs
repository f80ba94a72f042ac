use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use clerkship_core::models::record::{Document, SessionRecord};

use crate::error::StorageError;
use crate::store::{merge_documents, DocumentStore};

/// Process-local document store for local runs and tests.
///
/// Counts successful writes and can be told to fail them, which is how the
/// wizard's "no write on validation failure" and "failed write keeps the
/// page" contracts are exercised.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Document>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document directly, bypassing the write counter.
    pub async fn insert(&self, code: &str, doc: Document) {
        self.docs.write().await.insert(code.to_string(), doc);
    }

    /// Number of merges that succeeded.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, code: &str) -> Result<Option<SessionRecord>, StorageError> {
        Ok(self.docs.read().await.get(code).cloned().map(SessionRecord::new))
    }

    async fn merge(&self, code: &str, partial: Document) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed {
                code: code.to_string(),
                reason: "writes disabled".to_string(),
            });
        }
        let mut docs = self.docs.write().await;
        merge_documents(docs.entry(code.to_string()).or_default(), partial);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
