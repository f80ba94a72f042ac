use async_trait::async_trait;

use clerkship_core::models::record::{Document, SessionRecord};

use crate::error::StorageError;

/// The two operations the wizard needs from a document collection.
///
/// Documents are disjoint by code, so different learners never contend
/// and no cross-document locking exists.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document for `code`, or `None` if it was never written.
    async fn get(&self, code: &str) -> Result<Option<SessionRecord>, StorageError>;

    /// Shallow-merge `partial` into the document for `code`, creating it
    /// when absent. Fields not named in `partial` are left untouched.
    async fn merge(&self, code: &str, partial: Document) -> Result<(), StorageError>;
}

/// Top-level field merge: every key of `partial` replaces the same key of
/// `base`; other keys of `base` survive.
pub fn merge_documents(base: &mut Document, partial: Document) {
    for (key, value) in partial {
        base.insert(key, value);
    }
}
