use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be reached at all. Fatal at startup.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// A merge did not land. The caller must not advance the page.
    #[error("write failed for '{code}': {reason}")]
    WriteFailed { code: String, reason: String },

    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("precondition failed for key: {key}")]
    PreconditionFailed { key: String },

    #[error("stored object at {key} is not a JSON object")]
    NotADocument { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),
}

impl StorageError {
    /// Whether the learner can simply submit again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StorageError::WriteFailed { .. }
                | StorageError::PreconditionFailed { .. }
                | StorageError::PutObject(_)
                | StorageError::GetObject(_)
        )
    }
}
