use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown page: {0}")]
    UnknownPage(String),

    #[error("field '{field}' has an unexpected shape: {source}")]
    FieldShape {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("diagnosis slot {0} is out of range (expected 0..5)")]
    SlotOutOfRange(usize),
}
