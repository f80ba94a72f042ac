use std::path::PathBuf;

use thiserror::Error;

use clerkship_core::error::CoreError;
use clerkship_core::models::page::Page;
use clerkship_storage::StorageError;

use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum WizardError {
    /// The learner can correct the input; nothing was written.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("invalid code")]
    UnknownCode,

    #[error("no learner is logged in")]
    NotLoggedIn,

    #[error("action belongs to {expected}, but the session is on {actual}")]
    WrongPage { expected: Page, actual: Page },

    #[error("{action} is not available on {page}")]
    Unavailable { action: &'static str, page: Page },

    #[error("history taking time is up; end the session to continue")]
    HistoryClosed,

    #[error("store error: {0}")]
    Store(#[from] StorageError),

    #[error("stored document is malformed: {0}")]
    Record(#[from] CoreError),

    #[error("failed to read {path}: {source}")]
    CaseFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WizardError {
    pub fn wrong_page(expected: Page, actual: Page) -> Self {
        WizardError::WrongPage { expected, actual }
    }
}
