//! clerkship-storage
//!
//! The document store behind the wizard: one JSON document per learner
//! code, read whole and updated by shallow merge. The S3 backend is a thin
//! wrapper around the AWS S3 SDK; the in-memory backend serves local runs
//! and tests.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod state;
pub mod store;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use s3::S3DocumentStore;
pub use store::{merge_documents, DocumentStore};
