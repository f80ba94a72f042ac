//! clerkship-core
//!
//! Pure domain types for the clerkship case survey: wizard pages and their
//! transition table, the five-slot differential, judgment scales, the
//! stored session document and its key conventions.
//! No AWS SDK dependency.

pub mod doc_keys;
pub mod error;
pub mod fields;
pub mod models;
