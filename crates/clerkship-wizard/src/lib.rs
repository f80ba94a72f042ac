//! clerkship-wizard
//!
//! The case wizard itself: per-learner session state, the validation rules
//! of every page, the case materials pages draw from, and the [`Wizard`]
//! router that moves a learner from page to page and writes each completed
//! step to the document store.

pub mod case;
pub mod catalog;
pub mod error;
pub mod history;
pub mod login;
pub mod router;
pub mod session;
pub mod steps;
pub mod validation;
pub mod view;

pub use case::{CaseFiles, CatalogKind};
pub use error::WizardError;
pub use router::Wizard;
pub use validation::ValidationError;
