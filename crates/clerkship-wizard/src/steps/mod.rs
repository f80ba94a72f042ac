//! Per-page validation rules.
//!
//! Each function checks one page's submission and returns the value the
//! page stores. They never touch session state or the store; the router
//! applies a validated value and writes it.

pub mod diagnoses;
pub mod exam;
pub mod grid;
pub mod interventions;
