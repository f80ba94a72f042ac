pub mod answers;
pub mod diagnoses;
pub mod entry;
pub mod exams;
pub mod judgment;
pub mod page;
pub mod record;
pub mod vitals;
