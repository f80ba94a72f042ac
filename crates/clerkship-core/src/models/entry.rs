use serde::Serialize;

use crate::error::CoreError;
use crate::fields::{self, field};

use super::page::Page;
use super::record::Document;

/// The partial document one step submission merges into the store.
///
/// Every entry carries the learner code and the page to resume at, so a
/// single merge both records the answers and advances the resume point.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEntry {
    fields: Document,
}

impl StepEntry {
    pub fn new(code: &str, resume_at: Page) -> Self {
        let mut fields = Document::new();
        fields.insert(field::CODE.to_string(), code.into());
        fields.insert(field::LAST_PAGE.to_string(), resume_at.as_str().into());
        Self { fields }
    }

    pub fn with<T: Serialize + ?Sized>(mut self, name: &str, value: &T) -> Result<Self, CoreError> {
        self.fields
            .insert(name.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Freeze `diagnoses` as snapshot `n`.
    pub fn with_snapshot(self, n: u8, diagnoses: &[String]) -> Result<Self, CoreError> {
        self.with(&fields::snapshot(n), diagnoses)
    }

    pub fn fields(&self) -> &Document {
        &self.fields
    }

    pub fn into_fields(self) -> Document {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_carries_code_and_resume_page() {
        let entry = StepEntry::new("A1", Page::Diagnoses);
        assert_eq!(entry.fields()["code"], json!("A1"));
        assert_eq!(entry.fields()["last_page"], json!("diagnoses"));
    }

    #[test]
    fn snapshot_uses_numbered_field() {
        let dx = vec!["Croup".to_string()];
        let entry = StepEntry::new("A1", Page::InterventionEntry)
            .with_snapshot(1, &dx)
            .unwrap();
        assert_eq!(entry.fields()["diagnoses_s1"], json!(["Croup"]));
    }
}
