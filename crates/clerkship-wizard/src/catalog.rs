use std::path::Path;

use crate::error::WizardError;

/// A static list of selectable options loaded from a line-delimited file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    name: String,
    entries: Vec<String>,
}

impl Catalog {
    /// Each trimmed, non-blank line is one entry. Repeats keep their first
    /// position only.
    pub fn parse(name: impl Into<String>, text: &str) -> Self {
        let mut entries: Vec<String> = Vec::new();
        for line in text.lines() {
            let entry = line.trim();
            if !entry.is_empty() && !entries.iter().any(|e| e == entry) {
                entries.push(entry.to_string());
            }
        }
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn load(name: impl Into<String>, path: &Path) -> Result<Self, WizardError> {
        let text = std::fs::read_to_string(path).map_err(|source| WizardError::CaseFile {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(name, &text);
        tracing::debug!(catalog = %catalog.name, entries = catalog.entries.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The catalog's own spelling of `value`, matched case-insensitively.
    pub fn canonical(&self, value: &str) -> Option<&str> {
        let value = value.trim();
        self.entries
            .iter()
            .find(|e| e.eq_ignore_ascii_case(value))
            .map(String::as_str)
    }

    /// Entries containing `query` (case-insensitive), minus anything
    /// `exclude` rejects, in catalog order. A blank query matches nothing.
    pub fn search<F>(&self, query: &str, exclude: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.to_lowercase().contains(&needle) && !exclude(e))
            .cloned()
            .collect()
    }
}
