use std::collections::HashMap;
use std::path::Path;

use crate::error::WizardError;

/// Learner codes and the names they map to, read from a `code,name` CSV.
#[derive(Debug, Clone, Default)]
pub struct LoginDirectory {
    names: HashMap<String, String>,
}

impl LoginDirectory {
    /// Parse the directory. The first line is a header if its first column
    /// is `code`. Malformed rows are skipped.
    pub fn parse(text: &str) -> Self {
        let mut names = HashMap::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((code, name)) = line.split_once(',') else {
                tracing::warn!(line = line_no + 1, "login directory row without a name, skipped");
                continue;
            };
            let (code, name) = (unquote(code), unquote(name));
            if line_no == 0 && code.eq_ignore_ascii_case("code") {
                continue;
            }
            if code.is_empty() {
                tracing::warn!(line = line_no + 1, "login directory row without a code, skipped");
                continue;
            }
            names.insert(code.to_string(), name.to_string());
        }
        Self { names }
    }

    pub fn load(path: &Path) -> Result<Self, WizardError> {
        let text = std::fs::read_to_string(path).map_err(|source| WizardError::CaseFile {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::parse(&text);
        tracing::info!(learners = directory.len(), "login directory loaded");
        Ok(directory)
    }

    /// The learner name for a code. Codes are compared exactly after
    /// trimming.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.names.get(code.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_skipped_and_rows_trimmed() {
        let dir = LoginDirectory::parse("code,name\nA1, Jane\n B2 ,\"Sam Lee\"\n");
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.lookup("A1"), Some("Jane"));
        assert_eq!(dir.lookup(" B2 "), Some("Sam Lee"));
        assert_eq!(dir.lookup("code"), None);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let dir = LoginDirectory::parse("code,name\nnocomma\n,Nobody\nC3,Ana\n");
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.lookup("C3"), Some("Ana"));
    }

    #[test]
    fn codes_are_case_sensitive() {
        let dir = LoginDirectory::parse("A1,Jane\n");
        assert_eq!(dir.lookup("A1"), Some("Jane"));
        assert_eq!(dir.lookup("a1"), None);
    }
}
