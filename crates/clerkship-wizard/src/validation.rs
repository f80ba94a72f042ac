use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// A rule a submission broke. The step is not advanced and nothing is
/// written; the learner fixes the input and submits again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[serde(tag = "rule", rename_all = "snake_case")]
#[ts(export)]
pub enum ValidationError {
    #[error("please provide at least one {what}")]
    MissingAnswer { what: String },

    #[error("please select all 5 diagnoses ({filled} selected)")]
    IncompleteDiagnoses { filled: usize },

    #[error("please do not provide duplicate entries: '{value}' appears more than once")]
    DuplicateSelection { value: String },

    #[error("'{exclusive}' cannot be combined with other selections")]
    ConflictingSelection { exclusive: String },

    #[error("'{value}' is not one of the {catalog} options")]
    UnknownOption { catalog: String, value: String },

    #[error("'{name}' is not on the current differential")]
    UnknownDiagnosis { name: String },

    #[error("'{value}' is not a valid answer here")]
    UnknownJudgment { value: String },

    #[error("diagnosis slot {slot} does not exist")]
    SlotOutOfRange { slot: usize },

    #[error("the differential is empty; add a diagnosis first")]
    NoDiagnoses,

    #[error("at most {max} rows can be submitted")]
    TooManyRows { max: usize },
}

impl ValidationError {
    pub fn missing(what: impl Into<String>) -> Self {
        ValidationError::MissingAnswer { what: what.into() }
    }

    pub fn duplicate(value: impl Into<String>) -> Self {
        ValidationError::DuplicateSelection {
            value: value.into(),
        }
    }

    pub fn unknown_option(catalog: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::UnknownOption {
            catalog: catalog.into(),
            value: value.into(),
        }
    }
}

/// The first value that appears twice, compared trimmed and
/// case-insensitively. Empty values are ignored.
pub fn first_duplicate<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let folded = value.to_lowercase();
        if seen.contains(&folded) {
            return Some(value);
        }
        seen.push(folded);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_duplicate_ignores_blanks_and_case() {
        assert_eq!(first_duplicate(["", "CBC", "", "cbc "]), Some("cbc"));
        assert_eq!(first_duplicate(["", "", ""]), None);
        assert_eq!(first_duplicate(["CBC", "CRP"]), None);
    }

    #[test]
    fn serialized_error_names_the_rule() {
        let json = serde_json::to_value(ValidationError::duplicate("CBC")).unwrap();
        assert_eq!(json["rule"], "duplicate_selection");
        assert_eq!(json["value"], "CBC");
    }

    #[test]
    fn messages_are_learner_facing() {
        assert_eq!(
            ValidationError::IncompleteDiagnoses { filled: 3 }.to_string(),
            "please select all 5 diagnoses (3 selected)"
        );
    }
}
