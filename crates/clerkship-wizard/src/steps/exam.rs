use clerkship_core::models::exams::FOCUSED_EXAM_SYSTEMS;

use crate::session::FocusedExam;
use crate::validation::{first_duplicate, ValidationError};

const CATALOG: &str = "exam system";

/// Validate the focused physical exam: at least one system to exclude and
/// one to confirm, each from the fixed list, none repeated or in both
/// lists.
pub fn validate(excluded: &[String], confirmed: &[String]) -> Result<FocusedExam, ValidationError> {
    let excluded = systems(excluded, "exam system to exclude")?;
    let confirmed = systems(confirmed, "exam system to confirm")?;
    if let Some(both) = excluded
        .iter()
        .find(|s| confirmed.iter().any(|c| c == *s))
    {
        return Err(ValidationError::ConflictingSelection {
            exclusive: both.clone(),
        });
    }
    Ok(FocusedExam {
        excluded,
        confirmed,
    })
}

fn systems(selected: &[String], what: &str) -> Result<Vec<String>, ValidationError> {
    let selected: Vec<&str> = selected
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if selected.is_empty() {
        return Err(ValidationError::missing(what));
    }
    if let Some(repeated) = first_duplicate(selected.iter().copied()) {
        return Err(ValidationError::duplicate(repeated));
    }
    selected
        .into_iter()
        .map(|s| {
            FOCUSED_EXAM_SYSTEMS
                .iter()
                .find(|system| system.eq_ignore_ascii_case(s))
                .map(|system| system.to_string())
                .ok_or_else(|| ValidationError::unknown_option(CATALOG, s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn both_lists_are_required() {
        assert_eq!(
            validate(&[], &list(&["Lungs"])).unwrap_err(),
            ValidationError::missing("exam system to exclude")
        );
        assert_eq!(
            validate(&list(&["Skin"]), &list(&[""])).unwrap_err(),
            ValidationError::missing("exam system to confirm")
        );
    }

    #[test]
    fn systems_come_from_the_fixed_list() {
        let exam = validate(&list(&["skin"]), &list(&["LUNGS", "Cardiovascular"])).unwrap();
        assert_eq!(exam.excluded, vec!["Skin"]);
        assert_eq!(exam.confirmed, vec!["Lungs", "Cardiovascular"]);
        assert!(matches!(
            validate(&list(&["Spleen"]), &list(&["Lungs"])),
            Err(ValidationError::UnknownOption { .. })
        ));
    }

    #[test]
    fn a_system_cannot_be_both_excluded_and_confirmed() {
        assert_eq!(
            validate(&list(&["Lungs"]), &list(&["lungs"])).unwrap_err(),
            ValidationError::ConflictingSelection {
                exclusive: "Lungs".into()
            }
        );
    }

    #[test]
    fn repeats_within_a_list_are_rejected() {
        assert!(matches!(
            validate(&list(&["Skin", "skin"]), &list(&["Lungs"])),
            Err(ValidationError::DuplicateSelection { .. })
        ));
    }
}
