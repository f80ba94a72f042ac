use clerkship_core::models::exams::NO_ACUTE_INTERVENTION;

use crate::catalog::Catalog;
use crate::validation::{first_duplicate, ValidationError};

/// Validate the selected interventions: at least one, all from the
/// catalog, no repeats, and "No Acute Intervention" only on its own.
pub fn validate(selected: &[String], catalog: &Catalog) -> Result<Vec<String>, ValidationError> {
    let selected: Vec<&str> = selected
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if selected.is_empty() {
        return Err(ValidationError::missing("intervention"));
    }
    if let Some(repeated) = first_duplicate(selected.iter().copied()) {
        return Err(ValidationError::duplicate(repeated));
    }
    if selected.len() > 1
        && selected
            .iter()
            .any(|s| s.eq_ignore_ascii_case(NO_ACUTE_INTERVENTION))
    {
        return Err(ValidationError::ConflictingSelection {
            exclusive: NO_ACUTE_INTERVENTION.to_string(),
        });
    }
    selected
        .into_iter()
        .map(|s| {
            if s.eq_ignore_ascii_case(NO_ACUTE_INTERVENTION) {
                return Ok(NO_ACUTE_INTERVENTION.to_string());
            }
            catalog
                .canonical(s)
                .map(str::to_string)
                .ok_or_else(|| ValidationError::unknown_option(catalog.name(), s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::parse(
            "intervention",
            "No Acute Intervention\nRacemic epinephrine\nDexamethasone\n",
        )
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn selections_are_canonicalized() {
        let picked = validate(&list(&["dexamethasone", "", "Racemic epinephrine"]), &catalog()).unwrap();
        assert_eq!(picked, vec!["Dexamethasone", "Racemic epinephrine"]);
    }

    #[test]
    fn nothing_selected_is_rejected() {
        assert_eq!(
            validate(&list(&["", " "]), &catalog()).unwrap_err(),
            ValidationError::missing("intervention")
        );
    }

    #[test]
    fn no_acute_intervention_stands_alone() {
        assert_eq!(
            validate(&list(&["No Acute Intervention"]), &catalog()).unwrap(),
            vec![NO_ACUTE_INTERVENTION]
        );
        assert!(matches!(
            validate(&list(&["No Acute Intervention", "Dexamethasone"]), &catalog()),
            Err(ValidationError::ConflictingSelection { .. })
        ));
    }

    #[test]
    fn repeats_and_unknowns_are_rejected() {
        assert!(matches!(
            validate(&list(&["Dexamethasone", "DEXAMETHASONE"]), &catalog()),
            Err(ValidationError::DuplicateSelection { .. })
        ));
        assert!(matches!(
            validate(&list(&["Heliox"]), &catalog()),
            Err(ValidationError::UnknownOption { .. })
        ));
    }
}
