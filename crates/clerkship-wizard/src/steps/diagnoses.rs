use clerkship_core::models::diagnoses::{DiagnosisSlate, SLOT_COUNT};

use crate::catalog::Catalog;
use crate::validation::ValidationError;

/// Validate the five ranked diagnoses of the diagnoses page.
pub fn validate_slate(submitted: &[String], catalog: &Catalog) -> Result<DiagnosisSlate, ValidationError> {
    if submitted.len() > SLOT_COUNT {
        return Err(ValidationError::TooManyRows { max: SLOT_COUNT });
    }
    let slate = DiagnosisSlate::from_list(submitted);
    if let Some(repeated) = slate.first_duplicate() {
        return Err(ValidationError::duplicate(repeated));
    }
    if !slate.is_complete() {
        return Err(ValidationError::IncompleteDiagnoses {
            filled: slate.filled().len(),
        });
    }
    let canonical = slate
        .slots()
        .iter()
        .map(|name| {
            catalog
                .canonical(name)
                .map(str::to_string)
                .ok_or_else(|| ValidationError::unknown_option(catalog.name(), name))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DiagnosisSlate::from_list(canonical))
}

/// Validate replacing `slot` of the working differential with `name`.
/// Returns the catalog spelling of the name.
pub fn validate_replacement<'c>(
    slate: &DiagnosisSlate,
    slot: usize,
    name: &str,
    catalog: &'c Catalog,
) -> Result<&'c str, ValidationError> {
    let current = slate
        .get(slot)
        .ok_or(ValidationError::SlotOutOfRange { slot })?;
    let name = catalog
        .canonical(name)
        .ok_or_else(|| ValidationError::unknown_option(catalog.name(), name.trim()))?;
    if slate.contains(name) && !current.eq_ignore_ascii_case(name) {
        return Err(ValidationError::duplicate(name));
    }
    Ok(name)
}
