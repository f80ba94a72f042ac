//! The answer-grid pages: five item rows judged against each diagnosis on
//! the working differential.
//!
//! Seven pages share this shape and differ only in their judgment scale,
//! where items come from and which document field they write. Each is a
//! zero-sized [`GridStep`] type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use clerkship_core::fields::field;
use clerkship_core::models::answers::{GridDraft, GridRow, ROW_COUNT};
use clerkship_core::models::judgment::{
    FeatureJudgment, Judgment, TestJudgment, TreatmentJudgment,
};
use clerkship_core::models::page::Page;

use crate::case::CatalogKind;
use crate::catalog::Catalog;
use crate::session::GridDrafts;
use crate::validation::{first_duplicate, ValidationError};

pub trait GridStep: Send + Sync + 'static {
    type Judgment: Judgment;

    const PAGE: Page;
    /// Document field the answers are written to.
    const FIELD: &'static str;
    /// Noun for one row, used in messages.
    const ITEM: &'static str;
    /// Catalog rows must be picked from; free text when `None`.
    const CATALOG: Option<CatalogKind>;

    fn draft(grids: &mut GridDrafts) -> &mut Option<GridDraft<Self::Judgment>>;
}

macro_rules! grid_step {
    ($name:ident, $judgment:ty, $page:expr, $field:expr, $item:literal, $catalog:expr, $slot:ident) => {
        pub struct $name;

        impl GridStep for $name {
            type Judgment = $judgment;
            const PAGE: Page = $page;
            const FIELD: &'static str = $field;
            const ITEM: &'static str = $item;
            const CATALOG: Option<CatalogKind> = $catalog;

            fn draft(grids: &mut GridDrafts) -> &mut Option<GridDraft<$judgment>> {
                &mut grids.$slot
            }
        }
    };
}

grid_step!(
    HistoryFeatures,
    FeatureJudgment,
    Page::HistoryIllnessScript,
    field::HXFEATURES,
    "historical feature",
    None,
    history_features
);
grid_step!(
    PhysicalFeatures,
    FeatureJudgment,
    Page::PhysicalExamFeatures,
    field::PEFEATURES,
    "physical exam feature",
    None,
    physical_features
);
grid_step!(
    LabTests,
    TestJudgment,
    Page::LaboratoryTests,
    field::LABORATORY_TESTS,
    "laboratory test",
    Some(CatalogKind::LabTests),
    lab_tests
);
grid_step!(
    RadTests,
    TestJudgment,
    Page::RadiologyTests,
    field::RADIOLOGICAL_TESTS,
    "radiology test",
    Some(CatalogKind::RadTests),
    rad_tests
);
grid_step!(
    OtherTests,
    TestJudgment,
    Page::OtherTests,
    field::OTHER_TESTS,
    "other test",
    Some(CatalogKind::OtherTests),
    other_tests
);
grid_step!(
    LabFeatures,
    FeatureJudgment,
    Page::LaboratoryFeatures,
    field::LABORATORY_FEATURES,
    "laboratory feature",
    None,
    lab_features
);
grid_step!(
    Treatments,
    TreatmentJudgment,
    Page::Treatments,
    field::ASSESSMENTS,
    "treatment",
    None,
    treatments
);

/// A submitted or displayed grid, with judgments as their labels keyed by
/// diagnosis name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GridForm {
    pub rows: Vec<GridFormRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GridFormRow {
    pub item: String,
    #[serde(default)]
    pub judgments: BTreeMap<String, String>,
}

impl GridForm {
    /// The form for a draft, showing only columns for diagnoses still on
    /// the differential. Judgments for a replaced diagnosis stay in the
    /// draft but are not offered back.
    pub fn from_draft<J: Judgment>(draft: &GridDraft<J>, diagnoses: &[String]) -> Self {
        let rows = draft
            .rows
            .iter()
            .map(|row| GridFormRow {
                item: row.item.clone(),
                judgments: row
                    .judgments
                    .iter()
                    .filter(|&(dx, _)| diagnoses.contains(dx))
                    .map(|(dx, j)| (dx.clone(), j.label().to_string()))
                    .collect(),
            })
            .collect();
        Self { rows }
    }
}

/// Check a submitted grid against the current differential and turn it
/// into a draft.
///
/// Items are trimmed and, for catalog-backed pages, restored to the
/// catalog's spelling. Judgment columns must name current diagnoses.
/// Judgments on empty rows are dropped.
pub fn validate<S: GridStep>(
    form: GridForm,
    diagnoses: &[String],
    catalog: Option<&Catalog>,
) -> Result<GridDraft<S::Judgment>, ValidationError> {
    if diagnoses.is_empty() {
        return Err(ValidationError::NoDiagnoses);
    }
    if form.rows.len() > ROW_COUNT {
        return Err(ValidationError::TooManyRows { max: ROW_COUNT });
    }

    let mut rows = Vec::with_capacity(ROW_COUNT);
    for submitted in form.rows {
        let mut item = submitted.item.trim().to_string();
        if let (Some(catalog), false) = (catalog, item.is_empty()) {
            item = catalog
                .canonical(&item)
                .ok_or_else(|| ValidationError::unknown_option(catalog.name(), &item))?
                .to_string();
        }

        let mut judgments = BTreeMap::new();
        for (column, label) in submitted.judgments {
            let judgment = S::Judgment::from_label(&label)
                .ok_or(ValidationError::UnknownJudgment { value: label })?;
            let diagnosis = diagnoses
                .iter()
                .find(|d| d.eq_ignore_ascii_case(column.trim()))
                .ok_or(ValidationError::UnknownDiagnosis { name: column })?;
            if !item.is_empty() && judgment.is_answered() {
                judgments.insert(diagnosis.clone(), judgment);
            }
        }
        rows.push(GridRow { item, judgments });
    }

    let draft = GridDraft { rows }.normalized();
    if draft.filled_items().next().is_none() {
        return Err(ValidationError::missing(S::ITEM));
    }
    if let Some(repeated) = first_duplicate(draft.filled_items()) {
        return Err(ValidationError::duplicate(repeated));
    }
    Ok(draft)
}
