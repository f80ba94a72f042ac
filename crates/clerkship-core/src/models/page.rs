use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// One screen of the case wizard.
///
/// The declaration order is the order a learner walks through the case;
/// [`Page::next`] is the only transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Page {
    Welcome,
    Login,
    IntakeForm,
    Diagnoses,
    InterventionEntry,
    HistoryWithAi,
    FocusedPhysicalExam,
    PhysicalExamComponents,
    HistoryIllnessScript,
    PhysicalExamFeatures,
    LaboratoryTests,
    RadiologyTests,
    OtherTests,
    Results,
    LaboratoryFeatures,
    Treatments,
    Summary,
}

impl Page {
    pub const ALL: [Page; 17] = [
        Page::Welcome,
        Page::Login,
        Page::IntakeForm,
        Page::Diagnoses,
        Page::InterventionEntry,
        Page::HistoryWithAi,
        Page::FocusedPhysicalExam,
        Page::PhysicalExamComponents,
        Page::HistoryIllnessScript,
        Page::PhysicalExamFeatures,
        Page::LaboratoryTests,
        Page::RadiologyTests,
        Page::OtherTests,
        Page::Results,
        Page::LaboratoryFeatures,
        Page::Treatments,
        Page::Summary,
    ];

    /// The page reached after this one is completed. `Summary` is terminal.
    pub fn next(self) -> Option<Page> {
        let next = match self {
            Page::Welcome => Page::Login,
            Page::Login => Page::IntakeForm,
            Page::IntakeForm => Page::Diagnoses,
            Page::Diagnoses => Page::InterventionEntry,
            Page::InterventionEntry => Page::HistoryWithAi,
            Page::HistoryWithAi => Page::FocusedPhysicalExam,
            Page::FocusedPhysicalExam => Page::PhysicalExamComponents,
            Page::PhysicalExamComponents => Page::HistoryIllnessScript,
            Page::HistoryIllnessScript => Page::PhysicalExamFeatures,
            Page::PhysicalExamFeatures => Page::LaboratoryTests,
            Page::LaboratoryTests => Page::RadiologyTests,
            Page::RadiologyTests => Page::OtherTests,
            Page::OtherTests => Page::Results,
            Page::Results => Page::LaboratoryFeatures,
            Page::LaboratoryFeatures => Page::Treatments,
            Page::Treatments => Page::Summary,
            Page::Summary => return None,
        };
        Some(next)
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// The `diagnoses_sN` slot this page freezes on submit, if any.
    pub fn snapshot_slot(self) -> Option<u8> {
        match self {
            Page::Diagnoses => Some(1),
            Page::HistoryIllnessScript => Some(2),
            Page::PhysicalExamFeatures => Some(3),
            Page::LaboratoryTests => Some(4),
            Page::RadiologyTests => Some(5),
            Page::OtherTests => Some(6),
            Page::LaboratoryFeatures => Some(7),
            Page::Treatments => Some(8),
            _ => None,
        }
    }

    /// Pages that show the reorder panel for the working differential.
    pub fn shows_diagnosis_panel(self) -> bool {
        matches!(self.snapshot_slot(), Some(n) if n > 1)
    }

    /// Pages a session can only reach after a learner code was accepted.
    pub fn requires_login(self) -> bool {
        !matches!(self, Page::Welcome | Page::Login)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Page::Welcome => "welcome",
            Page::Login => "login",
            Page::IntakeForm => "intake_form",
            Page::Diagnoses => "diagnoses",
            Page::InterventionEntry => "intervention_entry",
            Page::HistoryWithAi => "history_with_ai",
            Page::FocusedPhysicalExam => "focused_physical_exam",
            Page::PhysicalExamComponents => "physical_exam_components",
            Page::HistoryIllnessScript => "history_illness_script",
            Page::PhysicalExamFeatures => "physical_exam_features",
            Page::LaboratoryTests => "laboratory_tests",
            Page::RadiologyTests => "radiology_tests",
            Page::OtherTests => "other_tests",
            Page::Results => "results",
            Page::LaboratoryFeatures => "laboratory_features",
            Page::Treatments => "treatments",
            Page::Summary => "summary",
        }
    }

    /// Parse a stored page name.
    ///
    /// Accepts the snake_case names written by this system as well as the
    /// display names older documents carry (`"History with AI"`,
    /// `"Simple Success"`, ...).
    pub fn parse(raw: &str) -> Result<Page, CoreError> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        let page = match normalized.as_str() {
            "welcome" => Page::Welcome,
            "login" => Page::Login,
            "intake_form" => Page::IntakeForm,
            "diagnoses" => Page::Diagnoses,
            "intervention_entry" => Page::InterventionEntry,
            "history_with_ai" => Page::HistoryWithAi,
            "focused_physical_exam" | "focused_physical_examination" => {
                Page::FocusedPhysicalExam
            }
            "physical_exam_components" | "physical_examination_components" => {
                Page::PhysicalExamComponents
            }
            "history_illness_script" => Page::HistoryIllnessScript,
            "physical_exam_features" | "physical_examination_features" => {
                Page::PhysicalExamFeatures
            }
            "laboratory_tests" => Page::LaboratoryTests,
            "radiology_tests" | "radiological_tests" => Page::RadiologyTests,
            "other_tests" => Page::OtherTests,
            "results" => Page::Results,
            "laboratory_features" => Page::LaboratoryFeatures,
            "treatments" => Page::Treatments,
            "summary" | "simple_success" => Page::Summary,
            _ => return Err(CoreError::UnknownPage(raw.to_string())),
        };
        Ok(page)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
