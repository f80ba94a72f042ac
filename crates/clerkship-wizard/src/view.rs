use serde::Serialize;
use ts_rs::TS;

use clerkship_core::models::page::Page;
use clerkship_core::models::vitals::VitalSigns;

use crate::case::{CatalogKind, VitalReading};
use crate::history::Exchange;
use crate::session::FocusedExam;
use crate::steps::grid::GridForm;

/// Everything a client needs to draw the current page.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct PageView {
    pub page: Page,
    pub learner: Option<String>,
    /// The working differential, on pages that show the reorder panel.
    pub diagnoses: Option<Vec<String>>,
    pub content: PageContent,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum PageContent {
    Welcome,
    Login,
    Intake {
        patient_info: String,
        readings: Vec<VitalReading>,
        vital_signs: VitalSigns,
    },
    Diagnoses {
        slots: Vec<String>,
    },
    Interventions {
        selected: Vec<String>,
    },
    History {
        transcript: Vec<Exchange>,
        remaining_secs: i64,
        closed: bool,
    },
    FocusedExam {
        systems: Vec<String>,
        selected: FocusedExam,
    },
    ExamComponents {
        components: Vec<String>,
    },
    Grid {
        item: String,
        catalog: Option<CatalogKind>,
        options: Vec<String>,
        form: GridForm,
    },
    Results {
        results: Vec<String>,
    },
    Summary {
        #[ts(type = "Record<string, unknown>")]
        answers: serde_json::Value,
    },
}
