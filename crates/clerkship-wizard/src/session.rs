//! Per-learner session state.
//!
//! The state is what every page renders from. Fields start out empty and
//! are hydrated from the stored document the first time a page needs
//! them; the store is otherwise only touched when a step is submitted.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use clerkship_core::fields::field;
use clerkship_core::models::answers::GridDraft;
use clerkship_core::models::diagnoses::DiagnosisSlate;
use clerkship_core::models::judgment::{FeatureJudgment, TestJudgment, TreatmentJudgment};
use clerkship_core::models::page::Page;
use clerkship_core::models::record::{Document, SessionRecord};
use clerkship_core::models::vitals::VitalSigns;
use clerkship_storage::{merge_documents, DocumentStore};

use crate::error::WizardError;
use crate::history::{HistoryVisit, Transcript};
use crate::steps::grid::GridStep;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Learner {
    pub code: String,
    pub name: String,
}

/// Selections made on the focused physical exam page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FocusedExam {
    pub excluded: Vec<String>,
    pub confirmed: Vec<String>,
}

/// In-progress drafts of the answer grids, one per grid page.
#[derive(Debug, Clone, Default)]
pub struct GridDrafts {
    pub history_features: Option<GridDraft<FeatureJudgment>>,
    pub physical_features: Option<GridDraft<FeatureJudgment>>,
    pub lab_tests: Option<GridDraft<TestJudgment>>,
    pub rad_tests: Option<GridDraft<TestJudgment>>,
    pub other_tests: Option<GridDraft<TestJudgment>>,
    pub lab_features: Option<GridDraft<FeatureJudgment>>,
    pub treatments: Option<GridDraft<TreatmentJudgment>>,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    page: Page,
    learner: Option<Learner>,
    /// The stored document as of the last read or successful write.
    record: Option<SessionRecord>,
    diagnoses: Option<DiagnosisSlate>,
    vital_signs: Option<VitalSigns>,
    interventions: Option<Vec<String>>,
    focused_exam: Option<FocusedExam>,
    history: Option<HistoryVisit>,
    grids: GridDrafts,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            page: Page::Welcome,
            learner: None,
            record: None,
            diagnoses: None,
            vital_signs: None,
            interventions: None,
            focused_exam: None,
            history: None,
            grids: GridDrafts::default(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub(crate) fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    pub fn learner(&self) -> Option<&Learner> {
        self.learner.as_ref()
    }

    pub(crate) fn set_learner(&mut self, learner: Learner) {
        self.learner = Some(learner);
    }

    pub fn code(&self) -> Result<&str, WizardError> {
        self.learner
            .as_ref()
            .map(|l| l.code.as_str())
            .ok_or(WizardError::NotLoggedIn)
    }

    /// The stored document, fetched once per session.
    pub async fn record(&mut self, store: &dyn DocumentStore) -> Result<&SessionRecord, WizardError> {
        if self.record.is_none() {
            let fetched = store.get(self.code()?).await?.unwrap_or_default();
            self.record = Some(fetched);
        }
        Ok(self.record.get_or_insert_with(SessionRecord::default))
    }

    /// Fold a successful write into the cached document so later
    /// hydration sees it without another read.
    pub(crate) fn remember_write(&mut self, partial: Document) {
        if let Some(record) = self.record.take() {
            let mut doc = record.into_document();
            merge_documents(&mut doc, partial);
            self.record = Some(SessionRecord::new(doc));
        }
    }

    pub async fn ensure_diagnoses(
        &mut self,
        store: &dyn DocumentStore,
    ) -> Result<&mut DiagnosisSlate, WizardError> {
        if self.diagnoses.is_none() {
            let slate = self.record(store).await?.working_diagnoses()?.unwrap_or_default();
            self.diagnoses = Some(slate);
        }
        Ok(self.diagnoses.get_or_insert_with(DiagnosisSlate::default))
    }

    pub(crate) fn set_diagnoses(&mut self, slate: DiagnosisSlate) {
        self.diagnoses = Some(slate);
    }

    pub async fn ensure_vital_signs(
        &mut self,
        store: &dyn DocumentStore,
    ) -> Result<&mut VitalSigns, WizardError> {
        if self.vital_signs.is_none() {
            let vitals = self.record(store).await?.vital_signs()?.unwrap_or_default();
            self.vital_signs = Some(vitals);
        }
        Ok(self.vital_signs.get_or_insert_with(VitalSigns::default))
    }

    pub(crate) fn set_vital_signs(&mut self, vitals: VitalSigns) {
        self.vital_signs = Some(vitals);
    }

    pub async fn ensure_interventions(
        &mut self,
        store: &dyn DocumentStore,
    ) -> Result<&mut Vec<String>, WizardError> {
        if self.interventions.is_none() {
            let selected = self.record(store).await?.interventions()?.unwrap_or_default();
            self.interventions = Some(selected);
        }
        Ok(self.interventions.get_or_insert_with(Vec::new))
    }

    pub(crate) fn set_interventions(&mut self, selected: Vec<String>) {
        self.interventions = Some(selected);
    }

    pub async fn ensure_focused_exam(
        &mut self,
        store: &dyn DocumentStore,
    ) -> Result<&mut FocusedExam, WizardError> {
        if self.focused_exam.is_none() {
            let record = self.record(store).await?;
            let exam = FocusedExam {
                excluded: record.string_list(field::EXCLUDED_EXAMS)?.unwrap_or_default(),
                confirmed: record.string_list(field::CONFIRMED_EXAMS)?.unwrap_or_default(),
            };
            self.focused_exam = Some(exam);
        }
        Ok(self.focused_exam.get_or_insert_with(FocusedExam::default))
    }

    pub(crate) fn set_focused_exam(&mut self, exam: FocusedExam) {
        self.focused_exam = Some(exam);
    }

    /// The current history visit, started at `now` if there is none. A
    /// transcript saved by an earlier visit is carried over.
    pub async fn ensure_history(
        &mut self,
        store: &dyn DocumentStore,
        now: Timestamp,
    ) -> Result<&mut HistoryVisit, WizardError> {
        if self.history.is_none() {
            let record = self.record(store).await?;
            let transcript = Transcript::from_lists(
                record.string_list(field::QUESTIONS_ASKED)?.unwrap_or_default(),
                record.string_list(field::RESPONSES)?.unwrap_or_default(),
            );
            self.history = Some(HistoryVisit::new(now, transcript));
        }
        Ok(self
            .history
            .get_or_insert_with(|| HistoryVisit::new(now, Transcript::default())))
    }

    pub fn history(&self) -> Option<&HistoryVisit> {
        self.history.as_ref()
    }

    pub(crate) fn clear_history(&mut self) {
        self.history = None;
    }

    pub async fn ensure_grid<S: GridStep>(
        &mut self,
        store: &dyn DocumentStore,
    ) -> Result<&mut GridDraft<S::Judgment>, WizardError> {
        if S::draft(&mut self.grids).is_none() {
            let draft = self
                .record(store)
                .await?
                .answers::<S::Judgment>(S::FIELD)?
                .map(|answers| GridDraft::from_answers(&answers))
                .unwrap_or_default();
            *S::draft(&mut self.grids) = Some(draft);
        }
        Ok(S::draft(&mut self.grids).get_or_insert_with(GridDraft::default))
    }

    pub(crate) fn set_grid<S: GridStep>(&mut self, draft: GridDraft<S::Judgment>) {
        *S::draft(&mut self.grids) = Some(draft);
    }
}
