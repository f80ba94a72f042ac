//! The page router.
//!
//! A [`Wizard`] owns one learner's [`SessionState`] and is the only thing
//! that changes its page. Every submit follows the same order: check the
//! page, validate, keep the validated input in session state, write one
//! merge to the store, then advance. A rejected submit changes nothing; a
//! failed write keeps the input and the page so the learner can retry.

use std::path::PathBuf;
use std::sync::Arc;

use jiff::SignedDuration;

use clerkship_core::error::CoreError;
use clerkship_core::fields::field;
use clerkship_core::models::diagnoses::{DiagnosisSlate, Priority};
use clerkship_core::models::entry::StepEntry;
use clerkship_core::models::exams::{EXAM_COMPONENTS, FOCUSED_EXAM_SYSTEMS};
use clerkship_core::models::judgment::Judgment;
use clerkship_core::models::page::Page;
use clerkship_core::models::record::Document;
use clerkship_core::models::vitals::VitalSigns;
use clerkship_storage::DocumentStore;

use crate::case::{CaseFiles, CatalogKind};
use crate::error::WizardError;
use crate::history::{Clock, Exchange, PatientResponder, SystemClock, DEFAULT_CAP};
use crate::session::{Learner, SessionState};
use crate::steps::grid::{
    self, GridForm, GridStep, HistoryFeatures, LabFeatures, LabTests, OtherTests,
    PhysicalFeatures, RadTests, Treatments,
};
use crate::steps::{diagnoses, exam, interventions};
use crate::validation::ValidationError;
use crate::view::{PageContent, PageView};

pub struct Wizard {
    state: SessionState,
    store: Arc<dyn DocumentStore>,
    case: Arc<CaseFiles>,
    responder: Arc<dyn PatientResponder>,
    clock: Arc<dyn Clock>,
    history_cap: SignedDuration,
}

impl Wizard {
    /// A fresh session on the welcome page. The simulated patient answers
    /// from the case script.
    pub fn new(store: Arc<dyn DocumentStore>, case: Arc<CaseFiles>) -> Self {
        let responder = Arc::new(case.script().clone());
        Self {
            state: SessionState::new(),
            store,
            case,
            responder,
            clock: Arc::new(SystemClock),
            history_cap: DEFAULT_CAP,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_responder(mut self, responder: Arc<dyn PatientResponder>) -> Self {
        self.responder = responder;
        self
    }

    pub fn with_history_cap(mut self, cap: SignedDuration) -> Self {
        self.history_cap = cap;
        self
    }

    pub fn page(&self) -> Page {
        self.state.page()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Render the current page from session state, hydrating what it
    /// needs.
    pub async fn view(&mut self) -> Result<PageView, WizardError> {
        let page = self.state.page();
        let store = self.store.as_ref();
        let content = match page {
            Page::Welcome => PageContent::Welcome,
            Page::Login => PageContent::Login,
            Page::IntakeForm => PageContent::Intake {
                patient_info: self.case.patient_info().to_string(),
                readings: self.case.vital_readings().to_vec(),
                vital_signs: *self.state.ensure_vital_signs(store).await?,
            },
            Page::Diagnoses => PageContent::Diagnoses {
                slots: self.state.ensure_diagnoses(store).await?.slots().to_vec(),
            },
            Page::InterventionEntry => PageContent::Interventions {
                selected: self.state.ensure_interventions(store).await?.clone(),
            },
            Page::HistoryWithAi => {
                let now = self.clock.now();
                let cap = self.history_cap;
                let visit = self.state.ensure_history(store, now).await?;
                PageContent::History {
                    transcript: visit.transcript.exchanges().to_vec(),
                    remaining_secs: visit.remaining(now, cap).as_secs(),
                    closed: visit.is_closed(now, cap),
                }
            }
            Page::FocusedPhysicalExam => PageContent::FocusedExam {
                systems: FOCUSED_EXAM_SYSTEMS.iter().map(|s| s.to_string()).collect(),
                selected: self.state.ensure_focused_exam(store).await?.clone(),
            },
            Page::PhysicalExamComponents => PageContent::ExamComponents {
                components: EXAM_COMPONENTS.iter().map(|s| s.to_string()).collect(),
            },
            Page::HistoryIllnessScript => self.grid_view::<HistoryFeatures>().await?,
            Page::PhysicalExamFeatures => self.grid_view::<PhysicalFeatures>().await?,
            Page::LaboratoryTests => self.grid_view::<LabTests>().await?,
            Page::RadiologyTests => self.grid_view::<RadTests>().await?,
            Page::OtherTests => self.grid_view::<OtherTests>().await?,
            Page::Results => PageContent::Results {
                results: self.case.catalog(CatalogKind::Results).entries().to_vec(),
            },
            Page::LaboratoryFeatures => self.grid_view::<LabFeatures>().await?,
            Page::Treatments => self.grid_view::<Treatments>().await?,
            Page::Summary => PageContent::Summary {
                answers: serde_json::Value::Object(self.state.record(store).await?.document().clone()),
            },
        };

        let diagnoses = if page.shows_diagnosis_panel() {
            Some(self.state.ensure_diagnoses(self.store.as_ref()).await?.slots().to_vec())
        } else {
            None
        };

        Ok(PageView {
            page,
            learner: self.state.learner().map(|l| l.name.clone()),
            diagnoses,
            content,
        })
    }

    async fn grid_view<S: GridStep>(&mut self) -> Result<PageContent, WizardError> {
        let filled = self.state.ensure_diagnoses(self.store.as_ref()).await?.filled();
        let draft = self.state.ensure_grid::<S>(self.store.as_ref()).await?;
        Ok(PageContent::Grid {
            item: S::ITEM.to_string(),
            catalog: S::CATALOG,
            options: <S::Judgment as Judgment>::OPTIONS
                .iter()
                .filter(|j| j.is_answered())
                .map(|j| j.label().to_string())
                .collect(),
            form: GridForm::from_draft(draft, &filled),
        })
    }

    /// Move past a page that has nothing to submit.
    pub async fn advance(&mut self) -> Result<Page, WizardError> {
        match self.state.page() {
            Page::Welcome => {
                self.enter(Page::Login).await;
                Ok(Page::Login)
            }
            Page::PhysicalExamComponents | Page::Results => self.commit(Ok).await,
            page => Err(WizardError::Unavailable {
                action: "advance",
                page,
            }),
        }
    }

    /// Accept a learner code and route to where that learner left off.
    ///
    /// Nothing is written. A returning learner resumes at the stored
    /// `last_page`; a new one starts at the intake form.
    pub async fn login(&mut self, code: &str) -> Result<Page, WizardError> {
        self.expect_page(Page::Login)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(self.rejected(ValidationError::missing("code")));
        }
        let Some(name) = self.case.logins().lookup(code) else {
            tracing::info!(code = %code, "unknown login code");
            return Err(WizardError::UnknownCode);
        };

        let mut state = SessionState::new();
        state.set_learner(Learner {
            code: code.to_string(),
            name: name.to_string(),
        });
        state.set_page(Page::Login);
        let resume = match state.record(self.store.as_ref()).await?.last_page() {
            Ok(page) => page.filter(|p| p.requires_login()),
            Err(err) => {
                tracing::warn!(code = %code, error = %err, "stored last_page ignored");
                None
            }
        };
        self.state = state;

        let page = resume.unwrap_or(Page::IntakeForm);
        self.enter(page).await;
        tracing::info!(code = %code, page = %page, resumed = resume.is_some(), "learner logged in");
        Ok(page)
    }

    pub async fn submit_intake(&mut self, vitals: VitalSigns) -> Result<Page, WizardError> {
        self.expect_page(Page::IntakeForm)?;
        self.state.set_vital_signs(vitals);
        self.commit(|entry| entry.with(field::VS_DATA, &vitals)).await
    }

    pub async fn submit_diagnoses(&mut self, slots: &[String]) -> Result<Page, WizardError> {
        self.expect_page(Page::Diagnoses)?;
        let slate = diagnoses::validate_slate(slots, self.case.catalog(CatalogKind::Diagnoses))
            .map_err(|err| self.rejected(err))?;
        self.state.set_diagnoses(slate.clone());
        self.commit_with_diagnoses(&slate, Ok).await
    }

    pub async fn submit_interventions(&mut self, selected: &[String]) -> Result<Page, WizardError> {
        self.expect_page(Page::InterventionEntry)?;
        let selected =
            interventions::validate(selected, self.case.catalog(CatalogKind::Interventions))
                .map_err(|err| self.rejected(err))?;
        self.state.set_interventions(selected.clone());
        self.commit(|entry| entry.with(field::INTERVENTIONS, &selected))
            .await
    }

    /// Put a question to the simulated patient. Nothing is written until
    /// the learner ends history taking.
    pub async fn ask(&mut self, question: &str) -> Result<Exchange, WizardError> {
        self.expect_page(Page::HistoryWithAi)?;
        let question = question.trim();
        if question.is_empty() {
            return Err(self.rejected(ValidationError::missing("question")));
        }
        let now = self.clock.now();
        let cap = self.history_cap;
        let visit = self.state.ensure_history(self.store.as_ref(), now).await?;
        if visit.is_closed(now, cap) {
            return Err(WizardError::HistoryClosed);
        }
        if let Some(last) = visit.transcript.last().filter(|l| l.question == question) {
            return Ok(last.clone());
        }
        let exchange = Exchange {
            question: question.to_string(),
            response: self.responder.reply(question, &visit.transcript),
        };
        visit.transcript.push(exchange.clone());
        tracing::debug!(asked = visit.transcript.len(), "history question answered");
        Ok(exchange)
    }

    /// End history taking, writing the transcript. Allowed after the cap.
    pub async fn end_history(&mut self) -> Result<Page, WizardError> {
        self.expect_page(Page::HistoryWithAi)?;
        let now = self.clock.now();
        let visit = self.state.ensure_history(self.store.as_ref(), now).await?;
        let questions = visit.transcript.questions();
        let responses = visit.transcript.responses();
        self.commit(|entry| {
            entry
                .with(field::QUESTIONS_ASKED, &questions)?
                .with(field::RESPONSES, &responses)
        })
        .await
    }

    pub async fn submit_focused_exam(
        &mut self,
        excluded: &[String],
        confirmed: &[String],
    ) -> Result<Page, WizardError> {
        self.expect_page(Page::FocusedPhysicalExam)?;
        let selection = exam::validate(excluded, confirmed).map_err(|err| self.rejected(err))?;
        self.state.set_focused_exam(selection.clone());
        self.commit(|entry| {
            entry
                .with(field::EXCLUDED_EXAMS, &selection.excluded)?
                .with(field::CONFIRMED_EXAMS, &selection.confirmed)
        })
        .await
    }

    /// Findings text for one exam component.
    pub fn exam_findings(&self, component: &str) -> Result<Option<String>, WizardError> {
        self.state.code()?;
        Ok(self.case.exam_findings(component).map(str::to_string))
    }

    /// Submit whichever answer grid the current page shows.
    pub async fn submit_grid(&mut self, form: GridForm) -> Result<Page, WizardError> {
        match self.state.page() {
            Page::HistoryIllnessScript => self.submit_grid_step::<HistoryFeatures>(form).await,
            Page::PhysicalExamFeatures => self.submit_grid_step::<PhysicalFeatures>(form).await,
            Page::LaboratoryTests => self.submit_grid_step::<LabTests>(form).await,
            Page::RadiologyTests => self.submit_grid_step::<RadTests>(form).await,
            Page::OtherTests => self.submit_grid_step::<OtherTests>(form).await,
            Page::LaboratoryFeatures => self.submit_grid_step::<LabFeatures>(form).await,
            Page::Treatments => self.submit_grid_step::<Treatments>(form).await,
            page => Err(WizardError::Unavailable {
                action: "grid submission",
                page,
            }),
        }
    }

    async fn submit_grid_step<S: GridStep>(&mut self, form: GridForm) -> Result<Page, WizardError> {
        self.expect_page(S::PAGE)?;
        let slate = self.state.ensure_diagnoses(self.store.as_ref()).await?.clone();
        let filled = slate.filled();
        let catalog = S::CATALOG.map(|kind| self.case.catalog(kind));
        let draft = grid::validate::<S>(form, &filled, catalog).map_err(|err| self.rejected(err))?;
        let answers = draft.to_answers(&filled);
        self.state.set_grid::<S>(draft);
        self.commit_with_diagnoses(&slate, |entry| entry.with(S::FIELD, &answers))
            .await
    }

    /// Swap a diagnosis with its neighbour. Session state only.
    pub async fn adjust_priority(
        &mut self,
        slot: usize,
        priority: Priority,
    ) -> Result<Vec<String>, WizardError> {
        self.expect_panel("reorder diagnoses")?;
        let slate = self.state.ensure_diagnoses(self.store.as_ref()).await?;
        slate
            .adjust_priority(slot, priority)
            .map_err(|_| ValidationError::SlotOutOfRange { slot })?;
        tracing::debug!(slot, ?priority, "diagnosis reordered");
        Ok(slate.slots().to_vec())
    }

    /// Put a catalog diagnosis into one slot. Session state only.
    pub async fn replace_diagnosis(
        &mut self,
        slot: usize,
        name: &str,
    ) -> Result<Vec<String>, WizardError> {
        self.expect_panel("replace diagnosis")?;
        let catalog = self.case.catalog(CatalogKind::Diagnoses);
        let slate = self.state.ensure_diagnoses(self.store.as_ref()).await?;
        let name = diagnoses::validate_replacement(slate, slot, name, catalog)?;
        slate.replace(slot, name)?;
        tracing::debug!(slot, diagnosis = %name, "diagnosis replaced");
        Ok(slate.slots().to_vec())
    }

    /// Catalog diagnoses matching `query` that are not already on the
    /// working differential.
    pub async fn search_diagnoses(&mut self, query: &str) -> Result<Vec<String>, WizardError> {
        let page = self.state.page();
        if page != Page::Diagnoses && !page.shows_diagnosis_panel() {
            return Err(WizardError::Unavailable {
                action: "diagnosis search",
                page,
            });
        }
        let slate = self.state.ensure_diagnoses(self.store.as_ref()).await?;
        Ok(self
            .case
            .catalog(CatalogKind::Diagnoses)
            .search(query, |name| slate.contains(name)))
    }

    /// The image file for a result listed in the results catalog.
    pub fn result_image(&self, result: &str) -> Result<Option<PathBuf>, WizardError> {
        self.state.code()?;
        Ok(self
            .case
            .catalog(CatalogKind::Results)
            .canonical(result)
            .and_then(|name| self.case.result_image(name)))
    }

    /// The learner's stored answers, shown on the summary page.
    pub async fn summary(&mut self) -> Result<Document, WizardError> {
        self.expect_page(Page::Summary)?;
        Ok(self.state.record(self.store.as_ref()).await?.document().clone())
    }

    /// Close the case. The session state is discarded; stored answers
    /// stay.
    pub fn finish(&mut self) -> Result<(), WizardError> {
        self.expect_page(Page::Summary)?;
        if let Some(learner) = self.state.learner() {
            tracing::info!(code = %learner.code, "case finished");
        }
        self.state = SessionState::new();
        Ok(())
    }

    fn expect_page(&self, expected: Page) -> Result<(), WizardError> {
        let actual = self.state.page();
        if actual == expected {
            Ok(())
        } else {
            Err(WizardError::wrong_page(expected, actual))
        }
    }

    fn expect_panel(&self, action: &'static str) -> Result<(), WizardError> {
        let page = self.state.page();
        if page.shows_diagnosis_panel() {
            Ok(())
        } else {
            Err(WizardError::Unavailable { action, page })
        }
    }

    fn rejected(&self, err: ValidationError) -> WizardError {
        tracing::debug!(page = %self.state.page(), rule = %err, "submission rejected");
        WizardError::Validation(err)
    }

    /// Write a step that freezes the differential: the working list plus
    /// the page's `diagnoses_sN` snapshot of its filled slots.
    async fn commit_with_diagnoses<F>(&mut self, slate: &DiagnosisSlate, build: F) -> Result<Page, WizardError>
    where
        F: FnOnce(StepEntry) -> Result<StepEntry, CoreError> + Send,
    {
        let slot = self.state.page().snapshot_slot();
        self.commit(|entry| {
            let entry = build(entry)?.with(field::DIAGNOSES, slate)?;
            match slot {
                Some(n) => entry.with_snapshot(n, &slate.filled()),
                None => Ok(entry),
            }
        })
        .await
    }

    /// Write one step entry and advance to the next page.
    async fn commit<F>(&mut self, build: F) -> Result<Page, WizardError>
    where
        F: FnOnce(StepEntry) -> Result<StepEntry, CoreError> + Send,
    {
        let from = self.state.page();
        let next = from.next().unwrap_or(from);
        let code = self.state.code()?.to_string();
        let fields = build(StepEntry::new(&code, next))?.into_fields();

        if let Err(err) = self.store.merge(&code, fields.clone()).await {
            tracing::warn!(code = %code, page = %from, error = %err, "step write failed, page not advanced");
            return Err(err.into());
        }
        self.state.remember_write(fields);
        self.enter(next).await;
        tracing::info!(code = %code, page = %from, next = %next, "step submitted");
        Ok(next)
    }

    async fn enter(&mut self, page: Page) {
        let leaving = self.state.page();
        if leaving == Page::HistoryWithAi && page != leaving {
            self.state.clear_history();
        }
        self.state.set_page(page);
        if page == Page::HistoryWithAi {
            let now = self.clock.now();
            if let Err(err) = self.state.ensure_history(self.store.as_ref(), now).await {
                tracing::warn!(error = %err, "history transcript not restored");
            }
        }
    }
}
