//! Case materials: the option catalogs, login directory and patient
//! content for the one simulated patient a deployment serves.
//!
//! Everything is read once at startup from a single directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::error::WizardError;
use crate::history::ScriptedPatient;
use crate::login::LoginDirectory;

pub const DIAGNOSES_FILE: &str = "dx_list.txt";
pub const INTERVENTIONS_FILE: &str = "int.txt";
pub const LAB_TESTS_FILE: &str = "labtests.txt";
pub const RAD_TESTS_FILE: &str = "radtests.txt";
pub const OTHER_TESTS_FILE: &str = "other_tests.txt";
pub const RESULTS_FILE: &str = "results.txt";
pub const USERS_FILE: &str = "users.txt";
pub const PATIENT_INFO_FILE: &str = "ptinfo.txt";
pub const VITAL_SIGNS_FILE: &str = "vital_signs.txt";
pub const PHYS_EXAM_FILE: &str = "phys_exam.txt";
pub const PATIENT_SCRIPT_FILE: &str = "patient_script.txt";

const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "JPG", "JPEG", "PNG", "GIF"];

/// Which option list a request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CatalogKind {
    Diagnoses,
    Interventions,
    LabTests,
    RadTests,
    OtherTests,
    Results,
}

impl CatalogKind {
    pub fn parse(raw: &str) -> Option<Self> {
        let kind = match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "diagnoses" | "dx" => CatalogKind::Diagnoses,
            "interventions" => CatalogKind::Interventions,
            "lab_tests" | "laboratory_tests" => CatalogKind::LabTests,
            "rad_tests" | "radiology_tests" => CatalogKind::RadTests,
            "other_tests" => CatalogKind::OtherTests,
            "results" => CatalogKind::Results,
            _ => return None,
        };
        Some(kind)
    }

    fn file(self) -> &'static str {
        match self {
            CatalogKind::Diagnoses => DIAGNOSES_FILE,
            CatalogKind::Interventions => INTERVENTIONS_FILE,
            CatalogKind::LabTests => LAB_TESTS_FILE,
            CatalogKind::RadTests => RAD_TESTS_FILE,
            CatalogKind::OtherTests => OTHER_TESTS_FILE,
            CatalogKind::Results => RESULTS_FILE,
        }
    }

    /// The singular noun used in learner-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            CatalogKind::Diagnoses => "diagnosis",
            CatalogKind::Interventions => "intervention",
            CatalogKind::LabTests => "laboratory test",
            CatalogKind::RadTests => "radiology test",
            CatalogKind::OtherTests => "other test",
            CatalogKind::Results => "result",
        }
    }
}

/// A displayed vital-sign reading, e.g. `heart_rate` / `160 bpm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VitalReading {
    pub key: String,
    pub value: String,
}

#[derive(Debug)]
pub struct CaseFiles {
    dir: PathBuf,
    diagnoses: Catalog,
    interventions: Catalog,
    lab_tests: Catalog,
    rad_tests: Catalog,
    other_tests: Catalog,
    results: Catalog,
    logins: LoginDirectory,
    patient_info: String,
    vital_readings: Vec<VitalReading>,
    exam_findings: Vec<(String, String)>,
    script: ScriptedPatient,
}

impl CaseFiles {
    /// Load a case directory. Catalogs and the login directory are
    /// required; patient content files are optional.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, WizardError> {
        let dir = dir.into();
        let catalog = |kind: CatalogKind| Catalog::load(kind.noun(), &dir.join(kind.file()));

        let case = Self {
            diagnoses: catalog(CatalogKind::Diagnoses)?,
            interventions: catalog(CatalogKind::Interventions)?,
            lab_tests: catalog(CatalogKind::LabTests)?,
            rad_tests: catalog(CatalogKind::RadTests)?,
            other_tests: catalog(CatalogKind::OtherTests)?,
            results: catalog(CatalogKind::Results)?,
            logins: LoginDirectory::load(&dir.join(USERS_FILE))?,
            patient_info: read_optional(&dir.join(PATIENT_INFO_FILE))?,
            vital_readings: parse_vital_readings(&read_optional(&dir.join(VITAL_SIGNS_FILE))?),
            exam_findings: parse_exam_findings(&read_optional(&dir.join(PHYS_EXAM_FILE))?),
            script: ScriptedPatient::parse(&read_optional(&dir.join(PATIENT_SCRIPT_FILE))?),
            dir,
        };
        tracing::info!(
            dir = %case.dir.display(),
            diagnoses = case.diagnoses.entries().len(),
            learners = case.logins.len(),
            scripted_answers = case.script.len(),
            "case files loaded"
        );
        Ok(case)
    }

    pub fn catalog(&self, kind: CatalogKind) -> &Catalog {
        match kind {
            CatalogKind::Diagnoses => &self.diagnoses,
            CatalogKind::Interventions => &self.interventions,
            CatalogKind::LabTests => &self.lab_tests,
            CatalogKind::RadTests => &self.rad_tests,
            CatalogKind::OtherTests => &self.other_tests,
            CatalogKind::Results => &self.results,
        }
    }

    pub fn logins(&self) -> &LoginDirectory {
        &self.logins
    }

    pub fn patient_info(&self) -> &str {
        &self.patient_info
    }

    pub fn vital_readings(&self) -> &[VitalReading] {
        &self.vital_readings
    }

    pub fn script(&self) -> &ScriptedPatient {
        &self.script
    }

    /// Findings text for an exam component, matched case-insensitively.
    pub fn exam_findings(&self, component: &str) -> Option<&str> {
        let component = component.trim();
        self.exam_findings
            .iter()
            .find(|(title, _)| title.eq_ignore_ascii_case(component))
            .map(|(_, text)| text.as_str())
    }

    /// The image file for a result: the name with spaces as underscores,
    /// plus the first image extension that exists.
    pub fn result_image(&self, result: &str) -> Option<PathBuf> {
        let stem = result.trim().replace(' ', "_");
        if stem.is_empty() || stem.contains(['/', '\\']) || stem.starts_with('.') {
            return None;
        }
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{stem}.{ext}")))
            .find(|path| path.is_file())
    }
}

fn read_optional(path: &Path) -> Result<String, WizardError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "optional case file missing");
            Ok(String::new())
        }
        Err(source) => Err(WizardError::CaseFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// `key, value` per line; lines without a comma are skipped.
fn parse_vital_readings(text: &str) -> Vec<VitalReading> {
    text.lines()
        .filter_map(|line| line.split_once(','))
        .map(|(key, value)| VitalReading {
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        })
        .filter(|r| !r.key.is_empty())
        .collect()
}

/// Blank-line separated sections, each `Title: findings`.
fn parse_exam_findings(text: &str) -> Vec<(String, String)> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !current.is_empty() {
                let section = current.join("\n");
                if let Some((title, body)) = section.split_once(':') {
                    sections.push((title.trim().to_string(), body.trim().to_string()));
                }
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    sections
}
