use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fields::{self, field, MAX_SNAPSHOT};

use super::answers::AnswerMap;
use super::diagnoses::DiagnosisSlate;
use super::judgment::Judgment;
use super::page::Page;
use super::vitals::VitalSigns;

/// A stored session document: a flat JSON object of named fields.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Read-only, typed view over one learner's stored document.
///
/// Every accessor returns `Ok(None)` for an absent (or `null`) field and an
/// error only when a field is present with the wrong shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionRecord {
    doc: Document,
}

impl SessionRecord {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    pub fn has(&self, name: &str) -> bool {
        self.doc.get(name).is_some_and(|v| !v.is_null())
    }

    /// Deserialize one field.
    pub fn field<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, CoreError> {
        match self.doc.get(name) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| CoreError::FieldShape {
                    field: name.to_string(),
                    source,
                }),
        }
    }

    pub fn code(&self) -> Result<Option<String>, CoreError> {
        self.field(field::CODE)
    }

    /// The page a returning learner resumes at.
    pub fn last_page(&self) -> Result<Option<Page>, CoreError> {
        self.field::<String>(field::LAST_PAGE)?
            .map(|raw| Page::parse(&raw))
            .transpose()
    }

    pub fn vital_signs(&self) -> Result<Option<VitalSigns>, CoreError> {
        self.field(field::VS_DATA)
    }

    pub fn snapshot(&self, n: u8) -> Result<Option<Vec<String>>, CoreError> {
        self.field(&fields::snapshot(n))
    }

    /// The working differential as last persisted: the `diagnoses` field,
    /// else the most recent frozen snapshot.
    pub fn working_diagnoses(&self) -> Result<Option<DiagnosisSlate>, CoreError> {
        if let Some(list) = self.field::<Vec<String>>(field::DIAGNOSES)? {
            return Ok(Some(DiagnosisSlate::from_list(list)));
        }
        for n in (1..=MAX_SNAPSHOT).rev() {
            if let Some(list) = self.snapshot(n)? {
                return Ok(Some(DiagnosisSlate::from_list(list)));
            }
        }
        Ok(None)
    }

    /// Selected interventions. Older documents hold a single string.
    pub fn interventions(&self) -> Result<Option<Vec<String>>, CoreError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Stored {
            One(String),
            Many(Vec<String>),
        }

        Ok(self
            .field::<Stored>(field::INTERVENTIONS)?
            .map(|stored| match stored {
                Stored::One(s) if s.trim().is_empty() => Vec::new(),
                Stored::One(s) => vec![s],
                Stored::Many(v) => v,
            }))
    }

    pub fn string_list(&self, name: &str) -> Result<Option<Vec<String>>, CoreError> {
        self.field(name)
    }

    pub fn answers<J: Judgment>(&self, name: &str) -> Result<Option<AnswerMap<J>>, CoreError> {
        self.field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::judgment::TestJudgment;
    use serde_json::json;

    fn record(value: serde_json::Value) -> SessionRecord {
        match value {
            serde_json::Value::Object(doc) => SessionRecord::new(doc),
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn absent_and_null_fields_are_none() {
        let r = record(json!({"vs_data": null}));
        assert_eq!(r.vital_signs().unwrap(), None);
        assert_eq!(r.last_page().unwrap(), None);
        assert!(!r.has("vs_data"));
    }

    #[test]
    fn wrong_shape_names_the_field() {
        let r = record(json!({"vs_data": "yes"}));
        match r.vital_signs() {
            Err(CoreError::FieldShape { field, .. }) => assert_eq!(field, "vs_data"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn working_diagnoses_prefers_the_live_list() {
        let r = record(json!({
            "diagnoses": ["Croup", "Asthma"],
            "diagnoses_s1": ["A", "B", "C", "D", "E"],
        }));
        let slate = r.working_diagnoses().unwrap().unwrap();
        assert_eq!(slate.filled(), vec!["Croup", "Asthma"]);
    }

    #[test]
    fn working_diagnoses_falls_back_to_latest_snapshot() {
        let r = record(json!({
            "diagnoses_s1": ["A", "B", "C", "D", "E"],
            "diagnoses_s3": ["B", "A", "C"],
        }));
        let slate = r.working_diagnoses().unwrap().unwrap();
        assert_eq!(slate.filled(), vec!["B", "A", "C"]);
        assert_eq!(slate.slots()[4], "");
    }

    #[test]
    fn legacy_single_intervention_reads_as_list() {
        let r = record(json!({"interventions": "Humidified oxygen"}));
        assert_eq!(r.interventions().unwrap(), Some(vec!["Humidified oxygen".to_string()]));
        let r = record(json!({"interventions": ""}));
        assert_eq!(r.interventions().unwrap(), Some(vec![]));
    }

    #[test]
    fn legacy_page_names_resume() {
        let r = record(json!({"last_page": "Laboratory Tests"}));
        assert_eq!(r.last_page().unwrap(), Some(Page::LaboratoryTests));
    }

    #[test]
    fn answers_read_typed_judgments() {
        let r = record(json!({
            "laboratory_tests": {
                "Croup": [{"item": "CBC", "judgment": "Unnecessary"}]
            }
        }));
        let answers = r.answers::<TestJudgment>(field::LABORATORY_TESTS).unwrap().unwrap();
        assert_eq!(answers["Croup"][0].judgment, TestJudgment::Unnecessary);
    }
}
