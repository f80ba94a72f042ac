use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::judgment::Judgment;

/// One row of an answer grid as stored under a diagnosis: the item the
/// learner entered or picked, and their judgment of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JudgedItem<J> {
    pub item: String,
    #[serde(default)]
    pub judgment: J,
}

/// Per-step answers: diagnosis name to its judged rows, in row order.
pub type AnswerMap<J> = BTreeMap<String, Vec<JudgedItem<J>>>;

/// Number of item rows on every answer grid.
pub const ROW_COUNT: usize = 5;

/// An in-progress answer grid: five item rows, each judged per diagnosis.
///
/// Judgments are keyed by diagnosis name rather than column position, so
/// reordering the differential mid-step does not shuffle answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "J: Deserialize<'de> + Default"))]
pub struct GridDraft<J> {
    pub rows: Vec<GridRow<J>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "J: Deserialize<'de> + Default"))]
pub struct GridRow<J> {
    pub item: String,
    #[serde(default)]
    pub judgments: BTreeMap<String, J>,
}

impl<J> Default for GridRow<J> {
    fn default() -> Self {
        Self {
            item: String::new(),
            judgments: BTreeMap::new(),
        }
    }
}

impl<J: Judgment> Default for GridDraft<J> {
    fn default() -> Self {
        Self {
            rows: (0..ROW_COUNT).map(|_| GridRow::default()).collect(),
        }
    }
}

impl<J: Judgment> GridDraft<J> {
    /// Rebuild a draft from stored answers: row texts come from whichever
    /// diagnosis carries a non-empty item at that position, judgments from
    /// each diagnosis' own list. Only the first [`ROW_COUNT`] rows are read.
    pub fn from_answers(answers: &AnswerMap<J>) -> Self {
        let mut draft = Self::default();
        for (diagnosis, items) in answers {
            for (row, judged) in draft.rows.iter_mut().zip(items) {
                if row.item.is_empty() && !judged.item.trim().is_empty() {
                    row.item = judged.item.trim().to_string();
                }
                if judged.judgment.is_answered() {
                    row.judgments.insert(diagnosis.clone(), judged.judgment);
                }
            }
        }
        draft
    }

    /// Normalize to exactly [`ROW_COUNT`] rows with trimmed items.
    pub fn normalized(mut self) -> Self {
        self.rows.truncate(ROW_COUNT);
        while self.rows.len() < ROW_COUNT {
            self.rows.push(GridRow::default());
        }
        for row in &mut self.rows {
            row.item = row.item.trim().to_string();
        }
        self
    }

    pub fn filled_items(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(|row| row.item.as_str())
            .filter(|item| !item.is_empty())
    }

    /// Expand into the stored shape: for each diagnosis, in order, every
    /// row with that diagnosis' judgment (unanswered when absent).
    pub fn to_answers(&self, diagnoses: &[String]) -> AnswerMap<J> {
        diagnoses
            .iter()
            .map(|diagnosis| {
                let items = self
                    .rows
                    .iter()
                    .map(|row| JudgedItem {
                        item: row.item.clone(),
                        judgment: row.judgments.get(diagnosis).copied().unwrap_or_default(),
                    })
                    .collect();
                (diagnosis.clone(), items)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::judgment::{FeatureJudgment, TestJudgment};

    fn draft() -> GridDraft<FeatureJudgment> {
        let mut d = GridDraft::default();
        d.rows[0].item = "Barking cough".into();
        d.rows[0]
            .judgments
            .insert("Croup".into(), FeatureJudgment::Supports);
        d.rows[2].item = "Drooling".into();
        d.rows[2]
            .judgments
            .insert("Epiglottitis".into(), FeatureJudgment::Supports);
        d.rows[2]
            .judgments
            .insert("Croup".into(), FeatureJudgment::DoesNotSupport);
        d
    }

    #[test]
    fn to_answers_keeps_every_row_per_diagnosis() {
        let dx = vec!["Croup".to_string(), "Epiglottitis".to_string()];
        let answers = draft().to_answers(&dx);
        assert_eq!(answers.len(), 2);
        let croup = &answers["Croup"];
        assert_eq!(croup.len(), ROW_COUNT);
        assert_eq!(croup[0].judgment, FeatureJudgment::Supports);
        assert_eq!(croup[1].item, "");
        assert_eq!(croup[2].judgment, FeatureJudgment::DoesNotSupport);
        assert_eq!(answers["Epiglottitis"][0].judgment, FeatureJudgment::Unanswered);
    }

    #[test]
    fn stored_answers_rebuild_the_draft() {
        let dx = vec!["Croup".to_string(), "Epiglottitis".to_string()];
        let rebuilt = GridDraft::from_answers(&draft().to_answers(&dx));
        assert_eq!(rebuilt, draft());
    }

    #[test]
    fn normalized_pads_and_trims() {
        let d = GridDraft::<TestJudgment> {
            rows: vec![GridRow {
                item: "  CBC ".into(),
                judgments: BTreeMap::new(),
            }],
        }
        .normalized();
        assert_eq!(d.rows.len(), ROW_COUNT);
        assert_eq!(d.rows[0].item, "CBC");
        assert_eq!(d.filled_items().collect::<Vec<_>>(), vec!["CBC"]);
    }

    #[test]
    fn draft_deserializes_with_missing_judgments() {
        let json = serde_json::to_value(draft()).unwrap();
        let back: GridDraft<FeatureJudgment> = serde_json::from_value(json).unwrap();
        assert_eq!(back, draft());

        let partial: GridDraft<FeatureJudgment> = serde_json::from_value(serde_json::json!({
            "rows": [
                {"item": "Stridor"},
                {"item": "Fever", "judgments": {"Croup": "Supports"}},
            ]
        }))
        .unwrap();
        assert!(partial.rows[0].judgments.is_empty());
        assert_eq!(partial.rows[1].judgments["Croup"], FeatureJudgment::Supports);
        assert_eq!(partial.normalized().rows.len(), ROW_COUNT);
    }

    #[test]
    fn stored_item_shape() {
        let item = JudgedItem {
            item: "CBC".to_string(),
            judgment: TestJudgment::Necessary,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"item": "CBC", "judgment": "Necessary"}));
    }
}
