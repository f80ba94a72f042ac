use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A fixed answer scale a learner applies to one item for one diagnosis.
///
/// Every scale has an unanswered value, serialized as `""`, which is also
/// its default.
pub trait Judgment:
    Debug + Clone + Copy + Default + PartialEq + Eq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// All values in display order, unanswered first.
    const OPTIONS: &'static [Self];

    /// The label the learner sees and the document stores.
    fn label(&self) -> &'static str;

    fn is_answered(&self) -> bool {
        *self != Self::default()
    }

    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::OPTIONS
            .iter()
            .copied()
            .find(|option| option.label().eq_ignore_ascii_case(label))
    }
}

/// Does a historical, physical or laboratory feature fit a diagnosis?
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FeatureJudgment {
    #[default]
    #[serde(rename = "")]
    Unanswered,
    #[serde(rename = "Supports")]
    Supports,
    #[serde(rename = "Does not support")]
    DoesNotSupport,
}

impl Judgment for FeatureJudgment {
    const OPTIONS: &'static [Self] = &[
        FeatureJudgment::Unanswered,
        FeatureJudgment::Supports,
        FeatureJudgment::DoesNotSupport,
    ];

    fn label(&self) -> &'static str {
        match self {
            FeatureJudgment::Unanswered => "",
            FeatureJudgment::Supports => "Supports",
            FeatureJudgment::DoesNotSupport => "Does not support",
        }
    }
}

/// Is ordering a laboratory, radiological or other test worthwhile for a
/// diagnosis?
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TestJudgment {
    #[default]
    #[serde(rename = "")]
    Unanswered,
    #[serde(rename = "Necessary")]
    Necessary,
    #[serde(rename = "Neither More Nor Less Useful")]
    Neutral,
    #[serde(rename = "Unnecessary")]
    Unnecessary,
}

impl Judgment for TestJudgment {
    const OPTIONS: &'static [Self] = &[
        TestJudgment::Unanswered,
        TestJudgment::Necessary,
        TestJudgment::Neutral,
        TestJudgment::Unnecessary,
    ];

    fn label(&self) -> &'static str {
        match self {
            TestJudgment::Unanswered => "",
            TestJudgment::Necessary => "Necessary",
            TestJudgment::Neutral => "Neither More Nor Less Useful",
            TestJudgment::Unnecessary => "Unnecessary",
        }
    }
}

/// How useful a treatment is for a diagnosis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TreatmentJudgment {
    #[default]
    #[serde(rename = "")]
    Unanswered,
    #[serde(rename = "Useful")]
    Useful,
    #[serde(rename = "Neither More Nor Less Useful")]
    Neutral,
    #[serde(rename = "Not Useful")]
    NotUseful,
}

impl Judgment for TreatmentJudgment {
    const OPTIONS: &'static [Self] = &[
        TreatmentJudgment::Unanswered,
        TreatmentJudgment::Useful,
        TreatmentJudgment::Neutral,
        TreatmentJudgment::NotUseful,
    ];

    fn label(&self) -> &'static str {
        match self {
            TreatmentJudgment::Unanswered => "",
            TreatmentJudgment::Useful => "Useful",
            TreatmentJudgment::Neutral => "Neither More Nor Less Useful",
            TreatmentJudgment::NotUseful => "Not Useful",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels_round_trip<J: Judgment>() {
        for option in J::OPTIONS {
            let json = serde_json::to_value(option).unwrap();
            assert_eq!(json, serde_json::Value::String(option.label().to_string()));
            assert_eq!(J::from_label(option.label()), Some(*option));
        }
    }

    #[test]
    fn serialized_form_is_the_label() {
        labels_round_trip::<FeatureJudgment>();
        labels_round_trip::<TestJudgment>();
        labels_round_trip::<TreatmentJudgment>();
    }

    #[test]
    fn unanswered_is_default_and_empty() {
        assert_eq!(FeatureJudgment::default().label(), "");
        assert!(!TestJudgment::default().is_answered());
        assert!(TreatmentJudgment::Useful.is_answered());
    }

    #[test]
    fn from_label_is_case_insensitive() {
        assert_eq!(
            FeatureJudgment::from_label("does NOT support"),
            Some(FeatureJudgment::DoesNotSupport)
        );
        assert_eq!(TestJudgment::from_label("maybe"), None);
    }
}
