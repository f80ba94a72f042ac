use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Number of differential diagnosis slots a learner fills.
pub const SLOT_COUNT: usize = 5;

/// Which neighbour a diagnosis trades places with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Priority {
    /// Swap with the predecessor (more likely).
    Higher,
    /// Swap with the successor (less likely).
    Lower,
}

/// The working differential: exactly five slots ranked by likelihood.
///
/// Empty strings mark unfilled slots. The slate never grows or shrinks;
/// reordering only permutes slots, replacing only rewrites one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct DiagnosisSlate([String; SLOT_COUNT]);

impl DiagnosisSlate {
    pub fn new(slots: [String; SLOT_COUNT]) -> Self {
        Self(slots)
    }

    /// Build a slate from any list, padding with empty slots or dropping
    /// anything past the fifth entry. Entries are trimmed.
    pub fn from_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut slots: [String; SLOT_COUNT] = Default::default();
        for (slot, item) in slots.iter_mut().zip(items) {
            *slot = item.as_ref().trim().to_string();
        }
        Self(slots)
    }

    pub fn slots(&self) -> &[String; SLOT_COUNT] {
        &self.0
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.0.get(slot).map(String::as_str)
    }

    /// Non-empty diagnoses in rank order. This is what a step freezes as
    /// its `diagnoses_sN` snapshot.
    pub fn filled(&self) -> Vec<String> {
        self.0.iter().filter(|d| !d.is_empty()).cloned().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|d| !d.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }

    /// Case-insensitive membership among the filled slots.
    pub fn contains(&self, name: &str) -> bool {
        let needle = name.trim();
        !needle.is_empty() && self.0.iter().any(|d| d.eq_ignore_ascii_case(needle))
    }

    /// The first name occupying more than one slot, compared
    /// case-insensitively. Empty slots never count as duplicates.
    pub fn first_duplicate(&self) -> Option<&str> {
        self.0.iter().enumerate().find_map(|(i, d)| {
            let repeated = !d.is_empty()
                && self.0[..i].iter().any(|earlier| earlier.eq_ignore_ascii_case(d));
            repeated.then_some(d.as_str())
        })
    }

    /// Swap the diagnosis in `slot` with its neighbour. Asking the first
    /// slot to move higher, or the last to move lower, changes nothing.
    pub fn adjust_priority(&mut self, slot: usize, priority: Priority) -> Result<(), CoreError> {
        if slot >= SLOT_COUNT {
            return Err(CoreError::SlotOutOfRange(slot));
        }
        match priority {
            Priority::Higher if slot > 0 => self.0.swap(slot, slot - 1),
            Priority::Lower if slot + 1 < SLOT_COUNT => self.0.swap(slot, slot + 1),
            _ => {}
        }
        Ok(())
    }

    /// Overwrite one slot. Callers are responsible for catalog and
    /// uniqueness checks.
    pub fn replace(&mut self, slot: usize, name: &str) -> Result<(), CoreError> {
        let target = self.0.get_mut(slot).ok_or(CoreError::SlotOutOfRange(slot))?;
        *target = name.trim().to_string();
        Ok(())
    }
}

impl From<Vec<String>> for DiagnosisSlate {
    fn from(items: Vec<String>) -> Self {
        Self::from_list(items)
    }
}

impl From<DiagnosisSlate> for Vec<String> {
    fn from(slate: DiagnosisSlate) -> Self {
        slate.0.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slate() -> DiagnosisSlate {
        DiagnosisSlate::from_list(["Croup", "Epiglottitis", "Foreign body", "Asthma", "Pneumonia"])
    }

    fn sorted(slate: &DiagnosisSlate) -> Vec<String> {
        let mut names = slate.slots().to_vec();
        names.sort();
        names
    }

    #[test]
    fn from_list_pads_and_truncates() {
        let short = DiagnosisSlate::from_list(["Croup"]);
        assert_eq!(short.slots()[0], "Croup");
        assert!(short.slots()[1..].iter().all(String::is_empty));

        let long = DiagnosisSlate::from_list(["a", "b", "c", "d", "e", "f"]);
        assert_eq!(long.filled(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn higher_swaps_with_predecessor() {
        let mut s = slate();
        s.adjust_priority(2, Priority::Higher).unwrap();
        assert_eq!(s.get(1), Some("Foreign body"));
        assert_eq!(s.get(2), Some("Epiglottitis"));
    }

    #[test]
    fn lower_swaps_with_successor() {
        let mut s = slate();
        s.adjust_priority(0, Priority::Lower).unwrap();
        assert_eq!(s.get(0), Some("Epiglottitis"));
        assert_eq!(s.get(1), Some("Croup"));
    }

    #[test]
    fn boundaries_are_no_ops() {
        let mut s = slate();
        s.adjust_priority(0, Priority::Higher).unwrap();
        assert_eq!(s, slate());
        s.adjust_priority(SLOT_COUNT - 1, Priority::Lower).unwrap();
        assert_eq!(s, slate());
    }

    #[test]
    fn reordering_preserves_the_multiset() {
        let mut s = slate();
        let before = sorted(&s);
        for (slot, priority) in [
            (4, Priority::Higher),
            (3, Priority::Higher),
            (0, Priority::Lower),
            (2, Priority::Lower),
            (1, Priority::Higher),
        ] {
            s.adjust_priority(slot, priority).unwrap();
            assert_eq!(sorted(&s), before);
        }
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let mut s = slate();
        assert!(matches!(
            s.adjust_priority(5, Priority::Higher),
            Err(CoreError::SlotOutOfRange(5))
        ));
        assert!(s.replace(7, "Croup").is_err());
    }

    #[test]
    fn duplicates_ignore_case_and_empty_slots() {
        let s = DiagnosisSlate::from_list(["Croup", "", "", "croup", ""]);
        assert_eq!(s.first_duplicate(), Some("croup"));
        let s = DiagnosisSlate::from_list(["Croup", "", "", "", ""]);
        assert_eq!(s.first_duplicate(), None);
    }

    #[test]
    fn filled_skips_blanks_in_order() {
        let s = DiagnosisSlate::from_list(["", "Asthma", "", "Croup", ""]);
        assert_eq!(s.filled(), vec!["Asthma", "Croup"]);
        assert!(!s.is_complete());
        assert!(!s.is_blank());
    }

    #[test]
    fn serializes_as_plain_list() {
        let json = serde_json::to_value(slate()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(SLOT_COUNT));
        let back: DiagnosisSlate = serde_json::from_value(json).unwrap();
        assert_eq!(back, slate());
    }
}
