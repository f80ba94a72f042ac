use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which of the six presented vital signs the learner flagged as abnormal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VitalSigns {
    #[serde(default)]
    pub heart_rate: bool,
    #[serde(default)]
    pub respiratory_rate: bool,
    #[serde(default)]
    pub blood_pressure: bool,
    #[serde(default)]
    pub pulseox: bool,
    #[serde(default)]
    pub temperature: bool,
    #[serde(default)]
    pub weight: bool,
}

impl VitalSigns {
    /// Keys in display order, matching the readings file.
    pub const KEYS: [&'static str; 6] = [
        "heart_rate",
        "respiratory_rate",
        "blood_pressure",
        "pulseox",
        "temperature",
        "weight",
    ];

    pub fn flagged(&self) -> Vec<&'static str> {
        let flags = [
            self.heart_rate,
            self.respiratory_rate,
            self.blood_pressure,
            self.pulseox,
            self.temperature,
            self.weight,
        ];
        Self::KEYS
            .iter()
            .zip(flags)
            .filter_map(|(key, on)| on.then_some(*key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flags_default_to_false() {
        let vs: VitalSigns = serde_json::from_value(serde_json::json!({"heart_rate": true})).unwrap();
        assert!(vs.heart_rate);
        assert_eq!(vs.flagged(), vec!["heart_rate"]);
    }
}
