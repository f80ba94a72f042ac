/// Field names used in a stored session document.
pub mod field {
    pub const CODE: &str = "code";
    pub const LAST_PAGE: &str = "last_page";
    pub const VS_DATA: &str = "vs_data";
    pub const DIAGNOSES: &str = "diagnoses";
    pub const INTERVENTIONS: &str = "interventions";
    pub const EXCLUDED_EXAMS: &str = "excluded_exams";
    pub const CONFIRMED_EXAMS: &str = "confirmed_exams";
    pub const QUESTIONS_ASKED: &str = "questions_asked";
    pub const RESPONSES: &str = "responses";
    pub const HXFEATURES: &str = "hxfeatures";
    pub const PEFEATURES: &str = "pefeatures";
    pub const LABORATORY_TESTS: &str = "laboratory_tests";
    pub const RADIOLOGICAL_TESTS: &str = "radiological_tests";
    pub const OTHER_TESTS: &str = "other_tests";
    pub const LABORATORY_FEATURES: &str = "laboratory_features";
    pub const ASSESSMENTS: &str = "assessments";
}

/// Highest `diagnoses_sN` slot any page freezes.
///
/// Slots 1 to 7 follow the pages from diagnoses through laboratory
/// features. Treatments takes 8 so it does not overwrite the laboratory
/// features snapshot in slot 7.
pub const MAX_SNAPSHOT: u8 = 8;

/// Name of the frozen differential written by the step with slot `n`.
pub fn snapshot(n: u8) -> String {
    format!("diagnoses_s{n}")
}
