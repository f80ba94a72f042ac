//! Fixed option lists that are part of the case format rather than of a
//! case's files.

/// Body systems offered on the focused physical exam page.
pub const FOCUSED_EXAM_SYSTEMS: [&str; 13] = [
    "General Appearance",
    "Eyes",
    "Ears, Neck, Throat",
    "Lymph Nodes",
    "Cardiovascular",
    "Lungs",
    "Skin",
    "Abdomen",
    "Extremities",
    "Musculoskeletal",
    "Neurological",
    "Psychiatry",
    "Genitourinary",
];

/// Components a learner can review on the physical exam components page.
/// The last three point at media rather than findings text.
pub const EXAM_COMPONENTS: [&str; 16] = [
    "General Appearance",
    "Eyes",
    "Ears, Neck, Nose, Throat",
    "Lymph Nodes",
    "Cardiovascular",
    "Lungs",
    "Abdomen",
    "Skin",
    "Extremities",
    "Musculoskeletal",
    "Neurological",
    "Psychiatry",
    "Genitourinary",
    "Image",
    "Audio",
    "Video",
];

/// Intervention that rules out selecting any other.
pub const NO_ACUTE_INTERVENTION: &str = "No Acute Intervention";
