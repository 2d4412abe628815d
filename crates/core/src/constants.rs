//! Constants used throughout the chartdesk core crate.
//!
//! Field names, placeholder values and file locations live here so the loader,
//! the intake path and the display helpers agree on them.

/// Filename of the bulk record source looked up in the working directory.
pub const DEFAULT_RECORDS_FILENAME: &str = "patients.json";

/// Record source location relative to the workspace root.
pub const BUNDLED_RECORDS_PATH: &str = "data/patients.json";

/// Placeholder for a vital sign that has not been taken.
pub const NOT_RECORDED: &str = "Not recorded";

/// Placeholder for an empty past medical history.
pub const DEFAULT_PAST_HISTORY: &str = "No significant medical history";

/// Placeholder for a missing nurse note.
pub const DEFAULT_NURSE_NOTE: &str = "Initial assessment pending";

/// Placeholder for a missing nurse name.
pub const DEFAULT_NURSE_NAME: &str = "Not assigned";

/// Shown instead of a note count when a record has no doctor notes.
pub const NO_NOTES: &str = "No doctor notes available for this patient.";

/// Form fields that must carry a non-blank value for a record to be admitted.
///
/// Missing fields are reported in this order.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "patient_id",
    "name",
    "age",
    "blood_group",
    "department",
    "address",
];
