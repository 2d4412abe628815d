//! # Chartdesk Core
//!
//! Core logic for the chartdesk patient lookup tool.
//!
//! This crate contains pure data operations:
//! - The in-memory [`RecordStore`] with case-insensitive lookup and append-only insertion
//! - Bulk loading of the JSON record source
//! - Form intake with required-field validation and placeholder defaults
//! - Suggestion of the next sequential identifier
//! - Display ordering of doctor notes
//!
//! **No presentation concerns**: HTTP handlers, terminal output and HTML rendering
//! belong in `api-rest`, `chartdesk-cli` or the browser page.

pub mod allocator;
pub mod config;
pub mod constants;
pub mod error;
pub mod intake;
pub mod notes;
pub mod record;
pub mod store;

pub use chartdesk_types::{NonEmptyText, PatientId, TextError};
pub use config::CoreConfig;
pub use error::{PatientError, PatientResult};
pub use intake::FormFields;
pub use notes::ClinicalNote;
pub use record::{Age, NurseAssessment, Record, Vital, Vitals};
pub use store::RecordStore;

/// Normalise raw search input into a lookup key.
///
/// Surrounding whitespace is trimmed and the result upper-cased. Blank input is not a
/// query and yields `None`.
pub fn normalise_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_uppercase())
}

/// Build a store from the configured source.
///
/// A failed load is logged and yields an empty store, so lookups report not-found
/// rather than the session aborting. The error is returned alongside for callers that
/// want to show it.
pub fn open_store(cfg: &CoreConfig) -> (RecordStore, Option<PatientError>) {
    let mut store = RecordStore::new();
    match store.load_path(cfg.records_path()) {
        Ok(_) => (store, None),
        Err(e) => (store, Some(e)),
    }
}
