//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the store.
//! Nothing in this crate reads environment variables while serving a lookup or an
//! insertion.

use crate::constants::{BUNDLED_RECORDS_PATH, DEFAULT_RECORDS_FILENAME};
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    records_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(records_path: PathBuf) -> PatientResult<Self> {
        if records_path.as_os_str().is_empty() {
            return Err(PatientError::InvalidInput(
                "records path cannot be empty".into(),
            ));
        }

        Ok(Self { records_path })
    }

    /// Location of the bulk record source.
    pub fn records_path(&self) -> &Path {
        &self.records_path
    }
}

/// Resolve the bulk record source without reading environment variables.
///
/// If `override_path` is provided it must point at an existing file. Otherwise this
/// looks for `patients.json` in the current working directory and then walks up from
/// `CARGO_MANIFEST_DIR` looking for `data/patients.json`.
pub fn resolve_records_path(override_path: Option<PathBuf>) -> PatientResult<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path);
        }
        return Err(PatientError::InvalidInput(format!(
            "PATIENT_RECORDS_PATH override is not a readable file: {}",
            path.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_RECORDS_FILENAME);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(BUNDLED_RECORDS_PATH);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(PatientError::InvalidInput(format!(
        "could not locate {DEFAULT_RECORDS_FILENAME} or {BUNDLED_RECORDS_PATH}"
    )))
}
