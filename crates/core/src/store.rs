//! In-memory patient record store.
//!
//! The store is an owned value: it is populated once by a bulk load and then queried
//! and appended to by its owner. There is no update or delete, and nothing is written
//! back to the source.
//!
//! ## Uniqueness
//!
//! Identifiers are unique case-insensitively. [`RecordStore::insert`] rejects
//! duplicates and [`RecordStore::load`] drops repeats from the source, so a lookup never
//! has to choose between two matching records.
//!
//! ## Load failures
//!
//! A source that cannot be read or parsed leaves the store empty. Every lookup then
//! reports not-found, which callers surface as their normal not-found state.

use crate::allocator;
use crate::intake::{self, FormFields};
use crate::record::Record;
use crate::{PatientError, PatientResult};
use chartdesk_types::PatientId;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Ordered collection of patient records, in load then insertion order.
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the store contents with `records`.
    ///
    /// A record whose identifier repeats an earlier one (ignoring case) is skipped with a
    /// warning.
    ///
    /// # Returns
    ///
    /// The number of records kept.
    pub fn load(&mut self, records: impl IntoIterator<Item = Record>) -> usize {
        self.records.clear();

        for record in records {
            if self.contains(record.patient_id.as_str()) {
                tracing::warn!(
                    "skipping duplicate patient ID in source: {}",
                    record.patient_id
                );
                continue;
            }
            self.records.push(record);
        }

        tracing::info!("patient data loaded: {} patients", self.records.len());
        self.records.len()
    }

    /// Replaces the store contents from a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::LoadSchema`] naming the failing path (e.g. `[3].age`) if
    /// the document does not match the record schema. The store is left empty.
    pub fn load_json(&mut self, text: &str) -> PatientResult<usize> {
        self.load_from_deserializer(serde_json::Deserializer::from_str(text))
    }

    /// Replaces the store contents from a reader yielding a JSON array of records.
    ///
    /// # Errors
    ///
    /// As for [`RecordStore::load_json`]. The store is left empty.
    pub fn load_reader<R: Read>(&mut self, reader: R) -> PatientResult<usize> {
        self.load_from_deserializer(serde_json::Deserializer::from_reader(reader))
    }

    /// Replaces the store contents from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::LoadRead`] if the file cannot be read, or
    /// [`PatientError::LoadSchema`] if it cannot be parsed. The store is left empty in
    /// both cases.
    pub fn load_path(&mut self, path: &Path) -> PatientResult<usize> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                self.records.clear();
                tracing::error!("error loading patient data from {}: {}", path.display(), e);
                return Err(PatientError::LoadRead(e));
            }
        };
        self.load_json(&contents)
    }

    /// Parses one JSON array of records; anything after it is a schema error.
    fn load_from_deserializer<'de, R>(
        &mut self,
        mut deserializer: serde_json::Deserializer<R>,
    ) -> PatientResult<usize>
    where
        R: serde_json::de::Read<'de>,
    {
        let records =
            match serde_path_to_error::deserialize::<_, Vec<Record>>(&mut deserializer) {
                Ok(records) => records,
                Err(err) => {
                    let path = err.path().to_string();
                    let path = if path.is_empty() || path == "." {
                        "<root>".to_string()
                    } else {
                        path
                    };
                    return Err(self.schema_failure(&path, err.into_inner()));
                }
            };

        if let Err(err) = deserializer.end() {
            return Err(self.schema_failure("<end of document>", err));
        }

        Ok(self.load(records))
    }

    fn schema_failure(&mut self, path: &str, source: serde_json::Error) -> PatientError {
        self.records.clear();
        tracing::error!("error loading patient data at {}: {}", path, source);
        PatientError::LoadSchema(format!("record schema mismatch at {path}: {source}"))
    }

    /// Case-insensitive lookup; the first record in store order wins.
    pub fn find_by_identifier(&self, id: &str) -> Option<&Record> {
        let id = id.trim();
        self.records.iter().find(|r| r.patient_id.matches(id))
    }

    /// Like [`RecordStore::find_by_identifier`], but not-found is an error.
    pub fn get(&self, id: &str) -> PatientResult<&Record> {
        self.find_by_identifier(id)
            .ok_or_else(|| PatientError::NotFound(id.trim().to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find_by_identifier(id).is_some()
    }

    /// Appends `record`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::DuplicateIdentifier`] if a record with the same identifier
    /// (ignoring case) already exists. The store is unchanged.
    pub fn insert(&mut self, record: Record) -> PatientResult<()> {
        if self.contains(record.patient_id.as_str()) {
            return Err(PatientError::DuplicateIdentifier(
                record.patient_id.to_string(),
            ));
        }

        tracing::info!(
            "new patient added: {} ({}), total patients: {}",
            record.name,
            record.patient_id,
            self.records.len() + 1
        );
        self.records.push(record);
        Ok(())
    }

    /// Validates a form submission, inserts the resulting record and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::MissingRequiredFields`] or
    /// [`PatientError::DuplicateIdentifier`]. Nothing is inserted on error.
    pub fn admit(&mut self, fields: &FormFields) -> PatientResult<&Record> {
        let record = intake::record_from_form(fields)?;
        self.insert(record)?;
        self.records
            .last()
            .ok_or_else(|| PatientError::InvalidInput("record was not stored".into()))
    }

    /// Suggested identifier for the next new record.
    pub fn next_identifier(&self) -> PatientId {
        allocator::next_identifier(self.records.iter().map(|r| &r.patient_id))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
