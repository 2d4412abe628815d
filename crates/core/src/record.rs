//! Patient record model and its JSON wire form.
//!
//! Responsibilities:
//! - Define the domain-level [`Record`] with grouped vitals and nurse assessment
//! - Define the flat wire model matching the bulk source keys (`patient_id`, `bp`, ...)
//! - Apply placeholder defaults for absent optional fields in one place
//!
//! Records serialise back to the same flat shape they were loaded from.

use crate::constants::{DEFAULT_NURSE_NAME, DEFAULT_NURSE_NOTE, DEFAULT_PAST_HISTORY, NOT_RECORDED};
use crate::notes::{self, ClinicalNote};
use crate::{PatientError, PatientResult};
use chartdesk_types::PatientId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// A single vital sign reading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Vital {
    /// A reading as entered, e.g. `120/80 mmHg`.
    Recorded(String),
    /// No reading has been taken.
    #[default]
    NotRecorded,
}

impl Vital {
    /// Build a vital from optional raw input.
    ///
    /// Absent, blank and placeholder values all become [`Vital::NotRecorded`].
    pub fn from_input(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case(NOT_RECORDED) => {
                Vital::Recorded(v.to_string())
            }
            _ => Vital::NotRecorded,
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, Vital::Recorded(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Vital::Recorded(v) => v,
            Vital::NotRecorded => NOT_RECORDED,
        }
    }
}

impl std::fmt::Display for Vital {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age as entered.
///
/// Input that starts with a whole number is read as years (`" 42 years"` -> 42);
/// anything else is kept as text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Age {
    Years(u32),
    Text(String),
}

impl Age {
    pub fn from_input(raw: &str) -> Self {
        match parse_age(raw) {
            Some(years) => Age::Years(years),
            None => Age::Text(raw.trim().to_string()),
        }
    }

    pub fn years(&self) -> Option<u32> {
        match self {
            Age::Years(years) => Some(*years),
            Age::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Age {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Age::Years(years) => write!(f, "{years}"),
            Age::Text(text) => f.write_str(text),
        }
    }
}

/// Bedside observations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vitals {
    pub blood_pressure: Vital,
    pub oxygen_saturation: Vital,
    pub pulse_rate: Vital,
    pub temperature: Vital,
}

/// Nursing note and who recorded it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NurseAssessment {
    pub note: String,
    pub recorded_by: String,
}

impl NurseAssessment {
    pub fn new(note: Option<&str>, recorded_by: Option<&str>) -> Self {
        Self {
            note: text_or(note, DEFAULT_NURSE_NOTE),
            recorded_by: text_or(recorded_by, DEFAULT_NURSE_NAME),
        }
    }
}

impl Default for NurseAssessment {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// A patient's profile, vitals and notes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordWire", into = "RecordWire")]
pub struct Record {
    pub patient_id: PatientId,
    pub name: String,
    pub age: Age,
    pub blood_group: String,
    pub department: String,
    pub address: String,
    pub past_history: String,
    pub vitals: Vitals,
    pub nurse_assessment: NurseAssessment,
    /// Stored order; see [`Record::notes_latest_first`] for display order.
    pub doctor_notes: Vec<ClinicalNote>,
}

impl Record {
    /// Doctor notes in display order, latest first.
    pub fn notes_latest_first(&self) -> Vec<&ClinicalNote> {
        notes::latest_first(&self.doctor_notes)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

/// Flat wire representation matching the bulk source document.
///
/// Unknown keys are ignored so that sources carrying extra presentation fields still
/// load.
#[derive(Clone, Debug, Deserialize, Serialize)]
struct RecordWire {
    patient_id: String,
    name: String,
    age: AgeWire,
    blood_group: String,
    department: String,
    address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    past_history: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    bp: Option<VitalWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    spo2: Option<VitalWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pr: Option<VitalWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<VitalWire>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    nurse_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nurse_name: Option<String>,

    #[serde(default)]
    doctor_notes: Option<Vec<ClinicalNote>>,
}

/// Ages arrive as JSON numbers, but hand-edited sources sometimes quote them.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum AgeWire {
    Number(serde_json::Number),
    Text(String),
}

/// Vitals are usually strings (`"98%"`) but bare numbers are accepted.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum VitalWire {
    Text(String),
    Number(serde_json::Number),
}

impl VitalWire {
    fn into_vital(self) -> Vital {
        match self {
            VitalWire::Text(s) => Vital::from_input(Some(&s)),
            VitalWire::Number(n) => Vital::Recorded(n.to_string()),
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Trimmed `value`, or `default` when the value is absent or blank.
pub(crate) fn text_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Integer-prefix parsing: `"42"` and `" 42 years"` give 42, `"unknown"` gives `None`.
fn parse_age(raw: &str) -> Option<u32> {
    let raw = raw.trim_start();
    let digits_end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..digits_end].parse().ok()
}

impl TryFrom<RecordWire> for Record {
    type Error = PatientError;

    fn try_from(wire: RecordWire) -> PatientResult<Self> {
        let patient_id = PatientId::new(&wire.patient_id)?;

        let age = match wire.age {
            AgeWire::Number(n) => match n.as_u64().and_then(|v| u32::try_from(v).ok()) {
                Some(years) => Age::Years(years),
                None => Age::Text(n.to_string()),
            },
            AgeWire::Text(s) => Age::from_input(&s),
        };

        let vital = |v: Option<VitalWire>| v.map(VitalWire::into_vital).unwrap_or_default();

        Ok(Record {
            patient_id,
            name: wire.name,
            age,
            blood_group: wire.blood_group,
            department: wire.department,
            address: wire.address,
            past_history: text_or(wire.past_history.as_deref(), DEFAULT_PAST_HISTORY),
            vitals: Vitals {
                blood_pressure: vital(wire.bp),
                oxygen_saturation: vital(wire.spo2),
                pulse_rate: vital(wire.pr),
                temperature: vital(wire.temperature),
            },
            nurse_assessment: NurseAssessment::new(
                wire.nurse_note.as_deref(),
                wire.nurse_name.as_deref(),
            ),
            doctor_notes: wire.doctor_notes.unwrap_or_default(),
        })
    }
}

impl From<Record> for RecordWire {
    fn from(record: Record) -> Self {
        let vital = |v: Vital| Some(VitalWire::Text(v.as_str().to_string()));

        RecordWire {
            patient_id: record.patient_id.to_string(),
            name: record.name,
            age: match record.age {
                Age::Years(years) => AgeWire::Number(years.into()),
                Age::Text(text) => AgeWire::Text(text),
            },
            blood_group: record.blood_group,
            department: record.department,
            address: record.address,
            past_history: Some(record.past_history),
            bp: vital(record.vitals.blood_pressure),
            spo2: vital(record.vitals.oxygen_saturation),
            pr: vital(record.vitals.pulse_rate),
            temperature: vital(record.vitals.temperature),
            nurse_note: Some(record.nurse_assessment.note),
            nurse_name: Some(record.nurse_assessment.recorded_by),
            doctor_notes: Some(record.doctor_notes),
        }
    }
}
