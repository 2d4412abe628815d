//! Request and response bodies for the REST API.
//!
//! Responses keep the flat key names of the record source so a browser page written
//! against `patients.json` can render them unchanged.

use chartdesk_core::notes;
use chartdesk_core::{Age, ClinicalNote, FormFields, Record};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// Number of records currently held by the session store.
    pub patients: usize,
}

/// A doctor note as shown to the user.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorNoteRes {
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub note: String,
    /// e.g. `Friday, January 5, 2024`; absent when the date does not parse.
    pub long_date: Option<String>,
    /// Set on the first note in display order.
    pub latest: bool,
}

impl DoctorNoteRes {
    fn from_note(note: &ClinicalNote, latest: bool) -> Self {
        Self {
            doctor_name: note.doctor_name.clone(),
            date: note.date.clone(),
            time: note.time.clone(),
            note: note.note.clone(),
            long_date: note.long_date(),
            latest,
        }
    }
}

/// Age in years when it was entered as a number, otherwise the text as entered.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AgeRes {
    Years(u32),
    Text(String),
}

impl From<&Age> for AgeRes {
    fn from(age: &Age) -> Self {
        match age {
            Age::Years(years) => AgeRes::Years(*years),
            Age::Text(text) => AgeRes::Text(text.clone()),
        }
    }
}

/// A full patient record, doctor notes latest first.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub patient_id: String,
    pub name: String,
    pub age: AgeRes,
    pub blood_group: String,
    pub department: String,
    pub address: String,
    pub past_history: String,
    pub bp: String,
    pub spo2: String,
    pub pr: String,
    pub temperature: String,
    pub nurse_note: String,
    pub nurse_name: String,
    pub doctor_notes: Vec<DoctorNoteRes>,
    /// e.g. `2 notes available`, or a no-notes message.
    pub notes_summary: String,
}

impl From<&Record> for PatientRes {
    fn from(record: &Record) -> Self {
        let doctor_notes = record
            .notes_latest_first()
            .into_iter()
            .enumerate()
            .map(|(i, note)| DoctorNoteRes::from_note(note, i == 0))
            .collect();

        Self {
            patient_id: record.patient_id.to_string(),
            name: record.name.clone(),
            age: AgeRes::from(&record.age),
            blood_group: record.blood_group.clone(),
            department: record.department.clone(),
            address: record.address.clone(),
            past_history: record.past_history.clone(),
            bp: record.vitals.blood_pressure.to_string(),
            spo2: record.vitals.oxygen_saturation.to_string(),
            pr: record.vitals.pulse_rate.to_string(),
            temperature: record.vitals.temperature.to_string(),
            nurse_note: record.nurse_assessment.note.clone(),
            nurse_name: record.nurse_assessment.recorded_by.clone(),
            doctor_notes,
            notes_summary: notes::count_label(record.doctor_notes.len()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NextIdRes {
    pub patient_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    /// Populated when required fields were missing from a new-patient form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

/// New-patient form submission.
///
/// Every field is optional at the wire level so that missing required fields can be
/// reported together rather than as a deserialisation failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreatePatientReq {
    pub patient_id: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub age: Option<String>,
    pub blood_group: Option<String>,
    pub department: Option<String>,
    pub address: Option<String>,
    pub past_history: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub bp: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub spo2: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub pr: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub temperature: Option<String>,
    pub nurse_note: Option<String>,
    pub nurse_name: Option<String>,
}

impl From<CreatePatientReq> for FormFields {
    fn from(req: CreatePatientReq) -> Self {
        [
            ("patient_id", req.patient_id),
            ("name", req.name),
            ("age", req.age),
            ("blood_group", req.blood_group),
            ("department", req.department),
            ("address", req.address),
            ("past_history", req.past_history),
            ("bp", req.bp),
            ("spo2", req.spo2),
            ("pr", req.pr),
            ("temperature", req.temperature),
            ("nurse_note", req.nurse_note),
            ("nurse_name", req.nurse_name),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
        .collect()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}
