//! New-record intake.
//!
//! Turns a raw field/value mapping, as submitted by a form, into a [`Record`].
//! Only presence of the required fields is validated; optional fields fall back to
//! their placeholders. Duplicate detection happens in the store, not here.

use crate::constants::{DEFAULT_PAST_HISTORY, REQUIRED_FIELDS};
use crate::record::{text_or, Age, NurseAssessment, Record, Vital, Vitals};
use crate::{PatientError, PatientResult};
use chartdesk_types::PatientId;
use std::collections::HashMap;

/// Raw form submission keyed by source field name (`patient_id`, `bp`, ...).
pub type FormFields = HashMap<String, String>;

/// Non-blank, trimmed value of `key`.
fn field<'a>(fields: &'a FormFields, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Names of required fields that are absent or blank, in [`REQUIRED_FIELDS`] order.
pub fn missing_required_fields(fields: &FormFields) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|key| field(fields, key).is_none())
        .map(|key| key.to_string())
        .collect()
}

/// Build a new record from a form submission.
///
/// The identifier is stored upper-cased and every text value is trimmed. New records
/// start without doctor notes.
///
/// # Errors
///
/// Returns [`PatientError::MissingRequiredFields`] listing every absent required field.
pub fn record_from_form(fields: &FormFields) -> PatientResult<Record> {
    let missing = missing_required_fields(fields);
    if !missing.is_empty() {
        return Err(PatientError::MissingRequiredFields(missing));
    }

    let required = |key: &str| field(fields, key).unwrap_or_default().to_string();

    let patient_id = PatientId::canonical(required("patient_id"))?;
    Ok(Record {
        patient_id,
        name: required("name"),
        age: Age::from_input(&required("age")),
        blood_group: required("blood_group"),
        department: required("department"),
        address: required("address"),
        past_history: text_or(field(fields, "past_history"), DEFAULT_PAST_HISTORY),
        vitals: Vitals {
            blood_pressure: Vital::from_input(field(fields, "bp")),
            oxygen_saturation: Vital::from_input(field(fields, "spo2")),
            pulse_rate: Vital::from_input(field(fields, "pr")),
            temperature: Vital::from_input(field(fields, "temperature")),
        },
        nurse_assessment: NurseAssessment::new(
            field(fields, "nurse_note"),
            field(fields, "nurse_name"),
        ),
        doctor_notes: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_NURSE_NAME, DEFAULT_NURSE_NOTE};

    fn complete_form() -> FormFields {
        [
            ("patient_id", "p010"),
            ("name", "  Nila Das "),
            ("age", "29"),
            ("blood_group", "A-"),
            ("department", "Dermatology"),
            ("address", " 3 Park Avenue "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn builds_record_with_defaults() {
        let record = record_from_form(&complete_form()).expect("form should be accepted");

        assert_eq!(record.patient_id.as_str(), "P010");
        assert_eq!(record.name, "Nila Das");
        assert_eq!(record.address, "3 Park Avenue");
        assert_eq!(record.age, Age::Years(29));
        assert_eq!(record.past_history, DEFAULT_PAST_HISTORY);
        assert_eq!(record.vitals, Vitals::default());
        assert_eq!(record.nurse_assessment.note, DEFAULT_NURSE_NOTE);
        assert_eq!(record.nurse_assessment.recorded_by, DEFAULT_NURSE_NAME);
        assert!(record.doctor_notes.is_empty());
    }

    #[test]
    fn keeps_optional_values_when_given() {
        let mut form = complete_form();
        form.insert("bp".into(), " 118/76 ".into());
        form.insert("nurse_name".into(), "Nurse Joy".into());
        form.insert("past_history".into(), "   ".into());

        let record = record_from_form(&form).expect("form should be accepted");
        assert_eq!(record.vitals.blood_pressure.as_str(), "118/76");
        assert_eq!(record.nurse_assessment.recorded_by, "Nurse Joy");
        assert_eq!(record.past_history, DEFAULT_PAST_HISTORY);
    }

    #[test]
    fn reports_exactly_the_missing_field() {
        let mut form = complete_form();
        form.remove("address");

        let err = record_from_form(&form).expect_err("missing address should fail");
        match err {
            PatientError::MissingRequiredFields(missing) => assert_eq!(missing, ["address"]),
            other => panic!("expected MissingRequiredFields, got {other:?}"),
        }
    }

    #[test]
    fn blank_values_count_as_missing_and_keep_order() {
        let mut form = complete_form();
        form.insert("department".into(), "  ".into());
        form.remove("patient_id");

        let missing = missing_required_fields(&form);
        assert_eq!(missing, ["patient_id", "department"]);
    }

    #[test]
    fn age_without_digits_is_kept_as_text() {
        let mut form = complete_form();
        form.insert("age".into(), " unknown ".into());

        let record = record_from_form(&form).expect("any non-blank age is accepted");
        assert_eq!(record.age, Age::Text("unknown".to_string()));
    }
}
