//! Doctor notes and their display ordering.
//!
//! Notes are kept in the order they were loaded. Presentation layers ask for them
//! latest first, where "latest" is decided by the note's date and time fields.

use crate::constants::NO_NOTES;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"];

/// A timestamped, authored free-text note attached to a record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub note: String,
}

impl ClinicalNote {
    /// Combined date and time of the note, if both fields parse.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let date = parse_date(&self.date)?;
        let time = parse_time(&self.time)?;
        Some(date.and_time(time))
    }

    /// Long form of the note's date, e.g. `Friday, January 5, 2024`.
    pub fn long_date(&self) -> Option<String> {
        parse_date(&self.date).map(|d| d.format("%A, %B %-d, %Y").to_string())
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}

/// Orders two notes latest first. Notes without a usable timestamp go last.
fn latest_first_cmp(a: &ClinicalNote, b: &ClinicalNote) -> Ordering {
    match (a.timestamp(), b.timestamp()) {
        (Some(ta), Some(tb)) => tb.cmp(&ta),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Borrow `notes` in display order.
///
/// The sort is stable, so notes with equal (or unparseable) timestamps keep their
/// stored order.
pub fn latest_first(notes: &[ClinicalNote]) -> Vec<&ClinicalNote> {
    let mut ordered: Vec<&ClinicalNote> = notes.iter().collect();
    ordered.sort_by(|a, b| latest_first_cmp(a, b));
    ordered
}

/// Sort `notes` in place into display order.
pub fn sort_latest_first(notes: &mut [ClinicalNote]) {
    notes.sort_by(latest_first_cmp);
}

/// Summary line shown above a list of notes, or in place of an empty one.
pub fn count_label(count: usize) -> String {
    match count {
        0 => NO_NOTES.to_string(),
        1 => "1 note available".to_string(),
        n => format!("{n} notes available"),
    }
}
