//! Suggests the next sequential patient identifier.

use chartdesk_types::PatientId;
use std::collections::BTreeSet;

/// Next free `P<digits>` identifier after the highest one in `existing`.
///
/// Only the digit run directly after a leading `P` is read; identifiers without one are
/// ignored, so an empty or entirely non-conforming set yields `P001`. The result is a
/// suggestion: callers may replace it before inserting.
///
/// If the highest number is already `u64::MAX`, the lowest unused number is suggested
/// instead.
pub fn next_identifier<'a, I>(existing: I) -> PatientId
where
    I: IntoIterator<Item = &'a PatientId>,
{
    let taken: BTreeSet<u64> = existing
        .into_iter()
        .filter_map(PatientId::sequence_number)
        .collect();

    let next = match taken.last() {
        None => 1,
        Some(&max) => max.checked_add(1).unwrap_or_else(|| lowest_unused(&taken)),
    };

    PatientId::from_sequence(next)
}

/// Smallest number from 1 upwards that is not in `taken`.
fn lowest_unused(taken: &BTreeSet<u64>) -> u64 {
    let mut candidate = 1;
    for &n in taken.range(1..) {
        if n != candidate {
            break;
        }
        candidate += 1;
    }
    candidate
}
