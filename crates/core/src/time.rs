//! Timestamp normalisation for values read from the legacy store.

use chrono::Utc;

use crate::types::{SourceTimestamp, Timestamp};

/// Convert a zoned source timestamp to the same instant in UTC.
///
/// `None` stays `None`; the caller decides whether absence is an error.
pub fn to_utc(value: Option<SourceTimestamp>) -> Option<Timestamp> {
    value.map(|ts| ts.with_timezone(&Utc))
}
