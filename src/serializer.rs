//! Canonical JSON encoding of payloads.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use thiserror::Error;

/// A payload contained a value with no JSON encoding.
#[derive(Debug, Error)]
#[error("payload serialization failed: {0}")]
pub struct SerializationError(#[from] serde_json::Error);

/// Encode `value` as compact JSON text.
///
/// Either the whole value encodes or an error is returned; partial output is
/// never handed back.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, SerializationError> {
    Ok(serde_json::to_string(value)?)
}

/// `YYYY-MM-DD`
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `YYYY-MM-DDTHH:MM:SS`, with `.ffffff` appended when the microsecond
/// component is non-zero.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    let micros = dt.nanosecond() % 1_000_000_000 / 1_000;
    if micros == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", dt.format("%Y-%m-%dT%H:%M:%S"), micros)
    }
}

/// Same as [`format_datetime`] with the `+HH:MM` offset appended.
pub fn format_zoned_datetime(dt: &DateTime<FixedOffset>) -> String {
    format!(
        "{}{}",
        format_datetime(&dt.naive_local()),
        dt.format("%:z")
    )
}
