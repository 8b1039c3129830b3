//! Timestamp normalization for document-store values.
//!
//! Every parser goes through `to_instant` so the divergent source shapes
//! (native timestamp objects, ISO strings, epoch millis) resolve the same
//! way everywhere. Unparseable values become `None`; callers must skip such
//! records rather than substitute the current time.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;


/// Normalize a raw document-store value into an instant.
///
/// Accepted shapes:
/// - timestamp objects: `{"_seconds": .., "_nanoseconds": ..}` or
///   `{"seconds": .., "nanoseconds": ..}`
/// - RFC 3339 strings (with or without a trailing `Z`)
/// - plain `YYYY-MM-DD` strings (midnight UTC)
/// - integer epoch milliseconds
pub fn to_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Object(map) => {
            let seconds = map
                .get("_seconds")
                .or_else(|| map.get("seconds"))
                .and_then(|v| v.as_i64())?;
            let nanos = map
                .get("_nanoseconds")
                .or_else(|| map.get("nanoseconds"))
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, nanos.clamp(0, 999_999_999) as u32)
        }
        Value::String(s) => parse_date_string(s),
        Value::Number(n) => {
            let millis = n.as_i64()?;
            DateTime::from_timestamp_millis(millis)
        }
        _ => None,
    }
}


/// Parse a timestamp-like string to DateTime<Utc>.
fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Handle "Z" suffix
    let normalized = trimmed.replace('Z', "+00:00");
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    // Bare dates land at midnight UTC
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
