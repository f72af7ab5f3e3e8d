//! Raw timestamp values and the parser that turns them into instants.
//!
//! Accepted textual forms (the strict ISO-8601 subset):
//! - RFC 3339 with an offset: `2024-03-10T09:30:00-05:00`, `2024-03-10T14:30:00.250Z`
//! - Date-time without offset, read as UTC: `2024-03-10T14:30:00`, `2024-03-10T14:30`
//! - Bare calendar date, read as UTC midnight: `2024-03-10`
//!
//! Numbers are epoch milliseconds in UTC.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

const NAIVE_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

/// A timestamp as it arrives from a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Epoch milliseconds.
    EpochMillis(i64),
    /// Textual timestamp.
    Text(String),
}

impl fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawTimestamp::EpochMillis(ms) => write!(f, "{ms}"),
            RawTimestamp::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawTimestamp {
    fn from(s: &str) -> Self {
        RawTimestamp::Text(s.to_string())
    }
}

impl From<String> for RawTimestamp {
    fn from(s: String) -> Self {
        RawTimestamp::Text(s)
    }
}

impl From<i64> for RawTimestamp {
    fn from(ms: i64) -> Self {
        RawTimestamp::EpochMillis(ms)
    }
}

/// Turns raw row values into instants, keeping the value's own offset.
pub trait TimestampParser {
    /// Parse one raw value.
    fn parse(&self, raw: &RawTimestamp) -> Result<DateTime<FixedOffset>, ParseError>;
}

/// Default parser: strict ISO-8601 text and epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsoTimestampParser;

impl TimestampParser for IsoTimestampParser {
    fn parse(&self, raw: &RawTimestamp) -> Result<DateTime<FixedOffset>, ParseError> {
        let parsed = match raw {
            RawTimestamp::EpochMillis(ms) => Utc
                .timestamp_millis_opt(*ms)
                .single()
                .map(|dt| dt.fixed_offset()),
            RawTimestamp::Text(s) => parse_strict_iso8601(s),
        };
        parsed.ok_or_else(|| ParseError {
            raw: raw.to_string(),
        })
    }
}

/// Parse the strict ISO-8601 subset listed in the module docs.
///
/// Returns `None` for anything else, including free-form dates and numbers.
pub fn parse_strict_iso8601(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
