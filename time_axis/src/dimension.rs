//! Decide whether a result column should be drawn on a time axis.

use serde::{Deserialize, Serialize};

use crate::parse::{RawTimestamp, parse_strict_iso8601};
use crate::unit::DateTimeUnit;

/// The parts of a result column's metadata the time axis looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name, used in diagnostics.
    pub name: String,
    /// Whether the query layer typed this column as a date/time.
    #[serde(default)]
    pub is_date: bool,
    /// Bucketing unit, if the column was bucketed.
    #[serde(default)]
    pub unit: Option<DateTimeUnit>,
}

/// True when `column` is a timeseries dimension.
///
/// Either the column is a date column with no unit (or `default`, or a
/// truncation unit), or its first value is a strict ISO-8601 timestamp.
/// Extraction units such as `hour-of-day` are categorical, not timeseries.
pub fn is_timeseries_dimension(column: &ColumnMetadata, first_value: Option<&RawTimestamp>) -> bool {
    let unit_ok = match column.unit {
        None | Some(DateTimeUnit::Default) => true,
        Some(unit) => unit.is_timeseries(),
    };
    if column.is_date && unit_ok {
        return true;
    }
    matches!(first_value, Some(RawTimestamp::Text(s)) if parse_strict_iso8601(s).is_some())
}
