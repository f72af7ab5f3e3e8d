//! Error types for parsing and axis planning.

use thiserror::Error;

/// A raw value the timestamp parser could not turn into an instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unparsable timestamp: {raw}")]
pub struct ParseError {
    /// The offending input, rendered as text.
    pub raw: String,
}

/// The unified error type for the `time_axis` crate.
#[derive(Debug, Error)]
pub enum AxisError {
    /// The timezone name is not a known IANA zone.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// The x column of the chart is not a time dimension.
    #[error("Column '{0}' is not a timeseries dimension")]
    NotTimeseries(String),

    /// No sample parsed, so there is no domain to lay ticks over.
    #[error("No parsable timestamps to derive an axis domain from")]
    EmptyDomain,

    /// The request carried no series at all.
    #[error("Axis request has no series")]
    NoSeries,

    /// A tick request would lay down more ticks than the caller allows.
    #[error("Interval would produce about {expected} ticks (limit {limit})")]
    TooManyTicks {
        /// Estimated tick count for the range.
        expected: u64,
        /// The allowed maximum.
        limit: u64,
    },
}
