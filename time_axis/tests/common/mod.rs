#![allow(dead_code)]

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use time_axis::tz::parse_tz;
use time_axis::{RawTimestamp, SeriesTimezoneInfo};

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("rfc3339")
        .with_timezone(&Utc)
}

pub fn zone(name: &str) -> Tz {
    parse_tz(name).expect("known zone")
}

pub fn raw(values: &[&str]) -> Vec<RawTimestamp> {
    values.iter().map(|&v| RawTimestamp::from(v)).collect()
}

pub fn series(results: Option<&str>, requested: Option<&str>) -> SeriesTimezoneInfo {
    SeriesTimezoneInfo {
        results_timezone: results.map(str::to_string),
        requested_timezone: requested.map(str::to_string),
    }
}

/// Render ticks one per line for snapshotting.
pub fn render<T: chrono::TimeZone>(ticks: &[DateTime<T>]) -> String
where
    T::Offset: std::fmt::Display,
{
    ticks
        .iter()
        .map(time_axis::tz::to_rfc3339_millis)
        .collect::<Vec<_>>()
        .join("\n")
}
