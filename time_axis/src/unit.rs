//! Column bucketing units as reported by the query layer.

use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::granularity::Granularity;

/// Unit a date column was bucketed or extracted by.
///
/// Truncation units (`minute` .. `year`) keep a timeline; extraction units
/// (`hour-of-day`, `day-of-week`, ...) fold it into a cyclic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateTimeUnit {
    /// No explicit bucketing.
    Default,
    /// Truncated to the minute.
    Minute,
    /// Truncated to the hour.
    Hour,
    /// Truncated to the day.
    Day,
    /// Truncated to the week.
    Week,
    /// Truncated to the month.
    Month,
    /// Truncated to the quarter.
    Quarter,
    /// Truncated to the year.
    Year,
    /// Minute within the hour (0-59).
    MinuteOfHour,
    /// Hour within the day (0-23).
    HourOfDay,
    /// Weekday.
    DayOfWeek,
    /// Day within the month.
    DayOfMonth,
    /// Day within the year.
    DayOfYear,
    /// Week within the year.
    WeekOfYear,
    /// Month within the year.
    MonthOfYear,
    /// Quarter within the year.
    QuarterOfYear,
}

impl DateTimeUnit {
    /// Every unit, truncation units first.
    pub const ALL: [DateTimeUnit; 16] = [
        DateTimeUnit::Default,
        DateTimeUnit::Minute,
        DateTimeUnit::Hour,
        DateTimeUnit::Day,
        DateTimeUnit::Week,
        DateTimeUnit::Month,
        DateTimeUnit::Quarter,
        DateTimeUnit::Year,
        DateTimeUnit::MinuteOfHour,
        DateTimeUnit::HourOfDay,
        DateTimeUnit::DayOfWeek,
        DateTimeUnit::DayOfMonth,
        DateTimeUnit::DayOfYear,
        DateTimeUnit::WeekOfYear,
        DateTimeUnit::MonthOfYear,
        DateTimeUnit::QuarterOfYear,
    ];

    /// Wire name, as serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            DateTimeUnit::Default => "default",
            DateTimeUnit::Minute => "minute",
            DateTimeUnit::Hour => "hour",
            DateTimeUnit::Day => "day",
            DateTimeUnit::Week => "week",
            DateTimeUnit::Month => "month",
            DateTimeUnit::Quarter => "quarter",
            DateTimeUnit::Year => "year",
            DateTimeUnit::MinuteOfHour => "minute-of-hour",
            DateTimeUnit::HourOfDay => "hour-of-day",
            DateTimeUnit::DayOfWeek => "day-of-week",
            DateTimeUnit::DayOfMonth => "day-of-month",
            DateTimeUnit::DayOfYear => "day-of-year",
            DateTimeUnit::WeekOfYear => "week-of-year",
            DateTimeUnit::MonthOfYear => "month-of-year",
            DateTimeUnit::QuarterOfYear => "quarter-of-year",
        }
    }

    /// True for the truncation units that keep values on a continuous timeline.
    pub const fn is_timeseries(self) -> bool {
        matches!(
            self,
            DateTimeUnit::Minute
                | DateTimeUnit::Hour
                | DateTimeUnit::Day
                | DateTimeUnit::Week
                | DateTimeUnit::Month
                | DateTimeUnit::Quarter
                | DateTimeUnit::Year
        )
    }
}

impl fmt::Display for DateTimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateTimeUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        DateTimeUnit::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| anyhow!("unknown datetime unit: {s}"))
    }
}

/// Finest of a set of declared units, by granularity table position.
///
/// Absent entries and units without a table position (extraction units,
/// `default`) are skipped. Ties keep the first occurrence.
pub fn finest_unit(units: &[Option<DateTimeUnit>]) -> Option<DateTimeUnit> {
    units
        .iter()
        .flatten()
        .filter_map(|&u| Granularity::for_unit(u).map(|g| (g.index(), u)))
        .min_by_key(|&(idx, _)| idx)
        .map(|(_, u)| u)
}
