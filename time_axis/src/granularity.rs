//! The granularity table: every bucket size the axis knows about.
//!
//! - Entries are ordered strictly finest to coarsest; [`Granularity::TABLE`]
//!   is indexed by position and never reordered.
//! - Each entry carries a *signature*: the calendar sub-field that must stay
//!   constant across samples for the data to be classified at this granularity
//!   or finer (e.g. "5 seconds" looks at `second mod 5`).
//! - [`Granularity::for_unit`] maps declared column units onto the table.

use std::num::NonZeroU32;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::interval::{Interval, TickUnit};
use crate::unit::DateTimeUnit;

/// One candidate tick/bucket granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "Interval", try_from = "Interval")]
pub enum Granularity {
    /// Sub-second ticks; data carries no real bucketing.
    SubSecond,
    /// 1 second
    Second1,
    /// 5 seconds
    Seconds5,
    /// 15 seconds
    Seconds15,
    /// 30 seconds
    Seconds30,
    /// 1 minute
    Minute1,
    /// 5 minutes
    Minutes5,
    /// 15 minutes
    Minutes15,
    /// 30 minutes
    Minutes30,
    /// 1 hour
    Hour1,
    /// 3 hours
    Hours3,
    /// 6 hours
    Hours6,
    /// 12 hours
    Hours12,
    /// 1 day
    Day1,
    /// 1 week
    Week1,
    /// 1 month
    Month1,
    /// 3 months (a quarter)
    Months3,
    /// 1 year
    Year1,
    /// 5 years
    Years5,
    /// 10 years
    Years10,
    /// 50 years
    Years50,
    /// 100 years
    Years100,
}

impl Granularity {
    /// Every entry, finest first. Position in this array is the entry's index.
    pub const TABLE: [Granularity; 22] = [
        Granularity::SubSecond,
        Granularity::Second1,
        Granularity::Seconds5,
        Granularity::Seconds15,
        Granularity::Seconds30,
        Granularity::Minute1,
        Granularity::Minutes5,
        Granularity::Minutes15,
        Granularity::Minutes30,
        Granularity::Hour1,
        Granularity::Hours3,
        Granularity::Hours6,
        Granularity::Hours12,
        Granularity::Day1,
        Granularity::Week1,
        Granularity::Month1,
        Granularity::Months3,
        Granularity::Year1,
        Granularity::Years5,
        Granularity::Years10,
        Granularity::Years50,
        Granularity::Years100,
    ];

    /// Position in [`Granularity::TABLE`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Entry at a table position, if in range.
    pub fn from_index(index: usize) -> Option<Granularity> {
        Self::TABLE.get(index).copied()
    }

    /// Finest entry (position 0).
    pub const fn finest() -> Granularity {
        Granularity::SubSecond
    }

    /// Coarsest entry (last position).
    pub const fn coarsest() -> Granularity {
        Granularity::Years100
    }

    /// The `(unit, count)` pair this entry ticks by.
    pub const fn interval(self) -> Interval {
        let (unit, count) = match self {
            Granularity::SubSecond => (TickUnit::Millisecond, 1),
            Granularity::Second1 => (TickUnit::Second, 1),
            Granularity::Seconds5 => (TickUnit::Second, 5),
            Granularity::Seconds15 => (TickUnit::Second, 15),
            Granularity::Seconds30 => (TickUnit::Second, 30),
            Granularity::Minute1 => (TickUnit::Minute, 1),
            Granularity::Minutes5 => (TickUnit::Minute, 5),
            Granularity::Minutes15 => (TickUnit::Minute, 15),
            Granularity::Minutes30 => (TickUnit::Minute, 30),
            Granularity::Hour1 => (TickUnit::Hour, 1),
            Granularity::Hours3 => (TickUnit::Hour, 3),
            Granularity::Hours6 => (TickUnit::Hour, 6),
            Granularity::Hours12 => (TickUnit::Hour, 12),
            Granularity::Day1 => (TickUnit::Day, 1),
            Granularity::Week1 => (TickUnit::Week, 1),
            Granularity::Month1 => (TickUnit::Month, 1),
            Granularity::Months3 => (TickUnit::Month, 3),
            Granularity::Year1 => (TickUnit::Year, 1),
            Granularity::Years5 => (TickUnit::Year, 5),
            Granularity::Years10 => (TickUnit::Year, 10),
            Granularity::Years50 => (TickUnit::Year, 50),
            Granularity::Years100 => (TickUnit::Year, 100),
        };
        let count = match NonZeroU32::new(count) {
            Some(nz) => nz,
            None => unreachable!(),
        };
        Interval::new(count, unit)
    }

    /// Table position of an exact `(unit, count)` match.
    pub fn position_of(interval: Interval) -> Option<usize> {
        Self::TABLE.iter().position(|g| g.interval() == interval)
    }

    /// The "exactly one" entry for a declared column unit (the unit index).
    ///
    /// Quarters map onto the 3-month entry. Extraction units and `default`
    /// have no position.
    pub const fn for_unit(unit: DateTimeUnit) -> Option<Granularity> {
        match unit {
            DateTimeUnit::Minute => Some(Granularity::Minute1),
            DateTimeUnit::Hour => Some(Granularity::Hour1),
            DateTimeUnit::Day => Some(Granularity::Day1),
            DateTimeUnit::Week => Some(Granularity::Week1),
            DateTimeUnit::Month => Some(Granularity::Month1),
            DateTimeUnit::Quarter => Some(Granularity::Months3),
            DateTimeUnit::Year => Some(Granularity::Year1),
            _ => None,
        }
    }

    /// Signature value of a timestamp at this granularity.
    ///
    /// Reads the wall-clock fields in the timestamp's own offset.
    pub fn signature(self, t: &DateTime<FixedOffset>) -> i64 {
        let millis = i64::from(t.timestamp_subsec_millis());
        let second = i64::from(t.second());
        let minute = i64::from(t.minute());
        let hour = i64::from(t.hour());
        let day = i64::from(t.day());
        let month0 = i64::from(t.month0());
        let year = i64::from(t.year());
        match self {
            Granularity::SubSecond => 0,
            Granularity::Second1 => millis,
            Granularity::Seconds5 => second % 5,
            Granularity::Seconds15 => second % 15,
            Granularity::Seconds30 => second % 30,
            Granularity::Minute1 => second,
            Granularity::Minutes5 => minute % 5,
            Granularity::Minutes15 => minute % 15,
            Granularity::Minutes30 => minute % 30,
            Granularity::Hour1 => minute,
            Granularity::Hours3 => hour % 3,
            Granularity::Hours6 => hour % 6,
            Granularity::Hours12 => hour % 12,
            Granularity::Day1 => hour,
            Granularity::Week1 => day % 7,
            Granularity::Month1 => day,
            Granularity::Months3 => month0 % 3,
            Granularity::Year1 => month0,
            Granularity::Years5 => year.rem_euclid(5),
            Granularity::Years10 => year.rem_euclid(10),
            Granularity::Years50 => year.rem_euclid(50),
            Granularity::Years100 => year.rem_euclid(100),
        }
    }
}

impl From<Granularity> for Interval {
    fn from(g: Granularity) -> Self {
        g.interval()
    }
}

impl TryFrom<Interval> for Granularity {
    type Error = String;

    fn try_from(interval: Interval) -> Result<Self, Self::Error> {
        Self::position_of(interval)
            .and_then(Self::from_index)
            .ok_or_else(|| format!("{interval} is not in the granularity table"))
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.interval().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_variant_order() {
        for (i, g) in Granularity::TABLE.iter().enumerate() {
            assert_eq!(g.index(), i);
            assert_eq!(Granularity::from_index(i), Some(*g));
        }
        assert_eq!(Granularity::from_index(Granularity::TABLE.len()), None);
        assert_eq!(Granularity::TABLE[0], Granularity::finest());
        assert_eq!(Granularity::TABLE[21], Granularity::coarsest());
    }

    #[test]
    fn same_unit_neighbours_grow_by_multiples() {
        for pair in Granularity::TABLE.windows(2) {
            let (a, b) = (pair[0].interval(), pair[1].interval());
            assert!(a.unit <= b.unit, "{a} then {b}");
            if a.unit == b.unit {
                assert!(b.count.get() > a.count.get());
                assert_eq!(b.count.get() % a.count.get(), 0, "{a} then {b}");
            }
        }
    }

    #[test]
    fn unit_index_is_monotonic() {
        let units = [
            DateTimeUnit::Minute,
            DateTimeUnit::Hour,
            DateTimeUnit::Day,
            DateTimeUnit::Week,
            DateTimeUnit::Month,
            DateTimeUnit::Quarter,
            DateTimeUnit::Year,
        ];
        let positions: Vec<usize> = units
            .iter()
            .map(|&u| Granularity::for_unit(u).unwrap().index())
            .collect();
        assert_eq!(positions, vec![5, 9, 13, 14, 15, 16, 17]);
        assert_eq!(Granularity::for_unit(DateTimeUnit::DayOfWeek), None);
    }

    #[test]
    fn position_of_exact_match_only() {
        let fifteen_min: Interval = "15m".parse().unwrap();
        assert_eq!(Granularity::position_of(fifteen_min), Some(7));
        let two_min: Interval = "2m".parse().unwrap();
        assert_eq!(Granularity::position_of(two_min), None);
    }

    #[test]
    fn signatures_read_unit_fields() {
        let t = DateTime::parse_from_rfc3339("1987-11-23T14:37:52.250+02:00").unwrap();
        assert_eq!(Granularity::SubSecond.signature(&t), 0);
        assert_eq!(Granularity::Second1.signature(&t), 250);
        assert_eq!(Granularity::Seconds15.signature(&t), 52 % 15);
        assert_eq!(Granularity::Minute1.signature(&t), 52);
        assert_eq!(Granularity::Minutes5.signature(&t), 2);
        assert_eq!(Granularity::Hour1.signature(&t), 37);
        assert_eq!(Granularity::Hours6.signature(&t), 2);
        // local hour, not UTC
        assert_eq!(Granularity::Day1.signature(&t), 14);
        assert_eq!(Granularity::Week1.signature(&t), 23 % 7);
        assert_eq!(Granularity::Month1.signature(&t), 23);
        assert_eq!(Granularity::Months3.signature(&t), 10 % 3);
        assert_eq!(Granularity::Year1.signature(&t), 10);
        assert_eq!(Granularity::Years50.signature(&t), 37);
    }

    #[test]
    fn serializes_as_interval() {
        let json = serde_json::to_string(&Granularity::Months3).unwrap();
        assert_eq!(json, r#"{"unit":"month","count":3}"#);
        assert_eq!(Granularity::Hours12.to_string(), "12h");
        let back: Granularity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Granularity::Months3);
        assert!(serde_json::from_str::<Granularity>(r#"{"unit":"minute","count":2}"#).is_err());
    }
}
