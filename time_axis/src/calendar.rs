//! Timezone-aware calendar arithmetic for tick stepping.
//!
//! All floors, steps and alignment fields work on local wall time (a
//! `NaiveDateTime` read in the axis zone). A wall time only becomes an instant
//! through [`crate::tz::resolve_local`], one candidate at a time, so a tick that
//! shifts through a DST gap never drags the following ticks with it.
//!
//! - One stable epoch: Unix (1970-01-01T00:00:00Z) for measuring unit lengths.
//! - Sub-day units step the wall clock, so 3-hour ticks stay on local hours
//!   divisible by 3 across DST changes.
//! - Day/week: local calendar days (23- and 25-hour days included).
//! - Month/year: calendar months, clamping to the last day of shorter months.
//!
//! Every function is checked: `None` means the value left chrono's range.

use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::interval::{Interval, TickUnit};

/// Unix epoch start (1970-01-01T00:00:00Z).
pub const EPOCH_UNIX: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// Number of milliseconds in a second.
pub const MILLIS_PER_SECOND: i64 = 1_000;
/// Number of milliseconds in a minute.
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
/// Number of milliseconds in an hour.
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

/// Wall time of `t` in `tz`.
///
/// `None` when the instant is representable in UTC but its local reading is
/// not (e.g. the last hours of chrono's range in a zone east of UTC).
pub fn to_local(t: &DateTime<Utc>, tz: Tz) -> Option<NaiveDateTime> {
    let utc = t.naive_utc();
    let offset = tz.offset_from_utc_datetime(&utc).fix();
    utc.checked_add_offset(offset)
}

/// Floor a wall time to the start of `unit`. Weeks start on `week_start`.
pub fn floor_local(local: NaiveDateTime, unit: TickUnit, week_start: Weekday) -> Option<NaiveDateTime> {
    let date = local.date();
    let midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN);
    match unit {
        TickUnit::Millisecond => local.with_nanosecond(local.nanosecond() / 1_000_000 * 1_000_000),
        TickUnit::Second => local.with_nanosecond(0),
        TickUnit::Minute => local.with_nanosecond(0)?.with_second(0),
        TickUnit::Hour => local.with_nanosecond(0)?.with_second(0)?.with_minute(0),
        TickUnit::Day => Some(midnight(date)),
        TickUnit::Week => {
            let back = date.weekday().days_since(week_start);
            date.checked_sub_days(Days::new(u64::from(back))).map(midnight)
        }
        TickUnit::Month => date.with_day(1).map(midnight),
        TickUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).map(midnight),
    }
}

/// Step a wall time by `n` units (negative to go back).
pub fn add_local(local: NaiveDateTime, n: i64, unit: TickUnit) -> Option<NaiveDateTime> {
    match unit {
        TickUnit::Millisecond => local.checked_add_signed(Duration::try_milliseconds(n)?),
        TickUnit::Second => local.checked_add_signed(Duration::try_seconds(n)?),
        TickUnit::Minute => local.checked_add_signed(Duration::try_minutes(n)?),
        TickUnit::Hour => local.checked_add_signed(Duration::try_hours(n)?),
        TickUnit::Day => local.checked_add_signed(Duration::try_days(n)?),
        TickUnit::Week => local.checked_add_signed(Duration::try_weeks(n)?),
        TickUnit::Month => add_months(local, n),
        TickUnit::Year => add_months(local, n.checked_mul(12)?),
    }
}

/// The numbering of `unit` that tick alignment takes `mod count` of.
///
/// Day counts from 0 on the first of the month; weeks have no natural
/// numbering and always read 0; months count from 0 in January.
pub fn unit_field<T: Datelike + Timelike>(t: &T, unit: TickUnit) -> i64 {
    match unit {
        TickUnit::Millisecond => i64::from(t.nanosecond() % 1_000_000_000 / 1_000_000),
        TickUnit::Second => i64::from(t.second()),
        TickUnit::Minute => i64::from(t.minute()),
        TickUnit::Hour => i64::from(t.hour()),
        TickUnit::Day => i64::from(t.day0()),
        TickUnit::Week => 0,
        TickUnit::Month => i64::from(t.month0()),
        TickUnit::Year => i64::from(t.year()),
    }
}

/// Real length of one interval step, measured by calendar addition from the
/// Unix epoch in UTC.
pub fn interval_length_ms(interval: Interval) -> i64 {
    let n = i64::from(interval.count.get());
    let origin = EPOCH_UNIX.naive_utc();
    add_local(origin, n, interval.unit)
        .map(|t| (t - origin).num_milliseconds())
        .unwrap_or(i64::MAX)
}

fn add_months(local: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        local.checked_add_months(magnitude)
    } else {
        local.checked_sub_months(magnitude)
    }
}
