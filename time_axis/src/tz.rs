//! Time zone parsing and local-time resolution helpers.
//!
//! - [`parse_tz`]: Parse an IANA time zone name (e.g., "America/Chicago").
//! - [`resolve_local`]: Map a wall time to an instant. Ambiguous wall times
//!   (“fall back”, the wall time occurs twice) take the earlier instant;
//!   nonexistent ones (“spring forward”, the wall time is skipped) move past
//!   the gap.
//! - [`to_rfc3339_millis`]: Millisecond RFC 3339 output for tick labels.

use chrono::{DateTime, Duration, NaiveDateTime, Offset, SecondsFormat, TimeZone};
use chrono_tz::Tz;

use crate::error::AxisError;

/// Parse an IANA time zone name.
pub fn parse_tz(name: &str) -> Result<Tz, AxisError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| AxisError::UnknownTimezone(name.to_string()))
}

/// Map a local wall time in `tz` to an instant.
///
/// - Single instant: that instant.
/// - Ambiguous (fall-back): the earlier instant.
/// - Nonexistent (spring-forward): shifted forward by the length of the gap,
///   so 02:30 in a 02:00→03:00 gap lands on 03:30.
///
/// `None` only when the result would leave chrono's range.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    use chrono::offset::LocalResult::*;
    match tz.from_local_datetime(&naive) {
        Single(dt) => Some(dt),
        Ambiguous(a, _) => Some(a),
        None => shift_past_gap(naive, tz),
    }
}

// Read the wall time with the offset in force before the gap; converting that
// instant back lands the same distance past the transition.
fn shift_past_gap(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    let before = naive.checked_sub_signed(Duration::days(1))?;
    let offset = tz.offset_from_utc_datetime(&before).fix();
    Some(tz.from_utc_datetime(&naive.checked_sub_offset(offset)?))
}

/// Format a datetime as an RFC-3339 string with millisecond precision.
pub fn to_rfc3339_millis<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn ny() -> Tz {
        parse_tz("America/New_York").unwrap()
    }

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn unknown_zone_is_error() {
        let err = parse_tz("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, AxisError::UnknownTimezone(ref n) if n == "Mars/Olympus_Mons"));
        assert!(parse_tz("Etc/UTC").is_ok());
        assert!(parse_tz("UTC").is_ok());
    }

    #[test]
    fn ny_spring_forward_gap_shifts_by_gap_length() {
        // America/New_York jumps from 02:00 to 03:00 on 2024-03-10; 02:30 read
        // with EST (-05:00) is 07:30Z = 03:30 EDT.
        let got = resolve_local(naive(2024, 3, 10, 2, 30), ny()).unwrap();
        let want = Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap();
        assert_eq!(got.with_timezone(&Utc), want);
    }

    #[test]
    fn ny_fall_back_takes_the_earlier_instant() {
        // 01:30 EDT (05:30Z) and 01:30 EST (06:30Z) both read 01:30
        let got = resolve_local(naive(2024, 11, 3, 1, 30), ny()).unwrap();
        assert_eq!(
            got.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap()
        );
    }

    #[test]
    fn skipped_calendar_day_still_resolves() {
        // Samoa skipped 2011-12-30 entirely when it crossed the date line.
        let apia = parse_tz("Pacific/Apia").unwrap();
        let got = resolve_local(naive(2011, 12, 30, 0, 0), apia).unwrap();
        assert_eq!(got.date_naive(), NaiveDate::from_ymd_opt(2011, 12, 31).unwrap());
    }

    #[test]
    fn wall_time_past_the_range_edge_is_none() {
        let tokyo = parse_tz("Asia/Tokyo").unwrap();
        assert_eq!(resolve_local(NaiveDateTime::MIN, tokyo), None);
        assert!(resolve_local(NaiveDateTime::MAX, tokyo).is_some());
    }

    #[test]
    fn millis_formatting() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        assert_eq!(to_rfc3339_millis(&dt), "2024-01-15T14:30:00.000Z");
    }
}
