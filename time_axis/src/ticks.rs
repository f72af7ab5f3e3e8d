//! Round tick generation inside a visible time domain.
//!
//! Ticks are aligned in the viewer's timezone, not in UTC: a daily tick sits on
//! local midnight, a 3-hour tick on a local hour divisible by 3, a 50-year tick
//! on a year divisible by 50. Stepping is calendar-aware, so monthly and yearly
//! ticks follow the calendar instead of a fixed duration.

use chrono::{DateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{add_local, floor_local, to_local, unit_field};
use crate::interval::Interval;
use crate::tz::resolve_local;

/// Default first day of the week for weekly ticks.
pub const DEFAULT_WEEK_START: Weekday = Weekday::Sun;

/// The visible axis range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDomain {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Inclusive end.
    pub end: DateTime<Utc>,
}

impl TimeDomain {
    /// Build a domain from two instants in either order.
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Build a domain from epoch milliseconds, clamped to chrono's range.
    pub fn from_millis(a: i64, b: i64) -> Self {
        Self::new(millis_to_utc(a), millis_to_utc(b))
    }

    /// Length of the domain in milliseconds.
    pub fn range_ms(&self) -> i64 {
        self.end.timestamp_millis() - self.start.timestamp_millis()
    }

    /// True when `t` lies within the domain, bounds included.
    pub fn contains<T: TimeZone>(&self, t: &DateTime<T>) -> bool {
        let t = t.with_timezone(&Utc);
        self.start <= t && t <= self.end
    }
}

pub(crate) fn millis_to_utc(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or(if ms < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Generate ticks with weeks starting on [`DEFAULT_WEEK_START`].
///
/// See [`generate_ticks_with`].
pub fn generate_ticks(domain: &TimeDomain, interval: Interval, tz: Tz) -> Vec<DateTime<Tz>> {
    generate_ticks_with(domain, interval, tz, DEFAULT_WEEK_START)
}

/// Every round `interval` boundary in `tz` that falls inside `domain`.
///
/// The start of the domain is read as wall time in `tz`, floored to
/// `interval.unit`, and aligned down to a multiple of `interval.count` in that
/// unit's own numbering. Candidate `k` is that base plus `k * count` units of
/// wall time, resolved to an instant on its own:
///
/// - a sub-day candidate inside a DST gap is dropped, since that wall time never
///   shows on a clock;
/// - a day-or-longer candidate inside a gap moves to the first instant after
///   it, as with a day that starts at 01:00;
/// - an ambiguous candidate takes the earlier instant.
///
/// Both domain bounds are inclusive. The output is strictly ascending and
/// depends only on the arguments. A domain whose bounds cannot be read as wall
/// time in `tz` (the edges of chrono's range) yields no ticks.
pub fn generate_ticks_with(
    domain: &TimeDomain,
    interval: Interval,
    tz: Tz,
    week_start: Weekday,
) -> Vec<DateTime<Tz>> {
    let unit = interval.unit;
    let count = i64::from(interval.count.get());
    let (Some(start), Some(_)) = (to_local(&domain.start, tz), to_local(&domain.end, tz)) else {
        debug!(tz = %tz.name(), "domain has no local reading; no ticks");
        return Vec::new();
    };
    let Some(base) = floor_local(start, unit, week_start)
        .and_then(|floored| add_local(floored, -unit_field(&floored, unit).rem_euclid(count), unit))
    else {
        return Vec::new();
    };

    let mut ticks: Vec<DateTime<Tz>> = Vec::new();
    for k in 0i64.. {
        let Some(wall) = k.checked_mul(count).and_then(|n| add_local(base, n, unit)) else {
            break;
        };
        let Some(tick) = resolve_local(wall, tz) else {
            break;
        };
        let in_gap = to_local(&tick.with_timezone(&Utc), tz) != Some(wall);
        if tick.with_timezone(&Utc) > domain.end {
            // a shifted gap candidate can overshoot a later one
            if in_gap {
                continue;
            }
            break;
        }
        if in_gap && unit.is_fixed() {
            continue;
        }
        if domain.contains(&tick) && ticks.last().is_none_or(|last| tick > *last) {
            ticks.push(tick);
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tz::parse_tz;
    use chrono::{Datelike, Timelike};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn domain_orders_its_bounds() {
        let d = TimeDomain::from_millis(10, 2);
        assert_eq!(d.start.timestamp_millis(), 2);
        assert_eq!(d.range_ms(), 8);
    }

    #[test]
    fn fifteen_minute_ticks_over_an_hour() {
        let domain = TimeDomain::from_millis(0, 3_600_000);
        let ticks = generate_ticks(&domain, "15m".parse().unwrap(), Tz::UTC);
        let minutes: Vec<u32> = ticks.iter().map(|t| t.minute()).collect();
        // inclusive at both ends
        assert_eq!(minutes, vec![0, 15, 30, 45, 0]);
    }

    #[test]
    fn unaligned_start_skips_to_next_round_value() {
        let domain = TimeDomain::new(utc("2024-05-01T10:07:00Z"), utc("2024-05-01T11:00:00Z"));
        let ticks = generate_ticks(&domain, "15m".parse().unwrap(), Tz::UTC);
        let minutes: Vec<u32> = ticks.iter().map(|t| t.minute()).collect();
        assert_eq!(minutes, vec![15, 30, 45, 0]);
    }

    #[test]
    fn fifty_year_ticks_align_to_multiples_of_fifty() {
        let domain = TimeDomain::new(utc("1981-06-01T00:00:00Z"), utc("2110-01-01T00:00:00Z"));
        let ticks = generate_ticks(&domain, "50Y".parse().unwrap(), Tz::UTC);
        let years: Vec<i32> = ticks.iter().map(|t| t.year()).collect();
        assert_eq!(years, vec![2000, 2050, 2100]);
    }

    #[test]
    fn daily_ticks_land_on_local_midnight() {
        let chicago = parse_tz("America/Chicago").unwrap();
        let domain = TimeDomain::new(utc("2024-01-01T00:00:00Z"), utc("2024-01-04T00:00:00Z"));
        let ticks = generate_ticks(&domain, "1D".parse().unwrap(), chicago);
        assert_eq!(ticks.len(), 3);
        for t in &ticks {
            assert_eq!((t.hour(), t.minute()), (0, 0));
            // local midnight is 06:00Z in winter
            assert_eq!(t.with_timezone(&Utc).hour(), 6);
        }
    }

    #[test]
    fn daily_tick_after_a_midnight_gap_does_not_shift_the_rest() {
        // Sao Paulo skipped 2018-11-04 00:00..01:00
        let sao_paulo = parse_tz("America/Sao_Paulo").unwrap();
        let domain = TimeDomain::new(utc("2018-11-02T12:00:00Z"), utc("2018-11-08T12:00:00Z"));
        let ticks = generate_ticks(&domain, "1D".parse().unwrap(), sao_paulo);
        let local: Vec<(u32, u32)> = ticks.iter().map(|t| (t.day(), t.hour())).collect();
        assert_eq!(local, vec![(3, 0), (4, 1), (5, 0), (6, 0), (7, 0), (8, 0)]);
    }

    #[test]
    fn hour_multiples_stay_on_local_hours_across_spring_forward() {
        let chicago = parse_tz("America/Chicago").unwrap();
        let domain = TimeDomain::new(utc("2024-03-10T05:00:00Z"), utc("2024-03-10T20:00:00Z"));
        let ticks = generate_ticks(&domain, "3h".parse().unwrap(), chicago);
        let hours: Vec<u32> = ticks.iter().map(|t| t.hour()).collect();
        assert_eq!(hours, vec![0, 3, 6, 9, 12, 15]);
    }

    #[test]
    fn half_day_ticks_stay_on_local_hours_across_fall_back() {
        let berlin = parse_tz("Europe/Berlin").unwrap();
        let domain = TimeDomain::new(utc("2024-10-26T00:00:00Z"), utc("2024-10-29T00:00:00Z"));
        let ticks = generate_ticks(&domain, "12h".parse().unwrap(), berlin);
        let local: Vec<(u32, u32)> = ticks.iter().map(|t| (t.day(), t.hour())).collect();
        assert_eq!(
            local,
            vec![(26, 12), (27, 0), (27, 12), (28, 0), (28, 12), (29, 0)]
        );
    }

    #[test]
    fn ambiguous_hour_takes_the_earlier_instant_once() {
        let ny = parse_tz("America/New_York").unwrap();
        // 00:00 EDT .. 03:00 EST on 2024-11-03
        let domain = TimeDomain::new(utc("2024-11-03T04:00:00Z"), utc("2024-11-03T08:00:00Z"));
        let ticks = generate_ticks(&domain, "1h".parse().unwrap(), ny);
        let utc_hours: Vec<u32> = ticks.iter().map(|t| t.with_timezone(&Utc).hour()).collect();
        assert_eq!(utc_hours, vec![4, 5, 7, 8]);
    }

    #[test]
    fn domain_at_the_range_edge_yields_no_ticks() {
        let tokyo = parse_tz("Asia/Tokyo").unwrap();
        let domain = TimeDomain::from_millis(i64::MAX - 1, i64::MAX);
        assert!(generate_ticks(&domain, "1D".parse().unwrap(), tokyo).is_empty());
        let domain = TimeDomain::from_millis(i64::MIN, i64::MIN + 1);
        let la = parse_tz("America/Los_Angeles").unwrap();
        assert!(generate_ticks(&domain, "1h".parse().unwrap(), la).is_empty());
    }

    #[test]
    fn quarterly_ticks_start_on_quarter_months() {
        let domain = TimeDomain::new(utc("2023-02-10T00:00:00Z"), utc("2024-01-01T00:00:00Z"));
        let ticks = generate_ticks(&domain, "3M".parse().unwrap(), Tz::UTC);
        let months: Vec<u32> = ticks.iter().map(|t| t.month()).collect();
        assert_eq!(months, vec![4, 7, 10, 1]);
    }

    #[test]
    fn weekly_ticks_respect_week_start() {
        // 2024-03-06 is a Wednesday
        let domain = TimeDomain::new(utc("2024-03-06T00:00:00Z"), utc("2024-03-20T00:00:00Z"));
        let sundays = generate_ticks(&domain, "1W".parse().unwrap(), Tz::UTC);
        assert!(sundays.iter().all(|t| t.weekday() == Weekday::Sun));
        assert_eq!(sundays.len(), 2);
        let mondays = generate_ticks_with(&domain, "1W".parse().unwrap(), Tz::UTC, Weekday::Mon);
        assert!(mondays.iter().all(|t| t.weekday() == Weekday::Mon));
        assert_eq!(mondays.len(), 2);
    }

    #[test]
    fn point_domain_on_a_boundary_yields_that_tick() {
        let domain = TimeDomain::new(utc("2024-01-01T00:00:00Z"), utc("2024-01-01T00:00:00Z"));
        let ticks = generate_ticks(&domain, "1h".parse().unwrap(), Tz::UTC);
        assert_eq!(ticks.len(), 1);
        assert!(domain.contains(&ticks[0]));
    }
}
