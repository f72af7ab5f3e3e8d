//! Scales that map axis values onto pixel positions.
//!
//! [`LinearScale`] is a plain affine map from a numeric domain onto a range.
//! [`TimeseriesScale`] owns one over epoch milliseconds together with the
//! timezone, tick interval, and week start it lays ticks out with; range,
//! clamping, and interpolation calls go straight through to the linear map.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::granularity::Granularity;
use crate::interval::Interval;
use crate::ticks::{DEFAULT_WEEK_START, TimeDomain, generate_ticks_with, millis_to_utc};
use crate::tz::resolve_local;

/// Operations every axis scale supports.
pub trait Scale {
    /// Map a raw numeric domain value onto the range.
    fn map_value(&self, x: f64) -> f64;
    /// Map a range position back onto a raw numeric domain value.
    fn invert_value(&self, y: f64) -> f64;
    /// Current output range.
    fn range(&self) -> (f64, f64);
    /// Replace the output range.
    fn set_range(&mut self, r0: f64, r1: f64);
    /// Toggle clamping of outputs to the range.
    fn set_clamp(&mut self, clamp: bool);
}

/// How range values are produced between the range bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Plain linear interpolation.
    #[default]
    Linear,
    /// Linear interpolation rounded to the nearest integer (crisp pixel edges).
    Round,
}

/// Affine map from `domain` onto `range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
    interpolation: Interpolation,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}

impl LinearScale {
    /// New unclamped linear scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
            interpolation: Interpolation::Linear,
        }
    }

    /// Current domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Replace the domain.
    pub fn set_domain(&mut self, d0: f64, d1: f64) {
        self.domain = (d0, d1);
    }

    /// Replace the range and switch to rounded interpolation.
    pub fn set_range_round(&mut self, r0: f64, r1: f64) {
        self.range = (r0, r1);
        self.interpolation = Interpolation::Round;
    }

    /// Whether outputs are clamped to the range.
    pub fn clamp(&self) -> bool {
        self.clamp
    }

    /// Current interpolation.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Replace the interpolation.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }
}

// Fraction of the way from a to b; a degenerate span maps to its start.
fn normalize(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span == 0.0 || !span.is_finite() { 0.0 } else { (x - a) / span }
}

impl Scale for LinearScale {
    fn map_value(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let mut t = normalize(d0, d1, x);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        let y = r0 + t * (r1 - r0);
        match self.interpolation {
            Interpolation::Linear => y,
            Interpolation::Round => y.round(),
        }
    }

    fn invert_value(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let mut t = normalize(r0, r1, y);
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        d0 + t * (d1 - d0)
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn set_range(&mut self, r0: f64, r1: f64) {
        self.range = (r0, r1);
    }

    fn set_clamp(&mut self, clamp: bool) {
        self.clamp = clamp;
    }
}

/// Values a [`TimeseriesScale`] can place on the axis.
pub trait ScaleValue {
    /// Epoch milliseconds of this value, reading calendar dates in `tz`.
    fn epoch_millis(&self, tz: Tz) -> i64;
}

impl<T: TimeZone> ScaleValue for DateTime<T> {
    fn epoch_millis(&self, _tz: Tz) -> i64 {
        self.timestamp_millis()
    }
}

/// A calendar date sits at local midnight in the scale's timezone.
impl ScaleValue for NaiveDate {
    fn epoch_millis(&self, tz: Tz) -> i64 {
        let midnight = self.and_time(NaiveTime::MIN);
        // outside chrono's range in `tz`: fall back to reading the date as UTC
        resolve_local(midnight, tz)
            .map(|t| t.timestamp_millis())
            .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
    }
}

/// Time axis scale: a linear map over epoch milliseconds plus tick layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesScale {
    linear: LinearScale,
    timezone: Tz,
    interval: Interval,
    week_start: Weekday,
}

impl TimeseriesScale {
    /// New scale over `domain` onto `range`, ticking daily until told otherwise.
    pub fn new(domain: TimeDomain, range: (f64, f64), timezone: Tz) -> Self {
        let mut linear = LinearScale::new((0.0, 1.0), range);
        linear.set_domain(
            domain.start.timestamp_millis() as f64,
            domain.end.timestamp_millis() as f64,
        );
        Self {
            linear,
            timezone,
            interval: Granularity::Day1.interval(),
            week_start: DEFAULT_WEEK_START,
        }
    }

    /// Builder: set the tick interval.
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Builder: set the first day of the week for weekly ticks.
    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    /// Map a timestamp or calendar date onto the range.
    pub fn map<V: ScaleValue>(&self, value: &V) -> f64 {
        self.linear.map_value(value.epoch_millis(self.timezone) as f64)
    }

    /// Map a range position back onto an instant.
    pub fn invert(&self, y: f64) -> DateTime<Utc> {
        millis_to_utc(self.linear.invert_value(y).round() as i64)
    }

    /// Current domain.
    pub fn domain(&self) -> TimeDomain {
        let (d0, d1) = self.linear.domain();
        TimeDomain::from_millis(d0.round() as i64, d1.round() as i64)
    }

    /// Replace the domain.
    pub fn set_domain(&mut self, domain: TimeDomain) {
        self.linear.set_domain(
            domain.start.timestamp_millis() as f64,
            domain.end.timestamp_millis() as f64,
        );
    }

    /// Round ticks across the current domain, in the scale's timezone.
    pub fn ticks(&self) -> Vec<DateTime<Tz>> {
        generate_ticks_with(&self.domain(), self.interval, self.timezone, self.week_start)
    }

    /// Current tick interval.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Replace the tick interval.
    pub fn set_interval(&mut self, interval: Interval) {
        self.interval = interval;
    }

    /// Timezone ticks are aligned in.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// An independent scale with the same configuration.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Replace the range and switch to rounded interpolation.
    pub fn set_range_round(&mut self, r0: f64, r1: f64) {
        self.linear.set_range_round(r0, r1);
    }

    /// Replace the interpolation.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.linear.set_interpolation(interpolation);
    }

    /// The underlying linear map.
    pub fn linear(&self) -> &LinearScale {
        &self.linear
    }
}

impl Scale for TimeseriesScale {
    fn map_value(&self, x: f64) -> f64 {
        self.linear.map_value(x)
    }

    fn invert_value(&self, y: f64) -> f64 {
        self.linear.invert_value(y)
    }

    fn range(&self) -> (f64, f64) {
        self.linear.range()
    }

    fn set_range(&mut self, r0: f64, r1: f64) {
        self.linear.set_range(r0, r1);
    }

    fn set_clamp(&mut self, clamp: bool) {
        self.linear.set_clamp(clamp);
    }
}
