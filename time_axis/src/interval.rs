//! Tick intervals: a non-zero count of a calendar unit.
//!
//! An [`Interval`] pairs a non-zero count with a [`TickUnit`], covering
//! everything from milliseconds up to calendar years. It is the `(unit, count)`
//! half of a granularity table entry and the spacing handed to the tick
//! generator.
//!
//! Typical usage:
//! ```
//! use std::num::NonZeroU32;
//! use time_axis::interval::{Interval, TickUnit};
//!
//! let iv = Interval::new(NonZeroU32::new(15).unwrap(), TickUnit::Minute);
//! assert_eq!(iv.count().get(), 15);
//! assert_eq!(iv.to_string(), "15m");
//! assert_eq!("15m".parse::<Interval>().unwrap(), iv);
//! ```

use std::{fmt, num::NonZeroU32, str::FromStr};

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

/// Calendar unit a tick interval steps by, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickUnit {
    /// Exact milliseconds
    Millisecond,
    /// Exact seconds
    Second,
    /// Exact minutes
    Minute,
    /// Exact hours
    Hour,
    /// Local calendar days
    Day,
    /// Local calendar weeks
    Week,
    /// Calendar months
    Month,
    /// Calendar years
    Year,
}

impl TickUnit {
    /// Short suffix used by the `Display`/`FromStr` form.
    pub const fn suffix(self) -> &'static str {
        match self {
            TickUnit::Millisecond => "ms",
            TickUnit::Second => "s",
            TickUnit::Minute => "m",
            TickUnit::Hour => "h",
            TickUnit::Day => "D",
            TickUnit::Week => "W",
            TickUnit::Month => "M",
            TickUnit::Year => "Y",
        }
    }

    /// True for units whose length never depends on the calendar or timezone.
    pub const fn is_fixed(self) -> bool {
        matches!(
            self,
            TickUnit::Millisecond | TickUnit::Second | TickUnit::Minute | TickUnit::Hour
        )
    }
}

/// An interval = count × unit (e.g., 5-Second, 3-Hour, 3-Month, 50-Year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    /// Unit stepped by.
    pub unit: TickUnit,
    /// How many units make one step.
    pub count: NonZeroU32,
}

impl Interval {
    /// Create a new Interval
    pub const fn new(count: NonZeroU32, unit: TickUnit) -> Self {
        Self { unit, count }
    }
    /// Number of units per step.
    pub const fn count(&self) -> NonZeroU32 {
        self.count
    }
    /// Unit of each step.
    pub const fn unit(&self) -> TickUnit {
        self.unit
    }
}

/// Display/parse for CLI ergonomics (`"15m"`, `"1D"`, `"3M"`, `"50Y"`)
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count.get(), self.unit.suffix())
    }
}

impl FromStr for Interval {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // small parser: 1ms / 5s / 15m / 3h / 1D / 1W / 3M / 10Y
        let s = s.trim();
        if s.is_empty() {
            bail!("empty interval");
        }
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| anyhow!("missing unit in interval: {s}"))?;
        let (digits, unit) = s.split_at(split);
        let count_num: u32 = digits
            .parse()
            .map_err(|e| anyhow!("bad interval count '{digits}': {e}"))?;
        let count = NonZeroU32::new(count_num).ok_or_else(|| anyhow!("count must be > 0"))?;
        let unit = match unit {
            "ms" => TickUnit::Millisecond,
            "s" => TickUnit::Second,
            "m" => TickUnit::Minute,
            "h" => TickUnit::Hour,
            "D" => TickUnit::Day,
            "W" => TickUnit::Week,
            "M" => TickUnit::Month,
            "Y" => TickUnit::Year,
            _ => bail!("unknown unit: {unit}"),
        };
        Ok(Interval::new(count, unit))
    }
}
