//! Time-axis planning for charts.
//!
//! Infers how finely a timestamp series is bucketed, picks a tick spacing that
//! fits the chart width, lays round ticks out in the viewer's timezone, and
//! settles on one timezone when several series disagree.

#![deny(missing_docs)]

pub mod axis;
pub mod calendar;
pub mod config;
pub mod dimension;
pub mod error;
pub mod granularity;
pub mod infer;
pub mod interval;
pub mod parse;
pub mod resolver;
pub mod scale;
pub mod select;
pub mod ticks;
pub mod tz;
pub mod unit;

pub use axis::{AxisPlan, AxisRequest, SeriesInput, plan_axis};
pub use config::AxisConfig;
pub use error::{AxisError, ParseError};
pub use granularity::Granularity;
pub use infer::{infer_granularity, infer_granularity_with};
pub use interval::{Interval, TickUnit};
pub use parse::{RawTimestamp, TimestampParser};
pub use resolver::{SeriesTimezoneInfo, TimezoneWarning, resolve_timezone};
pub use scale::{LinearScale, Scale, TimeseriesScale};
pub use select::{max_tick_count, select_tick_interval};
pub use ticks::{TimeDomain, generate_ticks};
pub use unit::DateTimeUnit;
