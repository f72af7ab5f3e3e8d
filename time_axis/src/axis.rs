//! End-to-end axis planning for one chart.
//!
//! [`plan_axis`] strings the pieces together: resolve the timezone, make sure
//! the x column is a time dimension, infer the data granularity, pick a tick
//! spacing that fits the chart width, and lay ticks across the domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AxisConfig;
use crate::dimension::{ColumnMetadata, is_timeseries_dimension};
use crate::error::AxisError;
use crate::infer::infer_granularity;
use crate::interval::Interval;
use crate::parse::{IsoTimestampParser, RawTimestamp, TimestampParser};
use crate::resolver::{SeriesTimezoneInfo, TimezoneWarning, resolve_timezone_or};
use crate::select::{max_tick_count, select_tick_interval};
use crate::ticks::{DEFAULT_WEEK_START, TimeDomain, generate_ticks_with};
use crate::tz::{parse_tz, to_rfc3339_millis};
use crate::unit::finest_unit;

/// One data series plotted against the time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesInput {
    /// Timezone metadata reported with the series' results.
    #[serde(flatten)]
    pub timezone: SeriesTimezoneInfo,
    /// Metadata of the x column.
    pub column: ColumnMetadata,
    /// Raw x values, in row order.
    #[serde(default)]
    pub values: Vec<RawTimestamp>,
}

/// Everything needed to lay out one time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisRequest {
    /// Series sharing the axis. The first one leads timezone resolution.
    pub series: Vec<SeriesInput>,
    /// Usable chart width in pixels.
    pub chart_width: f64,
    /// Axis granularity override; inferred from the data when absent.
    #[serde(default)]
    pub x_interval: Option<Interval>,
    /// Visible range override; the data extent when absent.
    #[serde(default)]
    pub domain: Option<TimeDomain>,
}

/// The computed axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisPlan {
    /// Effective IANA zone the ticks are aligned in.
    pub timezone: String,
    /// Timezone diagnostics raised while resolving.
    pub warnings: Vec<TimezoneWarning>,
    /// Granularity inferred from the data.
    pub data_interval: Interval,
    /// Granularity the axis was planned at (override or inferred).
    pub x_interval: Interval,
    /// Visible range.
    pub domain: TimeDomain,
    /// Tick budget derived from the chart width.
    pub max_ticks: u32,
    /// Spacing between ticks.
    pub tick_interval: Interval,
    /// Tick instants, RFC 3339 with millisecond precision in `timezone`.
    pub ticks: Vec<String>,
}

/// Plan the time axis for `request`.
///
/// Errors:
/// - [`AxisError::NoSeries`] when there is nothing to plot
/// - [`AxisError::UnknownTimezone`] when the resolved zone is not an IANA zone
/// - [`AxisError::NotTimeseries`] when the first series' x column is categorical
/// - [`AxisError::EmptyDomain`] when no domain is given and no value parses
pub fn plan_axis(request: &AxisRequest, config: &AxisConfig) -> Result<AxisPlan, AxisError> {
    let Some(first) = request.series.first() else {
        return Err(AxisError::NoSeries);
    };

    let zones: Vec<SeriesTimezoneInfo> = request.series.iter().map(|s| s.timezone.clone()).collect();
    let mut warnings = Vec::new();
    let timezone = resolve_timezone_or(&zones, &config.default_timezone, |w| warnings.push(w));
    let tz = parse_tz(&timezone)?;

    if !is_timeseries_dimension(&first.column, first.values.first()) {
        return Err(AxisError::NotTimeseries(first.column.name.clone()));
    }

    let samples: Vec<RawTimestamp> = request
        .series
        .iter()
        .flat_map(|s| s.values.iter().cloned())
        .collect();
    let units: Vec<_> = request.series.iter().map(|s| s.column.unit).collect();
    let data_interval = infer_granularity(&samples, finest_unit(&units)).interval();
    let x_interval = request.x_interval.unwrap_or(data_interval);

    let domain = match request.domain {
        Some(domain) => domain,
        None => data_extent(&samples).ok_or(AxisError::EmptyDomain)?,
    };

    let max_ticks = max_tick_count(request.chart_width, config.min_pixels_per_tick);
    let tick_interval = select_tick_interval(x_interval, &domain, max_ticks).interval();
    // validated configs always carry a weekday; fall back for hand-built ones
    let week_start = config.week_start().unwrap_or(DEFAULT_WEEK_START);
    let ticks: Vec<String> = generate_ticks_with(&domain, tick_interval, tz, week_start)
        .iter()
        .map(to_rfc3339_millis)
        .collect();

    info!(
        %timezone,
        %data_interval,
        %tick_interval,
        ticks = ticks.len(),
        "planned time axis"
    );
    Ok(AxisPlan {
        timezone,
        warnings,
        data_interval,
        x_interval,
        domain,
        max_ticks,
        tick_interval,
        ticks,
    })
}

/// Smallest domain covering every sample that parses.
pub fn data_extent(samples: &[RawTimestamp]) -> Option<TimeDomain> {
    let parser = IsoTimestampParser;
    let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    for raw in samples {
        let Ok(t) = parser.parse(raw) else {
            debug!(%raw, "skipping unparsable sample in extent");
            continue;
        };
        let t = t.with_timezone(&Utc);
        bounds = Some(match bounds {
            None => (t, t),
            Some((lo, hi)) => (lo.min(t), hi.max(t)),
        });
    }
    bounds.map(|(lo, hi)| TimeDomain::new(lo, hi))
}
