//! Tick spacing selection under a width-derived tick budget.

use tracing::debug;

use crate::calendar::interval_length_ms;
use crate::error::AxisError;
use crate::granularity::Granularity;
use crate::interval::Interval;
use crate::ticks::TimeDomain;

/// Minimum horizontal room, in pixels, each x-axis tick label gets.
pub const MIN_PIXELS_PER_TICK: u32 = 160;

/// Default cap on ticks generated for an explicit interval.
pub const MAX_GENERATED_TICKS: u64 = 100_000;

/// Largest tick count that fits `chart_width_px` at `min_pixels_per_tick`.
///
/// Rounds down so labels never over-pack; never negative. A zero pixel
/// budget is treated as 1 pixel.
pub fn max_tick_count(chart_width_px: f64, min_pixels_per_tick: u32) -> u32 {
    let per_tick = f64::from(min_pixels_per_tick.max(1));
    let fits = (chart_width_px / per_tick).floor();
    if fits.is_nan() || fits <= 0.0 {
        0
    } else {
        // saturating float-to-int cast
        fits as u32
    }
}

/// Number of ticks `interval` would lay over `range_ms`.
pub fn expected_tick_count(interval: Interval, range_ms: i64) -> u64 {
    let spacing = interval_length_ms(interval).max(1).unsigned_abs();
    range_ms.max(0).unsigned_abs().div_ceil(spacing)
}

/// Reject an explicit `interval` that would lay more than `limit` ticks over
/// `domain`; otherwise return the expected count.
pub fn check_tick_budget(interval: Interval, domain: &TimeDomain, limit: u64) -> Result<u64, AxisError> {
    let expected = expected_tick_count(interval, domain.range_ms());
    if expected > limit {
        return Err(AxisError::TooManyTicks { expected, limit });
    }
    Ok(expected)
}

/// Pick the table entry to space ticks by.
///
/// Scans from the exact-match position of `x_interval` (the finest entry when
/// it is not in the table) towards coarser entries and returns the first whose
/// expected tick count over `domain` fits `max_ticks`. Falls back to the
/// coarsest entry.
pub fn select_tick_interval(x_interval: Interval, domain: &TimeDomain, max_ticks: u32) -> Granularity {
    let start = Granularity::position_of(x_interval).unwrap_or(0);
    let range_ms = domain.range_ms();
    let chosen = Granularity::TABLE[start..]
        .iter()
        .copied()
        .find(|g| expected_tick_count(g.interval(), range_ms) <= u64::from(max_ticks))
        .unwrap_or(Granularity::coarsest());
    debug!(%x_interval, range_ms, max_ticks, %chosen, "selected tick interval");
    chosen
}
