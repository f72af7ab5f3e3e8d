//! Granularity inference from raw sample timestamps.
//!
//! Data bucketed at granularity G agrees on every signature finer than G and
//! disagrees somewhere at G itself. The scan below keeps one reference
//! signature per table position and a shrinking upper bound: once a sample
//! disagrees at position `i`, nothing at or above `i` needs checking again.

use tracing::{debug, warn};

use crate::granularity::Granularity;
use crate::parse::{IsoTimestampParser, RawTimestamp, TimestampParser};
use crate::unit::DateTimeUnit;

/// Infer the granularity of `samples` with the default ISO-8601 parser.
///
/// See [`infer_granularity_with`].
pub fn infer_granularity(samples: &[RawTimestamp], declared: Option<DateTimeUnit>) -> Granularity {
    infer_granularity_with(&IsoTimestampParser, samples, declared)
}

/// Infer the granularity of `samples`.
///
/// - A declared unit with a table position wins outright.
/// - Zero or one sample carries no signal and yields [`Granularity::Day1`].
/// - Otherwise the result is one position finer than the first position at
///   which any sample disagrees with the first; with no disagreement at all it
///   is the coarsest entry.
///
/// A sample the parser rejects disagrees everywhere, which drives the result
/// to [`Granularity::SubSecond`].
pub fn infer_granularity_with<P: TimestampParser + ?Sized>(
    parser: &P,
    samples: &[RawTimestamp],
    declared: Option<DateTimeUnit>,
) -> Granularity {
    if let Some(g) = declared.and_then(Granularity::for_unit) {
        return g;
    }
    if samples.len() <= 1 {
        return Granularity::Day1;
    }

    let table = &Granularity::TABLE;
    let mut references: [Option<i64>; Granularity::TABLE.len()] = [None; Granularity::TABLE.len()];
    let mut upper = table.len();

    for raw in samples {
        if upper == 0 {
            break;
        }
        let t = match parser.parse(raw) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "sample does not parse, treating as non-matching");
                upper = 0;
                break;
            }
        };
        let mut i = 0;
        while i < upper {
            let sig = table[i].signature(&t);
            match references[i] {
                None => references[i] = Some(sig),
                Some(reference) if reference != sig => {
                    upper = i;
                    break;
                }
                Some(_) => {}
            }
            i += 1;
        }
    }

    // variation at position 0 leaves nothing finer to fall back to
    let inferred = table[upper.saturating_sub(1)];
    debug!(samples = samples.len(), %inferred, "inferred data granularity");
    inferred
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(values: &[&str]) -> Vec<RawTimestamp> {
        values.iter().map(|&v| RawTimestamp::from(v)).collect()
    }

    #[test]
    fn declared_unit_wins() {
        let samples = raw(&["2020-01-01T00:00:00Z", "2020-01-01T00:00:01Z"]);
        assert_eq!(
            infer_granularity(&samples, Some(DateTimeUnit::Quarter)),
            Granularity::Months3
        );
    }

    #[test]
    fn extraction_unit_falls_through_to_inference() {
        let samples = raw(&["2020-01-01T00:00:00Z", "2020-01-02T00:00:00Z"]);
        assert_eq!(
            infer_granularity(&samples, Some(DateTimeUnit::DayOfWeek)),
            Granularity::Day1
        );
    }

    #[test]
    fn empty_input_is_daily() {
        assert_eq!(infer_granularity(&[], None), Granularity::Day1);
    }

    #[test]
    fn hourly_samples() {
        let samples = raw(&[
            "2020-01-01T00:00:00Z",
            "2020-01-01T01:00:00Z",
            "2020-01-01T02:00:00Z",
        ]);
        assert_eq!(infer_granularity(&samples, None), Granularity::Hour1);
    }

    #[test]
    fn monthly_samples() {
        let samples = raw(&["2020-01-01", "2020-02-01", "2020-03-01", "2020-04-01"]);
        assert_eq!(infer_granularity(&samples, None), Granularity::Month1);
    }

    #[test]
    fn quarterly_samples() {
        let samples = raw(&["2020-01-01", "2020-04-01", "2020-07-01"]);
        assert_eq!(infer_granularity(&samples, None), Granularity::Months3);
    }

    #[test]
    fn identical_samples_are_coarsest() {
        let samples = raw(&["2000-01-01T00:00:00Z", "2000-01-01T00:00:00Z"]);
        assert_eq!(infer_granularity(&samples, None), Granularity::Years100);
    }

    #[test]
    fn unparsable_sample_clamps_to_finest() {
        let samples = raw(&["2020-01-01T00:00:00Z", "garbage", "2020-01-03T00:00:00Z"]);
        assert_eq!(infer_granularity(&samples, None), Granularity::SubSecond);
    }
}
