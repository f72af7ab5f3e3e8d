//! One effective timezone across data series that may disagree.
//!
//! Each series reports the zone its results are expressed in and, optionally,
//! the zone the query asked for. Disagreements are advisory: they are handed
//! to a warning callback and resolution always returns a usable zone name.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Zone used when the first series reports none.
pub const DEFAULT_TIMEZONE: &str = "Etc/UTC";

/// Timezone metadata carried by one data series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesTimezoneInfo {
    /// Zone the results are expressed in.
    #[serde(default)]
    pub results_timezone: Option<String>,
    /// Zone the query was asked to run in.
    #[serde(default)]
    pub requested_timezone: Option<String>,
}

impl SeriesTimezoneInfo {
    /// Series whose results and request agree on `tz`.
    pub fn in_zone(tz: &str) -> Self {
        Self {
            results_timezone: Some(tz.to_string()),
            requested_timezone: Some(tz.to_string()),
        }
    }
}

/// Non-fatal diagnostics raised while resolving the timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimezoneWarning {
    /// Series report results in more than one zone.
    MultipleTimezones {
        /// Distinct zones, in first-seen order.
        timezones: Vec<String>,
    },
    /// The query ran in a different zone than requested.
    UnexpectedTimezone {
        /// Zone the query asked for.
        requested: String,
        /// Zone the results came back in, if reported.
        results: Option<String>,
    },
}

impl fmt::Display for TimezoneWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimezoneWarning::MultipleTimezones { timezones } => write!(
                f,
                "This chart contains queries run in multiple timezones: {}",
                timezones.join(", ")
            ),
            TimezoneWarning::UnexpectedTimezone { requested, results } => write!(
                f,
                "The query for this chart was run in {} rather than {requested} due to database or driver constraints.",
                results.as_deref().unwrap_or("an unknown timezone")
            ),
        }
    }
}

/// Resolve the effective timezone, falling back to [`DEFAULT_TIMEZONE`].
///
/// See [`resolve_timezone_or`].
pub fn resolve_timezone<F>(series: &[SeriesTimezoneInfo], on_warning: F) -> String
where
    F: FnMut(TimezoneWarning),
{
    resolve_timezone_or(series, DEFAULT_TIMEZONE, on_warning)
}

/// Resolve the effective timezone across `series`.
///
/// - More than one distinct reported results zone raises one
///   [`TimezoneWarning::MultipleTimezones`]. Series without a results zone
///   do not count as a distinct zone.
/// - If the first series requested a zone other than its results zone, one
///   [`TimezoneWarning::UnexpectedTimezone`] is raised.
/// - The first series' results zone wins, else `default`.
pub fn resolve_timezone_or<F>(series: &[SeriesTimezoneInfo], default: &str, mut on_warning: F) -> String
where
    F: FnMut(TimezoneWarning),
{
    let distinct: IndexSet<&str> = series
        .iter()
        .filter_map(|s| s.results_timezone.as_deref())
        .collect();
    if distinct.len() > 1 {
        let w = TimezoneWarning::MultipleTimezones {
            timezones: distinct.iter().map(|tz| tz.to_string()).collect(),
        };
        warn!(warning = %w, "timezone disagreement");
        on_warning(w);
    }

    let Some(first) = series.first() else {
        return default.to_string();
    };
    if let Some(requested) = first.requested_timezone.as_deref() {
        if first.results_timezone.as_deref() != Some(requested) {
            let w = TimezoneWarning::UnexpectedTimezone {
                requested: requested.to_string(),
                results: first.results_timezone.clone(),
            };
            warn!(warning = %w, "timezone disagreement");
            on_warning(w);
        }
    }

    first
        .results_timezone
        .clone()
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(results: Option<&str>, requested: Option<&str>) -> SeriesTimezoneInfo {
        SeriesTimezoneInfo {
            results_timezone: results.map(str::to_string),
            requested_timezone: requested.map(str::to_string),
        }
    }

    fn resolve(input: &[SeriesTimezoneInfo]) -> (String, Vec<TimezoneWarning>) {
        let mut warnings = Vec::new();
        let tz = resolve_timezone(input, |w| warnings.push(w));
        (tz, warnings)
    }

    #[test]
    fn agreeing_series_raise_nothing() {
        let (tz, warnings) = resolve(&[
            series(Some("America/Chicago"), Some("America/Chicago")),
            series(Some("America/Chicago"), None),
        ]);
        assert_eq!(tz, "America/Chicago");
        assert!(warnings.is_empty());
    }

    #[test]
    fn requested_zone_mismatch_warns_once() {
        let (tz, warnings) = resolve(&[series(Some("UTC"), Some("America/Chicago"))]);
        assert_eq!(tz, "UTC");
        assert_eq!(
            warnings,
            vec![TimezoneWarning::UnexpectedTimezone {
                requested: "America/Chicago".into(),
                results: Some("UTC".into()),
            }]
        );
    }

    #[test]
    fn multiple_zones_warn_once_and_first_wins() {
        let (tz, warnings) = resolve(&[
            series(Some("UTC"), None),
            series(Some("America/Chicago"), None),
            series(Some("UTC"), None),
        ]);
        assert_eq!(tz, "UTC");
        assert_eq!(
            warnings,
            vec![TimezoneWarning::MultipleTimezones {
                timezones: vec!["UTC".into(), "America/Chicago".into()],
            }]
        );
    }

    #[test]
    fn missing_zone_defaults_to_etc_utc() {
        let (tz, warnings) = resolve(&[series(None, None)]);
        assert_eq!(tz, DEFAULT_TIMEZONE);
        assert!(warnings.is_empty());

        let (tz, warnings) = resolve(&[]);
        assert_eq!(tz, "Etc/UTC");
        assert!(warnings.is_empty());
    }

    #[test]
    fn requested_without_results_still_warns() {
        let (tz, warnings) = resolve(&[series(None, Some("Europe/Berlin"))]);
        assert_eq!(tz, "Etc/UTC");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("Europe/Berlin"));
    }

    #[test]
    fn configured_default_is_used() {
        let tz = resolve_timezone_or(&[series(None, None)], "Europe/Paris", |_| {});
        assert_eq!(tz, "Europe/Paris");
    }

    #[test]
    fn warning_text() {
        let w = TimezoneWarning::MultipleTimezones {
            timezones: vec!["UTC".into(), "Asia/Tokyo".into()],
        };
        assert_eq!(
            w.to_string(),
            "This chart contains queries run in multiple timezones: UTC, Asia/Tokyo"
        );
    }
}
