//! Axis configuration: parsing, validation, and loading.
//!
//! A small TOML file tunes the knobs the axis pipeline otherwise hard-codes:
//!
//! ```toml
//! min_pixels_per_tick = 160
//! default_timezone = "Etc/UTC"
//! week_start = "sunday"
//! ```
//!
//! Every key is optional. Unknown keys are rejected so typos surface early.
//!
//! Entrypoints:
//! - Parse + validate from a TOML string: [`load_config_str`]
//! - Parse + validate from a file path: [`load_config_path`]

use std::path::Path;

use anyhow::{Context, bail};
use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use toml::from_str;

use crate::resolver::DEFAULT_TIMEZONE;
use crate::select::MIN_PIXELS_PER_TICK;
use crate::tz::parse_tz;

/// Environment variable the binary reads a config path from.
pub const CONFIG_ENV_VAR: &str = "TIME_AXIS_CONFIG";

/// Tunables for axis planning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AxisConfig {
    /// Horizontal room each tick label needs, in pixels.
    pub min_pixels_per_tick: u32,
    /// Zone used when no series reports one.
    pub default_timezone: String,
    /// First day of the week for weekly ticks (e.g. "sunday", "monday").
    pub week_start: String,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            min_pixels_per_tick: MIN_PIXELS_PER_TICK,
            default_timezone: DEFAULT_TIMEZONE.to_string(),
            week_start: "sunday".to_string(),
        }
    }
}

impl AxisConfig {
    /// Parsed [`AxisConfig::week_start`].
    pub fn week_start(&self) -> anyhow::Result<Weekday> {
        self.week_start
            .trim()
            .parse::<Weekday>()
            .map_err(|_| anyhow::anyhow!("unknown week_start '{}'", self.week_start))
    }

    /// Parsed [`AxisConfig::default_timezone`].
    pub fn default_tz(&self) -> anyhow::Result<Tz> {
        parse_tz(&self.default_timezone).context("invalid default_timezone")
    }

    /// Check every field, trimming string values in place.
    ///
    /// Errors:
    /// - `min_pixels_per_tick` is zero
    /// - `default_timezone` is not an IANA zone
    /// - `week_start` is not a weekday name
    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.min_pixels_per_tick == 0 {
            bail!("min_pixels_per_tick must be greater than zero");
        }
        self.default_timezone = self.default_timezone.trim().to_string();
        self.default_tz()?;
        self.week_start = self.week_start.trim().to_lowercase();
        self.week_start()?;
        Ok(())
    }
}

/// Parse and validate a config from a TOML string.
///
/// Errors:
/// - TOML parse failures, including unknown keys
/// - Validation errors (see [`AxisConfig::validate`])
pub fn load_config_str(toml_str: &str) -> anyhow::Result<AxisConfig> {
    let mut cfg: AxisConfig = from_str(toml_str).context("failed to parse axis config TOML")?;
    cfg.validate().context("invalid axis config")?;
    Ok(cfg)
}

/// Read a config TOML file from disk, parse, and validate it.
///
/// See [`load_config_str`].
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<AxisConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read axis config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
