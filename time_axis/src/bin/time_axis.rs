use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use time_axis::config::{AxisConfig, CONFIG_ENV_VAR, load_config_path};
use time_axis::select::{MAX_GENERATED_TICKS, check_tick_budget};
use time_axis::tz::{parse_tz, to_rfc3339_millis};
use time_axis::{
    AxisRequest, DateTimeUnit, Interval, RawTimestamp, TimeDomain, infer_granularity,
    max_tick_count, plan_axis, select_tick_interval,
};

#[derive(Parser)]
#[command(version, about = "Time axis planning CLI")]
struct Cli {
    /// Axis config TOML (falls back to $TIME_AXIS_CONFIG, then built-in defaults).
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Infer the bucket granularity of a list of timestamps.
    Infer {
        /// Declared column unit, e.g. "month" or "hour-of-day".
        #[arg(long)]
        unit: Option<DateTimeUnit>,
        /// Timestamps (ISO-8601 text or epoch milliseconds).
        #[arg(required = true)]
        samples: Vec<String>,
    },
    /// Print round ticks across a range, one per line.
    Ticks {
        #[command(flatten)]
        range: RangeArgs,
        /// Tick spacing, e.g. "15m", "1D", "3M".
        #[arg(long)]
        interval: Interval,
        /// IANA zone to align ticks in (defaults to the configured zone).
        #[arg(long)]
        tz: Option<String>,
        /// Refuse to print more ticks than this.
        #[arg(long, default_value_t = MAX_GENERATED_TICKS)]
        max_ticks: u64,
    },
    /// Pick the tick spacing for a range at a chart width.
    Select {
        #[command(flatten)]
        range: RangeArgs,
        /// Data granularity, e.g. "1m".
        #[arg(long)]
        interval: Interval,
        /// Chart width in pixels.
        #[arg(long)]
        width: f64,
    },
    /// Plan a whole axis from a JSON request; prints the plan as JSON.
    Plan {
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Args)]
struct RangeArgs {
    /// Range start, RFC 3339.
    #[arg(long)]
    start: DateTime<Utc>,
    /// Range end, RFC 3339.
    #[arg(long)]
    end: DateTime<Utc>,
}

impl RangeArgs {
    fn domain(&self) -> TimeDomain {
        TimeDomain::new(self.start, self.end)
    }
}

fn load_config(flag: Option<PathBuf>) -> Result<AxisConfig> {
    let path = flag.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
    match path {
        Some(p) => load_config_path(p),
        None => Ok(AxisConfig::default()),
    }
}

fn parse_sample(s: &str) -> RawTimestamp {
    match s.parse::<i64>() {
        Ok(ms) => RawTimestamp::EpochMillis(ms),
        Err(_) => RawTimestamp::from(s),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.cmd {
        Cmd::Infer { unit, samples } => {
            let samples: Vec<RawTimestamp> = samples.iter().map(|s| parse_sample(s)).collect();
            println!("{}", infer_granularity(&samples, unit));
        }
        Cmd::Ticks {
            range,
            interval,
            tz,
            max_ticks,
        } => {
            let zone = parse_tz(tz.as_deref().unwrap_or(&config.default_timezone))?;
            let week_start = config.week_start()?;
            let domain = range.domain();
            check_tick_budget(interval, &domain, max_ticks)?;
            for tick in time_axis::ticks::generate_ticks_with(&domain, interval, zone, week_start) {
                println!("{}", to_rfc3339_millis(&tick));
            }
        }
        Cmd::Select {
            range,
            interval,
            width,
        } => {
            let max_ticks = max_tick_count(width, config.min_pixels_per_tick);
            println!("{}", select_tick_interval(interval, &range.domain(), max_ticks));
        }
        Cmd::Plan { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("read axis request {}", file.display()))?;
            let request: AxisRequest =
                serde_json::from_str(&text).context("failed to parse axis request JSON")?;
            let plan = plan_axis(&request, &config)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}
