//! Epocha Terminal Demo
//!
//! One instant, six synchronized views:
//! - Epoch seconds (editable)
//! - Local and UTC display strings
//! - Month calendar (editable)
//! - Date and time fields (editable)
//!
//! Losing terminal focus hides the view; regaining it resynchronizes to now.

mod logging;
mod ui;

use std::error::Error;
use std::path::PathBuf;

use chrono::Weekday;
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use epocha_core::EpochError;
use epocha_session::Session;
use epocha_time::{host_zone, named_zone, SystemClock, TimeState, TimeStateConfig};
use tracing::info;

/// First column of the calendar
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum WeekStart {
    Sunday,
    Monday,
}

impl From<WeekStart> for Weekday {
    fn from(start: WeekStart) -> Self {
        match start {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "epocha", version, about = "Epoch converter with six synchronized views")]
struct Args {
    /// IANA zone for local time (default: host zone)
    #[arg(long)]
    tz: Option<String>,

    /// First day of the calendar week
    #[arg(long, value_enum, default_value_t = WeekStart::Sunday)]
    week_start: WeekStart,

    /// ISO-8601 display strings instead of the long form
    #[arg(long)]
    iso: bool,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, overridden by EPOCHA_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn time_state_config(&self) -> TimeStateConfig {
        let base = if self.iso {
            TimeStateConfig::iso()
        } else {
            TimeStateConfig::default()
        };
        TimeStateConfig {
            week_start: self.week_start.into(),
            ..base
        }
    }
}

/// Named zone, else the host zone, else UTC
fn resolve_zone(name: Option<&str>) -> Result<Tz, EpochError> {
    name.map_or_else(|| Ok(host_zone()), named_zone)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref(), &args.log_level)?;

    let zone = resolve_zone(args.tz.as_deref())?;
    let config = args.time_state_config();
    config.validate()?;

    info!(zone = zone.name(), week_start = ?config.week_start, "starting");
    let state = TimeState::with_config(zone, SystemClock, config);
    ui::run(Session::mount(state), zone.name())?;

    info!("exiting");
    Ok(())
}
