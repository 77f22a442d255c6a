//! Log setup
//!
//! The terminal is in raw mode while the demo runs, so logs only go to a
//! file.

use std::error::Error;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides `--log-level`
pub const LOG_ENV: &str = "EPOCHA_LOG";

/// Install the subscriber. Without a log file nothing is installed.
pub fn init(log_file: Option<&Path>, level: &str) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let filter = filter(level)?;
    let file = File::create(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| err.to_string())?;

    Ok(())
}

fn filter(level: &str) -> Result<EnvFilter, Box<dyn Error>> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(level)?),
    }
}
