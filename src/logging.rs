//! Tracing setup. The terminal belongs to the TUI, so log lines go to a file
//! in the data directory instead of stderr.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Environment variable consulted when no level was configured.
const LOG_ENV_VAR: &str = "AMPLEIT_LOG";

/// Build the filter: configured directive first, then `AMPLEIT_LOG`, then
/// `info`.
pub fn build_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .with_env_var(LOG_ENV_VAR)
            .from_env_lossy(),
    }
}

/// Install the global subscriber writing to `config.log_path()`.
pub fn init_logging(config: &AppConfig) -> Result<()> {
    fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;
    let log_path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(build_filter(config.log_level.as_deref()))
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}
