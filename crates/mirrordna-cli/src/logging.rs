//! Tracing subscriber setup for the CLI.

use clap::ValueEnum;
use std::io::IsTerminal;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_ENV: &str = "MIRRORDNA_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Installs a stderr subscriber.
///
/// The filter comes from `level` if given, then `MIRRORDNA_LOG`, then `warn`.
pub fn init_logging(level: Option<&str>, format: LogFormat) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_env_filter(level)?;
    let base_subscriber = Registry::default().with(filter);

    match format {
        LogFormat::Json => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Text => base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(std::io::stderr().is_terminal())
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }
    Ok(())
}

fn build_env_filter(level: Option<&str>) -> Result<EnvFilter, Box<dyn std::error::Error>> {
    if let Some(level) = level {
        return Ok(EnvFilter::try_new(level)?);
    }
    Ok(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)))
}
