//! Logging bootstrap.
//!
//! The subscriber is mandatory wiring: bootstrap treats a failure here as
//! fatal rather than running without structured logs.

use std::str::FromStr;

use anyhow::{anyhow, Context};
use tracing::Level;

use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};

/// Install the global tracing subscriber according to settings.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let level = Level::from_str(&settings.level)
        .map_err(|_| anyhow!("unsupported log level '{}'", settings.level))?;

    let builder = tracing_subscriber::fmt().with_max_level(level);

    match settings.log_format {
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| "failed to install json log subscriber")?,
        LogFormat::Pretty => builder
            .try_init()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| "failed to install log subscriber")?,
    }

    Ok(())
}
