//! Subscriber setup for binaries.
//!
//! The library itself only emits `tracing` events. Call [`init_logging`] once
//! at startup to print them. Output goes to stderr so it never interleaves
//! with pick prompts or results on stdout. `RUST_LOG` overrides the
//! configured level.

use tracing::Subscriber;
use tracing_subscriber::{fmt, fmt::MakeWriter, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{DraftError, Result};

/// Install the global subscriber described by `config`, writing to stderr
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    tracing::subscriber::set_global_default(build_subscriber(config, std::io::stderr))
        .map_err(|e| {
            DraftError::Configuration(format!("Failed to install log subscriber: {e}"))
        })?;

    tracing::debug!(app = %config.app_name, "Logging initialized");
    Ok(())
}

fn build_subscriber<W>(config: &LoggingConfig, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_format {
        Box::new(registry.with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(writer),
        ))
    } else {
        Box::new(registry.with(fmt::layer().with_target(false).with_writer(writer)))
    }
}
