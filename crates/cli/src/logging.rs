use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{LogOutput, LogStyle, LoggingConfig};

/// Phase 1: stderr logging while the configuration is loaded.
/// Uses RUST_LOG or `warn`.
pub fn init_tracing_basic() -> tracing::subscriber::DefaultGuard {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_default(subscriber)
}

/// Phase 2: install the global subscriber described by the configuration.
/// RUST_LOG still wins over the configured level.
pub fn init_tracing_from_config(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid logging level '{}'", config.level))?;

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match (&config.format, &config.output) {
        (LogStyle::Json, LogOutput::Stderr) => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()
        }
        (LogStyle::Json, LogOutput::File { path }) => {
            let file = open_log_file(path)?;
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Arc::new(file));
            registry.with(layer).try_init()
        }
        (LogStyle::Pretty, LogOutput::Stderr) => {
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr);
            registry.with(layer).try_init()
        }
        (LogStyle::Pretty, LogOutput::File { path }) => {
            let file = open_log_file(path)?;
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(false)
                .with_writer(Arc::new(file));
            registry.with(layer).try_init()
        }
    };

    installed.context("Failed to install tracing subscriber")
}

fn open_log_file(path: &str) -> Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file '{}'", path))
}
