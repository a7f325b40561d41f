mod app;
mod cli;
mod config;
mod logging;

use std::io::{self, BufWriter};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use logpipe_core::RunSummary;
use tracing::debug;

use crate::cli::Cli;
use crate::config::LogpipeConfig;
use crate::logging::{init_tracing_basic, init_tracing_from_config};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match try_main(&cli) {
        Ok(summary) if summary.failed() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("logpipe: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: &Cli) -> Result<RunSummary> {
    // Phase 1: thread-local subscriber so config loading can log
    let basic_tracing = init_tracing_basic();

    let mut config = LogpipeConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate()
        .context("Configuration validation failed")?;

    // Phase 2: global subscriber from config
    drop(basic_tracing);
    init_tracing_from_config(&config.logging)?;

    debug!(input = %config.input, output = %config.output.format, "configuration loaded");

    let mut stdin = io::stdin().lock();
    let mut stdout = BufWriter::new(io::stdout().lock());
    app::run(cli, &config, &mut stdin, &mut stdout)
}
