use anyhow::Result;
use std::fs::File;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, fmt, prelude::*, registry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::time::{LocalDateTime, LocalTimeOnly};

/// Initialize the logger based on command-line arguments.
pub fn init_logger(cli_args: &Cli) -> Result<()> {
    let console_fmt = fmt::layer()
        .with_target(false)
        .with_timer(LocalTimeOnly)
        .with_writer(std::io::stderr);

    // Console log filter
    let console_filter = Targets::new()
        .with_default(LevelFilter::OFF)
        .with_target("hostca", cli_args.log_level.to_level_filter());

    if cli_args.quiet {
        // Quiet mode: suppress all logs except errors
        registry()
            .with(console_fmt.with_filter(LevelFilter::ERROR))
            .init();
        return Ok(());
    }

    if !cli_args.log_file {
        registry()
            .with(console_fmt.with_filter(console_filter))
            .init();
        return Ok(());
    }

    // Determine log file path
    let log_file_path = cli_args
        .log_file_path
        .clone()
        .unwrap_or_else(|| cli_args.root.join("hostca.log"));

    // Open log file in append mode
    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    let file_fmt = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_timer(LocalDateTime)
        .with_writer(file);

    registry()
        .with(console_fmt.with_filter(console_filter))
        .with(file_fmt.with_filter(LevelFilter::ERROR))
        .init();

    Ok(())
}
