// src/logging.rs

//! Logging for `tom`, on `tracing` + `tracing-subscriber`.
//!
//! The filter is taken from, in order:
//! 1. `--log-level`, else `-d` (trace) / `-v` (debug) on the command line
//! 2. the `TOM_LOG` environment variable, in `EnvFilter` syntax
//!    (`debug`, `tom::engine=trace`, ...)
//! 3. `info`
//!
//! Everything is written to STDERR; stdout carries only `help` listings and
//! dry-run output.

use anyhow::{anyhow, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding the default filter.
pub const LOG_ENV: &str = "TOM_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::default().add_directive(level_filter(level).into()),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    // Module paths only help once commands and scan results are shown.
    let verbose = filter
        .max_level_hint()
        .is_some_and(|hint| hint >= LevelFilter::DEBUG);

    fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("cannot install log subscriber: {e}"))
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}
