// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `tom`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tom",
    version,
    about = "Build from directives embedded in the source files.",
    long_about = None
)]
pub struct CliArgs {
    /// Targets to build, in order. `help` lists targets, `clean` removes
    /// generated products.
    ///
    /// Default: the `@default` targets, or `main` if there are none.
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Directory to scan for sources (and to look for a Tomfile in).
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Explicit Tomfile; skips the `Tomfile.<os>` / `Tomfile` lookup.
    #[arg(long, value_name = "PATH")]
    pub tomfile: Option<PathBuf>,

    /// Number of product commands allowed to run at the same time.
    ///
    /// Overrides `[build].jobs`.
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Upper bound on concurrently spawned traversal tasks.
    ///
    /// Overrides `[build].max_tasks`.
    #[arg(long, value_name = "N")]
    pub max_tasks: Option<usize>,

    /// Evaluate shared requirements once per branch instead of once per
    /// request.
    #[arg(long)]
    pub no_share: bool,

    /// Scan and print nodes, products and commands without building.
    #[arg(long)]
    pub dry_run: bool,

    /// Show expanded commands and environment (debug level).
    #[arg(short, long)]
    pub verbose: bool,

    /// Show everything, including per-file scan results (trace level).
    #[arg(short, long)]
    pub debug: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// Takes precedence over `-v`/`-d` and `TOM_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// Level requested by flags, if any.
    pub fn requested_level(&self) -> Option<LogLevel> {
        if self.log_level.is_some() {
            self.log_level
        } else if self.debug {
            Some(LogLevel::Trace)
        } else if self.verbose {
            Some(LogLevel::Debug)
        } else {
            None
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
