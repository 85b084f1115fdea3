// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod project;
pub mod scan;
pub mod template;
pub mod types;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::cli::CliArgs;
use crate::exec::ShellExecutor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::template::utf8_vars;
pub use crate::project::{Project, RunSummary};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - Tomfile loading and the environment snapshot
/// - source collection and directive scanning
/// - the build engine with the shell executor
/// - dispatch of the requested targets
pub async fn run(args: CliArgs) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let project = Project::load(
        Arc::clone(&fs),
        &args.root,
        args.tomfile.as_deref(),
        utf8_vars(std::env::vars_os()),
    )?;

    if args.dry_run {
        print_dry_run(&project);
        return Ok(());
    }

    let mut options = project.build_options();
    if let Some(jobs) = args.jobs {
        options.jobs = jobs;
    }
    if let Some(max_tasks) = args.max_tasks {
        options.max_tasks = max_tasks;
    }
    if args.no_share {
        options.share_results = false;
    }
    if options.jobs == 0 || options.max_tasks == 0 {
        return Err(anyhow!("--jobs and --max-tasks must be at least 1"));
    }
    debug!(?options, "build options");

    let engine = project.engine(Arc::new(ShellExecutor::new()), options);
    let targets = project.targets_or_defaults(&args.targets);

    let mut stdout = std::io::stdout();
    let summary = project.run_targets(&engine, &targets, &mut stdout).await;

    if summary.succeeded() {
        Ok(())
    } else {
        Err(anyhow!(
            "{} of {} target(s) failed",
            summary.failed_targets(),
            targets.len()
        ))
    }
}

/// Simple dry-run output: every scanned node with requirements and products.
fn print_dry_run(project: &Project) {
    let registry = project.registry();
    println!("tom dry-run");
    println!("  root = {}", project.root().display());
    println!("  jobs = {}", project.config().build().jobs);
    println!();

    println!("nodes ({}):", registry.scanned_nodes().len());
    for node in registry.scanned_nodes() {
        println!("  - {}", node.name().display());
        if !node.requirements().is_empty() {
            println!("      requires: {:?}", node.requirements());
        }
        for product in node.products() {
            println!("      produces: {} -> {}", product.name(), product.path().display());
            println!("        cmd: {}", product.command());
        }
    }

    if !registry.defaults().is_empty() {
        println!();
        println!("defaults: {:?}", registry.defaults());
    }

    debug!("dry-run complete (no execution)");
}
