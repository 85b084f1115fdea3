// src/project.rs

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::{load_for_root, os_id, Tomfile};
use crate::dag::Registry;
use crate::engine::{
    clean, list_targets, BuildEngine, BuildOptions, BuildReport, CLEAN_TARGET, FALLBACK_TARGET,
    HELP_TARGET,
};
use crate::errors::{Result, TomError};
use crate::exec::CommandExecutor;
use crate::fs::FileSystem;
use crate::scan::{collect_sources, scan_all, Scanner, SourceFilter};
use crate::template::{Environment, Templater};

/// A scanned source tree: configuration, environment snapshot and registry.
///
/// Everything is resolved before the first build request, and nothing here
/// changes afterwards.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    config: Tomfile,
    env: Arc<Environment>,
    registry: Arc<Registry>,
}

impl Project {
    /// Load the Tomfile, snapshot the environment and scan every source.
    ///
    /// `base_env` is the environment the Tomfile's `[environment]` is
    /// layered on, normally `utf8_vars(std::env::vars_os())`. Any unreadable source aborts
    /// loading.
    pub fn load<E>(
        fs: Arc<dyn FileSystem>,
        root: &Path,
        tomfile: Option<&Path>,
        base_env: E,
    ) -> Result<Self>
    where
        E: IntoIterator<Item = (String, String)>,
    {
        debug!("Operating system is {}.", os_id());
        let config = load_for_root(fs.as_ref(), root, tomfile)?;

        let env = Arc::new(Environment::capture(
            base_env,
            config.environment().clone(),
        ));

        let filter = SourceFilter::from_section(config.scan())?;
        let files = collect_sources(fs.as_ref(), root, &filter)?;
        debug!(root = %root.display(), files = files.len(), "collected source files");

        let scanner = Scanner::new(Arc::clone(&fs), Templater::new(Arc::clone(&env)));
        let registry = Arc::new(scan_all(&scanner, &files)?);

        Ok(Self {
            root: root.to_path_buf(),
            fs,
            config,
            env,
            registry,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Tomfile {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Options from `[build]`.
    pub fn build_options(&self) -> BuildOptions {
        let build = self.config.build();
        BuildOptions {
            jobs: build.jobs,
            max_tasks: build.max_tasks,
            share_results: build.share_results,
        }
    }

    pub fn engine(&self, executor: Arc<dyn CommandExecutor>, options: BuildOptions) -> BuildEngine {
        BuildEngine::new(
            self.root.clone(),
            Arc::clone(&self.registry),
            Arc::clone(&self.fs),
            executor,
            options,
        )
    }

    /// Requested targets, else the `@default` targets, else `main`.
    pub fn targets_or_defaults(&self, requested: &[String]) -> Vec<String> {
        if !requested.is_empty() {
            requested.to_vec()
        } else if !self.registry.defaults().is_empty() {
            self.registry.defaults().to_vec()
        } else {
            vec![FALLBACK_TARGET.to_string()]
        }
    }

    /// Handle each target in order: `help`, `clean`, or a build.
    ///
    /// A failing target never stops the ones after it. `help` output goes to
    /// `out`.
    pub async fn run_targets(
        &self,
        engine: &BuildEngine,
        targets: &[String],
        out: &mut dyn Write,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        for target in targets {
            match target.as_str() {
                HELP_TARGET => {
                    info!("Listing available targets...");
                    let listing = list_targets(&self.registry);
                    for line in listing.lines() {
                        if let Err(err) = writeln!(out, "{line}") {
                            summary.errors.push(err.into());
                            break;
                        }
                    }
                }
                CLEAN_TARGET => {
                    let cleaned = clean(&self.registry, self.fs.as_ref());
                    summary.removed.extend(cleaned.removed);
                    summary
                        .errors
                        .extend(cleaned.failures.into_iter().map(TomError::from));
                }
                _ => {
                    info!("Building {}...", target);
                    match engine.build(target).await {
                        Ok(report) => {
                            for failure in &report.failures {
                                error!(
                                    output = %failure.target.display(),
                                    "{}",
                                    failure.message
                                );
                            }
                            info!("Done ({} nodes built).", report.built);
                            summary.reports.push(report);
                        }
                        Err(err) => {
                            error!(request = %target, error = %err, "build refused");
                            summary.errors.push(err);
                        }
                    }
                }
            }
        }

        summary
    }
}

/// Everything that happened across one invocation's targets.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<BuildReport>,
    pub removed: Vec<PathBuf>,
    /// Errors that stopped a single target (cycles, clean failures).
    pub errors: Vec<TomError>,
}

impl RunSummary {
    pub fn built(&self) -> usize {
        self.reports.iter().map(|r| r.built).sum()
    }

    pub fn failed_targets(&self) -> usize {
        self.reports.iter().filter(|r| !r.succeeded()).count() + self.errors.len()
    }

    pub fn succeeded(&self) -> bool {
        self.failed_targets() == 0
    }
}
