// src/engine/build.rs

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::{OnceCell, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, trace, warn};

use crate::dag::{DependencyGraph, Registry};
use crate::engine::outcome::{BuildOutcome, BuildReport, SharedOutcome};
use crate::errors::Result;
use crate::exec::{CommandExecutor, CommandJob};
use crate::fs::FileSystem;
use crate::fs::paths::normalize_target;
use crate::types::Node;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Concurrency knobs of the build engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Capacity of the execution gate (simultaneous product commands).
    pub jobs: usize,
    /// Maximum number of spawned traversal tasks alive at once.
    pub max_tasks: usize,
    /// Let branches of one request share the outcome of a common target.
    pub share_results: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            max_tasks: 64,
            share_results: true,
        }
    }
}

/// Incremental, concurrent builder over a fully populated [`Registry`].
///
/// `build` walks the requirement tree of a target as a fork-join recursion:
/// every requirement becomes its own subtask and the parent waits for all of
/// them before deciding anything about itself. Only product commands go
/// through the execution gate; traversal and staleness checks never wait on
/// it.
#[derive(Clone)]
pub struct BuildEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    root: PathBuf,
    registry: Arc<Registry>,
    graph: DependencyGraph,
    fs: Arc<dyn FileSystem>,
    executor: Arc<dyn CommandExecutor>,
    gate: Arc<Semaphore>,
    task_slots: Arc<Semaphore>,
    share_results: bool,
}

impl std::fmt::Debug for BuildEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildEngine")
            .field("root", &self.inner.root)
            .field("products", &self.inner.registry.product_count())
            .field("share_results", &self.inner.share_results)
            .finish_non_exhaustive()
    }
}

impl BuildEngine {
    pub fn new(
        root: impl Into<PathBuf>,
        registry: Arc<Registry>,
        fs: Arc<dyn FileSystem>,
        executor: Arc<dyn CommandExecutor>,
        options: BuildOptions,
    ) -> Self {
        let graph = DependencyGraph::from_registry(&registry);
        if graph.has_cycles() {
            warn!("requirement graph contains cycles; affected targets will be refused");
        }

        Self {
            inner: Arc::new(EngineInner {
                root: root.into(),
                registry,
                graph,
                fs,
                executor,
                gate: Arc::new(Semaphore::new(options.jobs.max(1))),
                task_slots: Arc::new(Semaphore::new(options.max_tasks.max(1))),
                share_results: options.share_results,
            }),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Build `target` (a path or product name, relative to the scan root).
    ///
    /// Failed commands are reported inside the [`BuildReport`]; the only
    /// error returned here is a requirement cycle reachable from the target.
    pub async fn build(&self, target: &str) -> Result<BuildReport> {
        let path = normalize_target(&self.inner.root, target);
        self.inner.graph.check_acyclic_from(&path)?;

        let session = Arc::new(Session {
            engine: Arc::clone(&self.inner),
            shared: self.inner.share_results.then(Mutex::default),
        });

        let outcome = session.build_path(path.clone()).await;
        debug!(
            request = %target,
            built = outcome.built,
            failures = outcome.failures.len(),
            "build request finished"
        );
        Ok(BuildReport::new(target, path, outcome))
    }
}

/// State of one `build` request.
struct Session {
    engine: Arc<EngineInner>,
    /// Outcome cells per path, when result sharing is enabled.
    shared: Option<Mutex<HashMap<PathBuf, Arc<OnceCell<SharedOutcome>>>>>,
}

impl Session {
    /// Build `path`, joining an in-flight build of the same path when
    /// results are shared. A joining branch contributes no count of its own.
    fn build_path(self: Arc<Self>, path: PathBuf) -> BoxFuture<BuildOutcome> {
        Box::pin(async move {
            let Some(shared) = &self.shared else {
                return Arc::clone(&self).evaluate(path).await;
            };

            let cell = {
                let mut cells = shared.lock().unwrap_or_else(|e| e.into_inner());
                Arc::clone(cells.entry(path.clone()).or_default())
            };

            let mut mine: Option<BuildOutcome> = None;
            let slot = &mut mine;
            let session = Arc::clone(&self);
            let key = path.clone();
            let summary = *cell
                .get_or_init(|| async move {
                    let outcome = session.evaluate(key).await;
                    let summary = outcome.shared();
                    *slot = Some(outcome);
                    summary
                })
                .await;

            match mine {
                Some(outcome) => outcome,
                None => {
                    trace!(path = %path.display(), "joined shared build result");
                    BuildOutcome::from_shared(summary)
                }
            }
        })
    }

    /// Decide what `path` needs, without consulting shared results.
    fn evaluate(self: Arc<Self>, path: PathBuf) -> BoxFuture<BuildOutcome> {
        Box::pin(async move {
            let exists = self.engine.fs.exists(&path);
            let node = self.engine.registry.lookup(&path).cloned();

            match (exists, node) {
                (true, None) => {
                    trace!(path = %path.display(), "existing file with no producer");
                    BuildOutcome::default()
                }
                (true, Some(node)) => self.refresh(path, node).await,
                (false, Some(node)) => self.generate(path, node).await,
                (false, None) => {
                    info!("Don't know how to build {}.", path.display());
                    BuildOutcome::unknown(path)
                }
            }
        })
    }

    /// The product exists: rebuild it if a requirement changed or its
    /// source is newer.
    async fn refresh(self: Arc<Self>, path: PathBuf, node: Arc<Node>) -> BuildOutcome {
        let mut outcome = Arc::clone(&self).build_requirements(&node).await;
        if outcome.failed {
            warn!(output = %path.display(), "not refreshing: a requirement failed");
            return outcome;
        }

        let stale = outcome.changed || self.older_than_source(&path, node.name());
        if !stale {
            info!("{} is up-to-date.", path.display());
            outcome.up_to_date = true;
            return outcome;
        }

        debug!(output = %path.display(), changed = outcome.changed, "stale; removing before rebuild");
        if let Err(err) = self.engine.fs.remove_file(&path) {
            error!(output = %path.display(), error = %err, "cannot remove stale product");
            outcome.record_failure(path, format!("cannot remove stale product: {err:#}"));
            return outcome;
        }

        let rebuilt = Arc::clone(&self).evaluate(path).await;
        outcome.merge(rebuilt);
        outcome
    }

    /// The product is missing: build requirements, then run its command.
    async fn generate(self: Arc<Self>, path: PathBuf, node: Arc<Node>) -> BuildOutcome {
        let mut outcome = Arc::clone(&self).build_requirements(&node).await;
        if outcome.failed {
            warn!(output = %path.display(), "not generating: a requirement failed");
            return outcome;
        }

        let Some(product) = node.product_for(&path) else {
            warn!(
                output = %path.display(),
                node = %node.name().display(),
                "registered node declares no product with this path"
            );
            return outcome;
        };

        let job = CommandJob {
            target: path.clone(),
            product: product.name().to_string(),
            command: product.command().to_string(),
        };

        let permit = match Arc::clone(&self.engine.gate).acquire_owned().await {
            Ok(permit) => permit,
            Err(err) => {
                outcome.record_failure(path, format!("execution gate closed: {err}"));
                return outcome;
            }
        };

        info!("Generating {}...", product.name());
        debug!("{}", job.command);

        let result = self.engine.executor.execute(&job).await;
        drop(permit);

        match result {
            Ok(()) => outcome.record_built(),
            Err(err) => {
                error!(output = %path.display(), error = %format!("{err:#}"), "command failed");
                outcome.record_failure(path, format!("{err:#}"));
            }
        }
        outcome
    }

    /// Fork one subtask per requirement and join them all.
    ///
    /// A requirement is spawned while traversal slots are free; otherwise it
    /// is built inline by the current task, which keeps the number of live
    /// tasks bounded without ever waiting on a slot.
    async fn build_requirements(self: Arc<Self>, node: &Node) -> BuildOutcome {
        let mut outcome = BuildOutcome::default();
        let mut spawned: JoinSet<BuildOutcome> = JoinSet::new();
        let mut inline: Vec<PathBuf> = Vec::new();

        for req in node.requirements() {
            match Arc::clone(&self.engine.task_slots).try_acquire_owned() {
                Ok(permit) => {
                    let session = Arc::clone(&self);
                    let req = req.clone();
                    spawned.spawn(async move {
                        let _permit = permit;
                        session.build_path(req).await
                    });
                }
                Err(_) => inline.push(req.clone()),
            }
        }

        if !inline.is_empty() {
            trace!(
                node = %node.name().display(),
                inline = inline.len(),
                "traversal slots exhausted; building inline"
            );
        }
        for req in inline {
            outcome.merge(Arc::clone(&self).build_path(req).await);
        }

        while let Some(joined) = spawned.join_next().await {
            match joined {
                Ok(child) => outcome.merge(child),
                Err(err) => {
                    error!(node = %node.name().display(), error = %err, "requirement task aborted");
                    outcome.record_failure(
                        node.name().to_path_buf(),
                        format!("requirement task aborted: {err}"),
                    );
                }
            }
        }

        outcome
    }

    /// `true` when the product is older than the file declaring it. An
    /// unreadable timestamp counts as older.
    fn older_than_source(&self, product: &Path, source: &Path) -> bool {
        let fs = &self.engine.fs;
        match (fs.modified(product), fs.modified(source)) {
            (Ok(product_time), Ok(source_time)) => product_time < source_time,
            (Err(err), _) | (_, Err(err)) => {
                warn!(output = %product.display(), error = %err, "cannot compare modification times");
                true
            }
        }
    }
}
