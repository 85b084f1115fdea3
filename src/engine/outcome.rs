// src/engine/outcome.rs

use std::path::PathBuf;

use crate::errors::TomError;

/// A product command that failed, or a target that could not be refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFailure {
    pub target: PathBuf,
    pub message: String,
}

impl From<BuildFailure> for TomError {
    fn from(f: BuildFailure) -> Self {
        TomError::Execution {
            target: f.target.display().to_string(),
            message: f.message,
        }
    }
}

/// Result of building one path and its requirement subtree.
///
/// Outcomes are combined at every join point; nothing here is shared
/// between tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Product commands this branch executed.
    pub built: usize,
    /// Something in this subtree was regenerated during the request, possibly
    /// by another branch that shared its result.
    pub changed: bool,
    /// Something in this subtree failed.
    pub failed: bool,
    /// The evaluated path itself was found up-to-date.
    pub up_to_date: bool,
    /// Failures first observed in this branch.
    pub failures: Vec<BuildFailure>,
    /// Paths that are neither on disk nor declared by any node.
    pub unknown: Vec<PathBuf>,
}

/// What a branch that waited on another branch's build learns about it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct SharedOutcome {
    pub changed: bool,
    pub failed: bool,
}

impl BuildOutcome {
    pub(crate) fn unknown(path: PathBuf) -> Self {
        Self {
            unknown: vec![path],
            ..Self::default()
        }
    }

    pub(crate) fn from_shared(shared: SharedOutcome) -> Self {
        Self {
            changed: shared.changed,
            failed: shared.failed,
            ..Self::default()
        }
    }

    pub(crate) fn shared(&self) -> SharedOutcome {
        SharedOutcome {
            changed: self.changed,
            failed: self.failed,
        }
    }

    /// Fold a child's outcome into this one. `up_to_date` describes a single
    /// path and is not inherited.
    pub(crate) fn merge(&mut self, child: BuildOutcome) {
        self.built += child.built;
        self.changed |= child.changed;
        self.failed |= child.failed;
        self.failures.extend(child.failures);
        self.unknown.extend(child.unknown);
    }

    pub(crate) fn record_built(&mut self) {
        self.built += 1;
        self.changed = true;
    }

    pub(crate) fn record_failure(&mut self, target: PathBuf, message: String) {
        self.failed = true;
        self.failures.push(BuildFailure { target, message });
    }
}

/// Summary of one top-level `build` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Target as requested.
    pub target: String,
    /// Target after normalization against the scan root.
    pub path: PathBuf,
    /// Number of products generated.
    pub built: usize,
    pub up_to_date: bool,
    pub failures: Vec<BuildFailure>,
    pub unknown: Vec<PathBuf>,
}

impl BuildReport {
    pub(crate) fn new(target: &str, path: PathBuf, outcome: BuildOutcome) -> Self {
        Self {
            target: target.to_string(),
            path,
            built: outcome.built,
            up_to_date: outcome.up_to_date,
            failures: outcome.failures,
            unknown: outcome.unknown,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// The requested target itself is unknown.
    pub fn is_unknown(&self) -> bool {
        self.unknown.contains(&self.path)
    }
}
