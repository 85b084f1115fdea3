// src/engine/mod.rs

//! Build orchestration.
//!
//! - [`build`] holds the concurrent incremental build engine.
//! - [`outcome`] defines the per-branch outcome and the per-target report.
//! - [`actions`] implements the reserved `help` and `clean` targets.

pub mod actions;
pub mod build;
pub mod outcome;

pub use actions::{clean, list_targets, CleanOutcome, TargetListing};
pub use build::{BuildEngine, BuildOptions};
pub use outcome::{BuildFailure, BuildOutcome, BuildReport};

/// Targets handled outside the build engine.
pub const HELP_TARGET: &str = "help";
pub const CLEAN_TARGET: &str = "clean";

/// Target used when neither the command line nor any `@default` names one.
pub const FALLBACK_TARGET: &str = "main";
