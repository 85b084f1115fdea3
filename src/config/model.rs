// src/config/model.rs

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// Patterns scanned when the Tomfile has no `[scan].include`.
pub const DEFAULT_INCLUDE: &[&str] = &["**/*.c", "**/*.cpp", "**/*.h", "**/*.hpp"];

/// Top-level Tomfile as read from TOML, before validation.
///
/// ```toml
/// [environment]
/// cc = "gcc"
/// cflags = "-O2 $EXTRA"
///
/// [build]
/// jobs = 2
///
/// [scan]
/// include = ["**/*.c", "**/*.h"]
/// exclude = ["vendor/**"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTomfile {
    /// Variables layered over the process environment. Keys are upper-cased
    /// when the environment snapshot is taken.
    #[serde(default)]
    pub environment: BTreeMap<String, EnvValue>,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub scan: ScanSection,
}

/// Scalar accepted as an `[environment]` value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Str(s) => f.write_str(s),
            EnvValue::Int(i) => write!(f, "{i}"),
            EnvValue::Float(x) => write!(f, "{x}"),
            EnvValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Capacity of the execution gate: how many product commands may run
    /// at the same time.
    #[serde(default = "default_jobs")]
    pub jobs: usize,

    /// Upper bound on concurrently spawned traversal tasks.
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,

    /// Share the outcome of a target between branches of one build request.
    #[serde(default = "default_share_results")]
    pub share_results: bool,
}

fn default_jobs() -> usize {
    1
}

fn default_max_tasks() -> usize {
    64
}

fn default_share_results() -> bool {
    true
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            max_tasks: default_max_tasks(),
            share_results: default_share_results(),
        }
    }
}

/// `[scan]` section: which files are searched for directives.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanSection {
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_include() -> Vec<String> {
    DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect()
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: Vec::new(),
        }
    }
}

/// Validated Tomfile. Only obtainable through `TryFrom<RawTomfile>`.
#[derive(Debug, Clone)]
pub struct Tomfile {
    environment: BTreeMap<String, String>,
    build: BuildSection,
    scan: ScanSection,
}

impl Tomfile {
    pub(crate) fn new_unchecked(raw: RawTomfile) -> Self {
        let environment = raw
            .environment
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v.to_string()))
            .collect();

        Self {
            environment,
            build: raw.build,
            scan: raw.scan,
        }
    }

    /// `[environment]` entries with upper-cased keys.
    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    pub fn build(&self) -> &BuildSection {
        &self.build
    }

    pub fn scan(&self) -> &ScanSection {
        &self.scan
    }
}

impl Default for Tomfile {
    fn default() -> Self {
        Self::new_unchecked(RawTomfile::default())
    }
}
