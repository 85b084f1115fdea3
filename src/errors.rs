// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TomError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A candidate source file could not be read. Fatal to the whole run.
    #[error("cannot scan {}: {message}", path.display())]
    Scan { path: PathBuf, message: String },

    /// Environment expansion did not reach a fixed point.
    #[error("Template error: {0}")]
    Template(String),

    #[error("Cycle detected in requirements: {0}")]
    CycleDetected(String),

    #[error("failed to build {target}: {message}")]
    Execution { target: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TomError>;
