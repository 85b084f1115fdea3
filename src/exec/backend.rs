// src/exec/backend.rs

//! Pluggable command execution.
//!
//! The build engine hands every product command to a `CommandExecutor`
//! instead of spawning processes itself. Production uses
//! [`ShellExecutor`](crate::exec::ShellExecutor); tests provide an executor
//! that records commands and fabricates the outputs.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use anyhow::Result;

/// One product command, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandJob {
    /// Resolved output path of the product.
    pub target: PathBuf,
    /// Product name as declared.
    pub product: String,
    /// Fully expanded command line.
    pub command: String,
}

/// Trait abstracting how product commands are executed.
///
/// An `Err` means the command did not succeed (spawn failure or non-zero
/// exit); the engine reports it against the job's target.
pub trait CommandExecutor: Send + Sync {
    fn execute<'a>(
        &'a self,
        job: &'a CommandJob,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
