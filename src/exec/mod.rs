// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the `CommandExecutor` trait and `CommandJob`.
//! - [`shell`] is the production executor built on `tokio::process`.

pub mod backend;
pub mod shell;

pub use backend::{CommandExecutor, CommandJob};
pub use shell::ShellExecutor;
