// src/template/mod.rs

//! Command templating.
//!
//! A raw `@produces` command goes through two steps, once, at scan time:
//! 1. [`env`]: `$NAME` references are expanded against the environment
//!    snapshot until a fixed point is reached.
//! 2. [`tokens`]: `$#`, `$~`, `$^` and `$@` are replaced literally.

pub mod env;
pub mod tokens;

use std::sync::Arc;

pub use env::{utf8_vars, Environment, MAX_EXPANSION_PASSES};
pub use tokens::{substitute_tokens, TokenContext};

use crate::errors::Result;

/// Renders raw command templates into final command lines.
#[derive(Debug, Clone, Default)]
pub struct Templater {
    env: Arc<Environment>,
}

impl Templater {
    pub fn new(env: Arc<Environment>) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn render(&self, raw: &str, ctx: &TokenContext<'_>) -> Result<String> {
        let expanded = self.env.expand(raw)?;
        Ok(substitute_tokens(&expanded, ctx))
    }
}
