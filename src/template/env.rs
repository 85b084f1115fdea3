// src/template/env.rs

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::errors::{Result, TomError};

/// Passes allowed before expansion is declared unstable.
pub const MAX_EXPANSION_PASSES: usize = 32;

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("variable pattern is valid")
});

/// Keep the UTF-8 entries of a process environment listing, usually
/// `std::env::vars_os()`. Other entries cannot appear in a command line and
/// are dropped.
pub fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| match (name.into_string(), value.into_string()) {
            (Ok(name), Ok(value)) => Some((name, value)),
            (name, _) => {
                let name = name.unwrap_or_else(|raw| raw.to_string_lossy().into_owned());
                debug!(name = %name, "skipping environment variable that is not UTF-8");
                None
            }
        })
}

/// Immutable snapshot of the variables visible to command templates.
///
/// Taken once before scanning: the process environment with the Tomfile
/// `[environment]` entries layered on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `base` (usually `utf8_vars(std::env::vars_os())`) and apply `overrides`.
    pub fn capture<B, O>(base: B, overrides: O) -> Self
    where
        B: IntoIterator<Item = (String, String)>,
        O: IntoIterator<Item = (String, String)>,
    {
        let mut vars: BTreeMap<String, String> = base.into_iter().collect();
        for (name, value) in overrides {
            debug!("{}={}", name, value);
            vars.insert(name, value);
        }
        Self { vars }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Replace `$NAME` references with their values until nothing changes.
    ///
    /// References to undefined names are left as written. Definitions that
    /// keep producing new references (`A=$B`, `B=$A`) fail after
    /// [`MAX_EXPANSION_PASSES`] passes.
    pub fn expand(&self, template: &str) -> Result<String> {
        let mut current = template.to_string();

        for _ in 0..MAX_EXPANSION_PASSES {
            let mut replaced = 0usize;
            let next = VARIABLE
                .replace_all(&current, |caps: &Captures<'_>| match self.get(&caps[1]) {
                    Some(value) => {
                        replaced += 1;
                        value.to_string()
                    }
                    None => caps[0].to_string(),
                })
                .into_owned();

            if replaced == 0 {
                return Ok(next);
            }
            current = next;
        }

        Err(TomError::Template(format!(
            "environment expansion of '{}' did not settle after {} passes",
            template, MAX_EXPANSION_PASSES
        )))
    }
}
