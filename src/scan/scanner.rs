// src/scan/scanner.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use crate::errors::{Result, TomError};
use crate::fs::FileSystem;
use crate::fs::paths::resolve;
use crate::scan::directive::{parse_directives, Directive};
use crate::template::{Templater, TokenContext};
use crate::types::{Node, Product};

/// Everything one source file contributes to the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub node: Node,
    /// Targets named by `@default`, in order of appearance.
    pub defaults: Vec<String>,
}

/// Reads source files and turns their directives into [`Node`]s.
#[derive(Debug, Clone)]
pub struct Scanner {
    fs: Arc<dyn FileSystem>,
    templater: Templater,
}

impl Scanner {
    pub fn new(fs: Arc<dyn FileSystem>, templater: Templater) -> Self {
        Self { fs, templater }
    }

    /// Scan one file. A read failure is a [`TomError::Scan`].
    ///
    /// Directives are ASCII, so bytes that are not UTF-8 (a Latin-1 comment,
    /// say) are decoded lossily instead of failing the file.
    pub fn scan(&self, path: &Path) -> Result<ScannedFile> {
        let bytes = self.fs.read(path).map_err(|e| TomError::Scan {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        })?;
        let text = String::from_utf8_lossy(&bytes);
        scan_text(path, &text, &self.templater)
    }
}

/// Build a node from already-loaded text.
///
/// Requirements are collected from the whole file before any command is
/// rendered, so `$^` always sees the complete list.
pub fn scan_text(path: &Path, text: &str, templater: &Templater) -> Result<ScannedFile> {
    let mut requirements: Vec<PathBuf> = Vec::new();
    let mut declared: Vec<(String, String)> = Vec::new();
    let mut defaults = Vec::new();

    for directive in parse_directives(text) {
        match directive {
            Directive::Requires(lits) => {
                requirements.extend(lits.iter().map(|lit| resolve(path, lit)));
            }
            Directive::Produces { name, command } => declared.push((name, command)),
            Directive::Default(names) => defaults.extend(names),
        }
    }

    let mut products = Vec::with_capacity(declared.len());
    for (name, raw) in declared {
        let output = resolve(path, &name);
        let ctx = TokenContext {
            source: path,
            requirements: &requirements,
            output: &output,
        };
        let command = templater.render(&raw, &ctx).map_err(|e| TomError::Scan {
            path: path.to_path_buf(),
            message: format!("product '{}': {}", name, e),
        })?;
        products.push(Product::new(name, output, command));
    }

    let node = Node::new(path, requirements, products);
    trace!(
        node = %node.name().display(),
        requirements = ?node.requirements(),
        products = node.products().len(),
        "node scanned"
    );

    Ok(ScannedFile { node, defaults })
}
