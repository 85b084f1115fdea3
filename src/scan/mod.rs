// src/scan/mod.rs

//! Directive scanning.
//!
//! - [`walk`] picks the candidate files under the scan root.
//! - [`directive`] extracts `@requires` / `@produces` / `@default` lines.
//! - [`scanner`] resolves paths, renders commands and yields [`Node`]s.
//!
//! [`Node`]: crate::types::Node

pub mod directive;
pub mod scanner;
pub mod walk;

use std::path::PathBuf;

use tracing::debug;

pub use directive::{parse_directives, Directive};
pub use scanner::{scan_text, ScannedFile, Scanner};
pub use walk::{collect_sources, SourceFilter};

use crate::dag::Registry;
use crate::errors::Result;

/// Scan every file and register the results.
///
/// The first unreadable file aborts the whole scan: no registry is returned
/// for a partially scanned tree.
pub fn scan_all(scanner: &Scanner, files: &[PathBuf]) -> Result<Registry> {
    let mut registry = Registry::new();

    for file in files {
        let scanned = scanner.scan(file)?;
        registry.add_defaults(scanned.defaults);
        registry.register(scanned.node);
    }

    debug!(
        files = files.len(),
        products = registry.product_count(),
        "scan complete"
    );
    Ok(registry)
}
