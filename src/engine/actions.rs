// src/engine/actions.rs

//! The reserved `help` and `clean` targets.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use crate::dag::Registry;
use crate::engine::outcome::BuildFailure;
use crate::fs::FileSystem;

/// What `help` prints: product names per node, then the default targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetListing {
    pub products: Vec<String>,
    pub defaults: Vec<String>,
}

impl TargetListing {
    /// Lines in print order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.products
            .iter()
            .chain(self.defaults.iter())
            .map(String::as_str)
    }
}

/// Every product name of every distinct node, followed by the `@default`
/// targets. A product whose path was taken over by a later file is listed
/// under that file only.
pub fn list_targets(registry: &Registry) -> TargetListing {
    let products = registry
        .all_nodes()
        .into_iter()
        .flat_map(|node| {
            node.products()
                .iter()
                .filter(move |p| {
                    registry
                        .lookup(p.path())
                        .is_some_and(|owner| Arc::ptr_eq(owner, node))
                })
                .map(|p| p.name().to_string())
        })
        .collect();

    TargetListing {
        products,
        defaults: registry.defaults().to_vec(),
    }
}

/// What `clean` did: removed paths, and products that could not be removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOutcome {
    pub removed: Vec<PathBuf>,
    pub failures: Vec<BuildFailure>,
}

/// Delete every registered product that exists on disk.
///
/// A product that cannot be removed is logged and skipped; the others are
/// still removed. The registry itself is left untouched.
pub fn clean(registry: &Registry, fs: &dyn FileSystem) -> CleanOutcome {
    let mut outcome = CleanOutcome::default();

    for product in registry.all_products() {
        let path = product.path();
        if !fs.exists(path) {
            continue;
        }
        info!("Removing {}...", path.display());
        match fs.remove_file(path) {
            Ok(()) => outcome.removed.push(path.to_path_buf()),
            Err(err) => {
                error!(output = %path.display(), error = %format!("{err:#}"), "cannot remove product");
                outcome.failures.push(BuildFailure {
                    target: path.to_path_buf(),
                    message: format!("cannot remove product: {err:#}"),
                });
            }
        }
    }

    outcome
}
