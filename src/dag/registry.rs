// src/dag/registry.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::types::{Node, Product};

/// Lookup from product path to the node that declares it.
///
/// Populated once, before any build starts, and only read afterwards.
/// Registering a second node for an already known product path replaces the
/// earlier owner.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    nodes: Vec<Arc<Node>>,
    by_product: HashMap<PathBuf, Arc<Node>>,
    /// Product paths in first-registration order, for stable listing.
    product_order: Vec<PathBuf>,
    defaults: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `path -> node` for every product of `node`.
    pub fn register(&mut self, node: Node) {
        let node = Arc::new(node);

        for product in node.products() {
            let path = product.path().to_path_buf();
            match self.by_product.insert(path.clone(), Arc::clone(&node)) {
                Some(previous) if !Arc::ptr_eq(&previous, &node) => {
                    warn!(
                        product = %path.display(),
                        previous = %previous.name().display(),
                        current = %node.name().display(),
                        "product declared by more than one file; last registered wins"
                    );
                }
                Some(_) => {}
                None => self.product_order.push(path),
            }
        }

        self.nodes.push(node);
    }

    /// Append `@default` targets, keeping their order.
    pub fn add_defaults<I: IntoIterator<Item = String>>(&mut self, targets: I) {
        self.defaults.extend(targets);
    }

    pub fn lookup(&self, path: &Path) -> Option<&Arc<Node>> {
        self.by_product.get(path)
    }

    pub fn is_product(&self, path: &Path) -> bool {
        self.by_product.contains_key(path)
    }

    /// Distinct nodes that own at least one registered product, in
    /// registration order.
    pub fn all_nodes(&self) -> Vec<&Arc<Node>> {
        self.nodes
            .iter()
            .filter(|node| {
                node.products().iter().any(|p| {
                    self.by_product
                        .get(p.path())
                        .is_some_and(|owner| Arc::ptr_eq(owner, node))
                })
            })
            .collect()
    }

    /// Every registered product, resolved through its current owner.
    pub fn all_products(&self) -> Vec<&Product> {
        self.product_order
            .iter()
            .filter_map(|path| self.by_product.get(path)?.product_for(path))
            .collect()
    }

    /// `(product path, owning node)` pairs in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&Path, &Arc<Node>)> {
        self.product_order
            .iter()
            .filter_map(|path| self.by_product.get(path).map(|n| (path.as_path(), n)))
    }

    /// Every scanned node, including those without products.
    pub fn scanned_nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    pub fn product_count(&self) -> usize {
        self.by_product.len()
    }
}
