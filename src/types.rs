// src/types.rs

//! Scanned build metadata: one [`Node`] per source file, one [`Product`] per
//! `@produces` directive. Both are immutable once the scanner hands them out.

use std::path::{Path, PathBuf};

/// A buildable artifact declared by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    name: String,
    path: PathBuf,
    command: String,
}

impl Product {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            command: command.into(),
        }
    }

    /// Name as written in the directive (unresolved).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output path, resolved against the declaring file's directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fully expanded command line.
    pub fn command(&self) -> &str {
        &self.command
    }
}

/// A scanned source file with its declared requirements and products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: PathBuf,
    requirements: Vec<PathBuf>,
    products: Vec<Product>,
}

impl Node {
    pub fn new(name: impl Into<PathBuf>, requirements: Vec<PathBuf>, products: Vec<Product>) -> Self {
        Self {
            name: name.into(),
            requirements,
            products,
        }
    }

    /// Path of the source file as scanned. This is the node's identity.
    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Resolved requirement paths, in order of appearance (duplicates kept).
    pub fn requirements(&self) -> &[PathBuf] {
        &self.requirements
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The product whose resolved path is `path`, if this node declares one.
    pub fn product_for(&self, path: &Path) -> Option<&Product> {
        self.products.iter().find(|p| p.path() == path)
    }
}
