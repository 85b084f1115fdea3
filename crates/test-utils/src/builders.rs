#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tom::errors::Result;
use tom::fs::mock::MockFileSystem;
use tom::fs::FileSystem;
use tom::Project;

/// Builder for an in-memory source tree rooted at `.`.
///
/// ```ignore
/// let tree = SourceTreeBuilder::new()
///     .source("src/a.c", r#"// @produces "a.o" cc -c $# -o $@"#)
///     .env("CC", "gcc");
/// let project = tree.load()?;
/// ```
pub struct SourceTreeBuilder {
    fs: MockFileSystem,
    env: BTreeMap<String, String>,
}

impl SourceTreeBuilder {
    pub fn new() -> Self {
        Self {
            fs: MockFileSystem::new(),
            env: BTreeMap::new(),
        }
    }

    /// Add a source file; each string in `lines` becomes one line.
    pub fn source(self, path: &str, lines: &[&str]) -> Self {
        let mut text = lines.join("\n");
        text.push('\n');
        self.fs.add_file(path, text);
        self
    }

    /// Add an arbitrary file (an existing artifact, a header, a Tomfile).
    pub fn file(self, path: &str, content: &str) -> Self {
        self.fs.add_file(path, content);
        self
    }

    /// Add a file with raw contents, e.g. a header that is not UTF-8.
    pub fn bytes(self, path: &str, content: &[u8]) -> Self {
        self.fs.add_file(path, content);
        self
    }

    /// Variable of the base environment the Tomfile is layered on.
    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn fs(&self) -> MockFileSystem {
        self.fs.clone()
    }

    pub fn shared_fs(&self) -> Arc<dyn FileSystem> {
        Arc::new(self.fs.clone())
    }

    pub fn load(&self) -> Result<Project> {
        Project::load(
            self.shared_fs(),
            Path::new("."),
            None,
            self.env.clone(),
        )
    }
}

impl Default for SourceTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
