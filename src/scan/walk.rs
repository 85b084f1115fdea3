// src/scan/walk.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::config::ScanSection;
use crate::fs::FileSystem;
use crate::fs::paths::{normalize, relative_str};

/// Compiled include/exclude patterns deciding which files get scanned.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl SourceFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: build_globset(include)?,
            exclude: build_globset(exclude)?,
        })
    }

    pub fn from_section(section: &ScanSection) -> Result<Self> {
        Self::new(&section.include, &section.exclude)
    }

    /// `rel` is root-relative with forward slashes.
    pub fn matches(&self, rel: &str) -> bool {
        self.include.is_match(rel) && !self.exclude.is_match(rel)
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)
            .with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Collect all files under `root` accepted by `filter`, sorted.
///
/// Symlinked directories are not descended into; symlinked files are kept.
pub fn collect_sources(
    fs: &dyn FileSystem,
    root: &Path,
    filter: &SourceFilter,
) -> Result<Vec<PathBuf>> {
    let root = normalize(root);
    let mut files = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            let path = normalize(&path);
            if fs.is_symlink(&path) && fs.is_dir(&path) {
                debug!(path = %path.display(), "not following symlinked directory");
                continue;
            }
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Some(rel) = relative_str(&root, &path) {
                    if filter.matches(&rel) {
                        files.push(path);
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}
