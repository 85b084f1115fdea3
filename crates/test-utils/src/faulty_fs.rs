use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{anyhow, Result};
use tom::fs::mock::MockFileSystem;
use tom::fs::paths::normalize;
use tom::fs::FileSystem;

/// A [`MockFileSystem`] where chosen paths cannot be read or removed, like
/// files without permissions on a real disk.
#[derive(Debug, Clone, Default)]
pub struct FaultyFileSystem {
    inner: MockFileSystem,
    unreadable: HashSet<PathBuf>,
    undeletable: HashSet<PathBuf>,
}

impl FaultyFileSystem {
    pub fn new(inner: MockFileSystem) -> Self {
        Self {
            inner,
            unreadable: HashSet::new(),
            undeletable: HashSet::new(),
        }
    }

    pub fn unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(normalize(Path::new(path)));
        self
    }

    pub fn undeletable(mut self, path: &str) -> Self {
        self.undeletable.insert(normalize(Path::new(path)));
        self
    }

    fn check_readable(&self, path: &Path) -> Result<()> {
        if self.unreadable.contains(&normalize(path)) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        Ok(())
    }
}

impl FileSystem for FaultyFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.check_readable(path)?;
        self.inner.read_to_string(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.check_readable(path)?;
        self.inner.read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.inner.write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner.is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.inner.is_symlink(path)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        self.inner.modified(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        if self.undeletable.contains(&normalize(path)) {
            return Err(anyhow!("Operation not permitted: {:?}", path));
        }
        self.inner.remove_file(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.inner.read_dir(path)
    }
}
