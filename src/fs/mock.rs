// src/fs/mock.rs

use super::FileSystem;
use super::paths::normalize;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Logical clock; every write advances it by one second.
    clock: u64,
}

/// In-memory filesystem.
///
/// Modification times come from a logical clock, so a file written later is
/// always strictly newer than one written earlier.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut state = MockState::default();
        // Ensure root exists
        state
            .entries
            .insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = normalize(path.as_ref());
        let mut state = self.lock();
        state.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(state.clock);
        state.entries.insert(
            path.clone(),
            MockEntry::File {
                content: content.into(),
                modified,
            },
        );
        link_into_parent(&mut state.entries, &path);
    }

    /// Bump the modification time of an existing file, like `touch`.
    pub fn touch(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = normalize(path.as_ref());
        let mut state = self.lock();
        state.clock += 1;
        let now = UNIX_EPOCH + Duration::from_secs(state.clock);
        match state.entries.get_mut(&path) {
            Some(MockEntry::File { modified, .. }) => {
                *modified = now;
                Ok(())
            }
            _ => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panic while holding the lock only happens inside a failing test.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parent_key(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Register `path` in its parent's child list, creating directories on the way up.
fn link_into_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if path == Path::new(".") || path.parent().is_none() {
        return;
    }
    let parent = parent_key(path);
    if parent == path {
        return;
    }

    if !entries.contains_key(&parent) {
        entries.insert(parent.clone(), MockEntry::Dir(Vec::new()));
        link_into_parent(entries, &parent);
    }

    if let (Some(MockEntry::Dir(children)), Some(name)) =
        (entries.get_mut(&parent), path.file_name().and_then(|n| n.to_str()))
    {
        if !children.iter().any(|c| c == name) {
            children.push(name.to_string());
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = normalize(path);
        let state = self.lock();
        match state.entries.get(&path) {
            Some(MockEntry::File { content, .. }) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let path = normalize(path);
        match self.lock().entries.get(&path) {
            Some(MockEntry::File { content, .. }) => Ok(content.clone()),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(&normalize(path))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(
            self.lock().entries.get(&normalize(path)),
            Some(MockEntry::File { .. })
        )
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(
            self.lock().entries.get(&normalize(path)),
            Some(MockEntry::Dir(_))
        )
    }

    // The mock has no links.
    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let path = normalize(path);
        match self.lock().entries.get(&path) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let path = normalize(path);
        let mut state = self.lock();
        match state.entries.get(&path) {
            Some(MockEntry::File { .. }) => {}
            Some(MockEntry::Dir(_)) => return Err(anyhow!("Is a directory: {:?}", path)),
            None => return Err(anyhow!("File not found: {:?}", path)),
        }
        state.entries.remove(&path);

        let parent = parent_key(&path);
        if let (Some(MockEntry::Dir(children)), Some(name)) = (
            state.entries.get_mut(&parent),
            path.file_name().and_then(|n| n.to_str()),
        ) {
            children.retain(|c| c != name);
        }
        Ok(())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let path = normalize(path);
        let state = self.lock();
        match state.entries.get(&path) {
            Some(MockEntry::Dir(children)) => Ok(children
                .iter()
                .map(|name| normalize(&path.join(name)))
                .collect()),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
