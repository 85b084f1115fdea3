// src/fs/paths.rs

//! Lexical path helpers shared by the scanner, the walker and the engine.
//!
//! Nothing here touches the disk: `..` is folded textually, so a path that
//! goes through a symlinked directory is not canonicalized.

use std::path::{Component, Path, PathBuf};

/// Remove `.` components and fold `name/..` pairs.
///
/// An empty result becomes `.`. Leading `..` components that cannot be
/// folded are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Directory portion of a path; `.` when the path has no parent.
pub fn dir_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve a literal from a directive against the directory of the file that
/// declares it.
pub fn resolve(declaring_file: &Path, literal: &str) -> PathBuf {
    normalize(&dir_of(declaring_file).join(literal))
}

/// Normalize a requested target against the scan root.
///
/// Absolute targets and targets already spelled under the root are only
/// normalized; anything else is taken as relative to the root.
pub fn normalize_target(root: &Path, target: &str) -> PathBuf {
    let target = Path::new(target);
    let root = normalize(root);

    if target.is_absolute() || (root != Path::new(".") && target.starts_with(&root)) {
        normalize(target)
    } else {
        normalize(&root.join(target))
    }
}

/// Root-relative string with forward slashes, used for glob matching.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let root = normalize(root);
    let path = normalize(path);

    if root == Path::new(".") {
        if path.is_absolute() {
            return None;
        }
        return Some(path.to_string_lossy().replace('\\', "/"));
    }

    path.strip_prefix(&root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}
