// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawTomfile, Tomfile};
use crate::errors::Result;
use crate::fs::FileSystem;

/// Base name of the configuration file.
pub const TOMFILE_NAME: &str = "Tomfile";

/// Load a Tomfile from a given path and return the raw `RawTomfile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawTomfile> {
    let contents = fs.read_to_string(path.as_ref())?;
    let config: RawTomfile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a Tomfile from path and validate it.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Tomfile> {
    let raw = load_from_path(fs, &path)?;
    Tomfile::try_from(raw)
}

/// Lower-case operating system identifier used to pick `Tomfile.<os>`.
///
/// macOS reports as `darwin`, like `uname -s` does.
pub fn os_id() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Locate the Tomfile for `root`: `Tomfile.<os>` wins over `Tomfile`.
pub fn find_tomfile(fs: &dyn FileSystem, root: &Path, os: &str) -> Option<PathBuf> {
    let specific = root.join(format!("{TOMFILE_NAME}.{os}"));
    if fs.is_file(&specific) {
        return Some(specific);
    }
    let generic = root.join(TOMFILE_NAME);
    if fs.is_file(&generic) {
        return Some(generic);
    }
    None
}

/// Resolve and load the configuration for a scan root.
///
/// An explicit path is loaded as is; otherwise the OS-specific lookup in
/// [`find_tomfile`] applies, and a missing Tomfile yields the defaults.
pub fn load_for_root(fs: &dyn FileSystem, root: &Path, explicit: Option<&Path>) -> Result<Tomfile> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => find_tomfile(fs, root, os_id()),
    };

    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading Tomfile");
            load_and_validate(fs, &path)
        }
        None => {
            debug!(root = %root.display(), "no Tomfile found; using defaults");
            Ok(Tomfile::default())
        }
    }
}
