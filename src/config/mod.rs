// src/config/mod.rs

//! Tomfile loading and validation.
//!
//! - [`model`] is the TOML-backed data model.
//! - [`loader`] finds (`Tomfile.<os>` before `Tomfile`) and reads the file.
//! - [`validate`] turns a `RawTomfile` into a checked `Tomfile`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{find_tomfile, load_and_validate, load_for_root, load_from_path, os_id};
pub use model::{BuildSection, EnvValue, RawTomfile, ScanSection, Tomfile, DEFAULT_INCLUDE};
