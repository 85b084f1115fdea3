// src/dag/mod.rs

//! Dependency data built from scanned nodes.
//!
//! - [`registry`] maps product paths to the node declaring them.
//! - [`graph`] is the requirement graph used to refuse cyclic builds.

pub mod graph;
pub mod registry;

pub use graph::DependencyGraph;
pub use registry::Registry;
