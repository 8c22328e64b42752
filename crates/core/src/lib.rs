//! tessera-core - model introspection for composite builds
//!
//! This crate provides the machinery that lets external tooling ask a build
//! for a structured description of itself:
//! - Lazy, composable file trees describing build inputs without eager listing
//! - A recursive model runner that aggregates per-project models across a
//!   root build and all of its included builds
//! - The request/result surface and payload codec used at the tooling boundary

pub mod build;
pub mod error;
pub mod file_tree;
pub mod model;
pub mod runner;

// Re-export commonly used types
pub use error::{Error, Result};

pub use build::{BuildController, BuildUnit, IncludedBuild, ManifestBuild, Project};
pub use file_tree::{FileTree, FileVisitor, TreeFilter, TreeSource};
pub use model::{
    BuildAction, BuildActionResult, BuildModelAction, Model, ModelBuilder, ModelBuilderRegistry,
    PayloadSerializer, ProjectModelEntry,
};
pub use runner::{BuildActionRunner, BuildActionRunnerChain, CompositeModelRunner, Disposition};
