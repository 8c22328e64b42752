//! Tooling models: actions, builders, registry, and the payload codec.

pub mod action;
pub mod builder;
pub mod outline;
pub mod payload;
pub mod registry;

pub use action::{BuildAction, BuildActionResult, BuildModelAction, ProjectModelEntry};
pub use builder::{Model, ModelBuilder};
pub use outline::{ProjectOutlineBuilder, OUTLINE_MODEL};
pub use payload::PayloadSerializer;
pub use registry::ModelBuilderRegistry;
