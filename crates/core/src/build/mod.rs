//! Build domain: projects, build units, included builds, controllers.

pub mod controller;
pub mod manifest;
pub mod project;
pub mod unit;

pub use controller::BuildController;
pub use manifest::{BuildManifest, ManifestBuild, ProjectDecl, MANIFEST_FILE_NAME};
pub use project::Project;
pub use unit::{BuildUnit, IncludedBuild};
