use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::build::project::Project;
use crate::error::Result;
use crate::model::registry::ModelBuilderRegistry;

/// One independently launchable build. The task scheduler and configuration
/// loading behind `configure`/`run_tasks` are external collaborators; this
/// trait is the contract the model runner drives them through.
pub trait BuildUnit: Send {
    /// Root directory identifying this build within a composite.
    fn root_dir(&self) -> &Path;

    /// Evaluates the build's projects without running any tasks.
    fn configure(&mut self) -> Result<()>;

    /// Drives the build through full task execution.
    fn run_tasks(&mut self) -> Result<()>;

    /// Forces task discovery and binds deferred model rules, so model
    /// builders see a fully configured project graph even when no tasks ran.
    fn force_full_configuration(&mut self) -> Result<()>;

    /// The project a single-model request is resolved against. Only
    /// available once the build is configured.
    fn default_project(&self) -> Result<&Project>;

    /// All projects of this build, in stable order. Empty before `configure`.
    fn projects(&self) -> &[Project];

    /// Builds included in this one. Empty before `configure`.
    fn included_builds(&self) -> &[IncludedBuild];

    fn model_builders(&self) -> &ModelBuilderRegistry;
}

type BuildFactory = Arc<dyn Fn() -> Result<Box<dyn BuildUnit>> + Send + Sync>;

/// Handle to a nested build participating in a composite. Each model fetch
/// gets a freshly created build unit; launchers are never reused.
#[derive(Clone)]
pub struct IncludedBuild {
    root_dir: PathBuf,
    factory: BuildFactory,
}

impl IncludedBuild {
    pub fn new(
        root_dir: impl Into<PathBuf>,
        factory: impl Fn() -> Result<Box<dyn BuildUnit>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn create_build(&self) -> Result<Box<dyn BuildUnit>> {
        (self.factory)()
    }
}

impl fmt::Debug for IncludedBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncludedBuild")
            .field("root_dir", &self.root_dir)
            .finish()
    }
}
