use crate::build::project::Project;
use crate::build::unit::BuildUnit;
use crate::error::Result;

/// An in-memory model object. Builders produce arbitrary JSON-shaped graphs;
/// the core never looks inside them.
pub type Model = serde_json::Value;

/// Produces named models for projects.
///
/// The two capability checks tell the orchestrator which specialized entry
/// point a builder supports. Builders satisfying neither get the plain
/// whole-build call; that fallback is the documented default.
pub trait ModelBuilder: Send + Sync {
    fn can_build(&self, model_name: &str) -> bool;

    /// Plain capability: one model for one project.
    fn build(&self, model_name: &str, project: &Project) -> Result<Model>;

    /// Whether the builder cares which project a single-model request is
    /// resolved against.
    fn is_project_sensitive(&self) -> bool {
        false
    }

    /// Project-sensitive capability. `implicit_project` is true when the
    /// project was chosen as the build's default rather than named by the
    /// caller.
    fn build_for_project(
        &self,
        model_name: &str,
        project: &Project,
        _implicit_project: bool,
    ) -> Result<Model> {
        self.build(model_name, project)
    }

    /// Whether the builder can produce one model per project in a build.
    fn is_multi_project_aware(&self) -> bool {
        false
    }

    /// Multi-project capability: appends `(project path, model)` pairs for
    /// every project of the build. The default produces a single whole-build
    /// result keyed by the default project's path.
    fn build_all_projects(
        &self,
        model_name: &str,
        build: &dyn BuildUnit,
        models: &mut Vec<(String, Model)>,
    ) -> Result<()> {
        let project = build.default_project()?;
        let model = self.build(model_name, project)?;
        models.push((project.path.clone(), model));
        Ok(())
    }
}
