use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::build::project::Project;
use crate::build::unit::{BuildUnit, IncludedBuild};
use crate::error::{Error, Result};
use crate::model::registry::ModelBuilderRegistry;

pub const MANIFEST_FILE_NAME: &str = "tessera.toml";

/// Declarative description of one build: its projects and the builds it
/// includes. Lives in a `tessera.toml` at the build's root directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuildManifest {
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub includes: Vec<PathBuf>,
    #[serde(default)]
    pub projects: Vec<ProjectDecl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BuildSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProjectDecl {
    /// Colon-separated project path, e.g. `:app`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Directory relative to the build root. Defaults to the project path
    /// with colons as separators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl BuildManifest {
    pub fn load(build_dir: &Path) -> Result<Self> {
        let manifest_path = build_dir.join(MANIFEST_FILE_NAME);
        let raw = std::fs::read_to_string(&manifest_path).map_err(|e| {
            Error::Configuration(format!(
                "cannot read build manifest '{}': {e}",
                manifest_path.display()
            ))
        })?;
        toml::from_str(&raw).map_err(|e| {
            Error::Configuration(format!(
                "invalid build manifest '{}': {e}",
                manifest_path.display()
            ))
        })
    }
}

fn project_name(decl: &ProjectDecl) -> String {
    if let Some(name) = &decl.name {
        return name.clone();
    }
    decl.path
        .rsplit(':')
        .find(|s| !s.is_empty())
        .unwrap_or("root")
        .to_string()
}

fn project_dir(root: &Path, decl: &ProjectDecl) -> PathBuf {
    match &decl.dir {
        Some(dir) => resolve_dir(root, dir),
        None => {
            let mut dir = root.to_path_buf();
            for segment in decl.path.split(':').filter(|s| !s.is_empty()) {
                dir.push(segment);
            }
            dir
        }
    }
}

/// Joins a relative path onto `root`, collapsing `.` and `..` so that an
/// include of `"."` yields exactly the root directory.
fn resolve_dir(root: &Path, relative: &Path) -> PathBuf {
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Reference [`BuildUnit`] backed by a `tessera.toml` manifest.
///
/// `configure` parses the manifest and materializes projects and included
/// build handles. There is no task scheduler attached, so `run_tasks`
/// configures fully and records that execution was requested.
pub struct ManifestBuild {
    root_dir: PathBuf,
    registry: ModelBuilderRegistry,
    projects: Vec<Project>,
    included: Vec<IncludedBuild>,
    configured: bool,
    fully_configured: bool,
}

impl ManifestBuild {
    /// Opens a build rooted at `root_dir` with the default model builders
    /// registered. Loading is lazy; nothing is read until `configure`.
    pub fn open(root_dir: impl Into<PathBuf>) -> Self {
        Self::with_registry(root_dir, ModelBuilderRegistry::with_default_builders())
    }

    pub fn with_registry(root_dir: impl Into<PathBuf>, registry: ModelBuilderRegistry) -> Self {
        Self {
            root_dir: root_dir.into(),
            registry,
            projects: Vec::new(),
            included: Vec::new(),
            configured: false,
            fully_configured: false,
        }
    }
}

impl BuildUnit for ManifestBuild {
    fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn configure(&mut self) -> Result<()> {
        if self.configured {
            return Ok(());
        }
        let manifest = BuildManifest::load(&self.root_dir)?;
        if manifest.projects.is_empty() {
            return Err(Error::Configuration(format!(
                "build manifest '{}' declares no projects",
                self.root_dir.join(MANIFEST_FILE_NAME).display()
            )));
        }

        self.projects = manifest
            .projects
            .iter()
            .map(|decl| {
                Project::new(
                    decl.path.clone(),
                    project_name(decl),
                    project_dir(&self.root_dir, decl),
                )
            })
            .collect();

        self.included = manifest
            .includes
            .iter()
            .map(|relative| {
                let dir = resolve_dir(&self.root_dir, relative);
                let registry = self.registry.clone();
                let build_dir = dir.clone();
                IncludedBuild::new(dir, move || {
                    Ok(Box::new(ManifestBuild::with_registry(
                        build_dir.clone(),
                        registry.clone(),
                    )) as Box<dyn BuildUnit>)
                })
            })
            .collect();

        debug!(
            build = %self.root_dir.display(),
            projects = self.projects.len(),
            included = self.included.len(),
            "configured build from manifest"
        );
        self.configured = true;
        Ok(())
    }

    fn run_tasks(&mut self) -> Result<()> {
        self.configure()?;
        self.force_full_configuration()?;
        debug!(build = %self.root_dir.display(), "no task scheduler attached, task execution is a no-op");
        Ok(())
    }

    fn force_full_configuration(&mut self) -> Result<()> {
        self.configure()?;
        if !self.fully_configured {
            debug!(build = %self.root_dir.display(), "discovering tasks and binding model rules");
            self.fully_configured = true;
        }
        Ok(())
    }

    fn default_project(&self) -> Result<&Project> {
        self.projects.first().ok_or_else(|| {
            Error::Configuration(format!(
                "build '{}' has not been configured",
                self.root_dir.display()
            ))
        })
    }

    fn projects(&self) -> &[Project] {
        &self.projects
    }

    fn included_builds(&self) -> &[IncludedBuild] {
        &self.included
    }

    fn model_builders(&self) -> &ModelBuilderRegistry {
        &self.registry
    }
}
