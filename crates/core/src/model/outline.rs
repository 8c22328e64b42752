use serde_json::json;
use std::path::Path;

use crate::build::project::Project;
use crate::build::unit::BuildUnit;
use crate::error::Result;
use crate::file_tree::{DirectoryTree, EntryCollector, FileTree, TreeFilter};
use crate::model::builder::{Model, ModelBuilder};

/// Name of the built-in project outline model.
pub const OUTLINE_MODEL: &str = "tessera.outline";

/// Built-in builder describing a project's layout: its identity plus the
/// source files under its directory, discovered through a filtered file tree.
pub struct ProjectOutlineBuilder;

fn is_source_entry(path: &Path) -> bool {
    !path.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        name.starts_with('.') || name == "target"
    })
}

fn outline_for(project: &Project) -> Result<Model> {
    let tree = FileTree::from_source(DirectoryTree::new(&project.dir))
        .matching(TreeFilter::predicate(is_source_entry));
    let mut collector = EntryCollector::default();
    tree.visit(&mut collector)?;

    let files: Vec<String> = collector
        .files
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    Ok(json!({
        "name": project.name,
        "path": project.path,
        "dir": project.dir.to_string_lossy(),
        "source_files": files,
    }))
}

impl ModelBuilder for ProjectOutlineBuilder {
    fn can_build(&self, model_name: &str) -> bool {
        model_name == OUTLINE_MODEL
    }

    fn build(&self, _model_name: &str, project: &Project) -> Result<Model> {
        outline_for(project)
    }

    fn is_multi_project_aware(&self) -> bool {
        true
    }

    fn build_all_projects(
        &self,
        _model_name: &str,
        build: &dyn BuildUnit,
        models: &mut Vec<(String, Model)>,
    ) -> Result<()> {
        for project in build.projects() {
            models.push((project.path.clone(), outline_for(project)?));
        }
        Ok(())
    }
}
