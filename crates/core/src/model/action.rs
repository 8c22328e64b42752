use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::builder::Model;

/// An action a tooling client asks the build system to perform. Action
/// runners dispatch on the variant and decline the ones they do not handle.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildAction {
    /// Produce a named model, optionally across the whole composite.
    Model(BuildModelAction),
    /// Execute a set of tasks without producing a model.
    ExecuteTasks { tasks: Vec<String> },
}

/// Request value object for one model fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildModelAction {
    pub model_name: String,
    /// Run the full task graph before resolving the model; otherwise only
    /// configure the projects.
    pub run_tasks: bool,
    /// Fetch models for every build in the composite, not just the root.
    pub all_models: bool,
}

impl BuildModelAction {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            run_tasks: false,
            all_models: false,
        }
    }

    pub fn run_tasks(mut self, run_tasks: bool) -> Self {
        self.run_tasks = run_tasks;
        self
    }

    pub fn all_models(mut self, all_models: bool) -> Self {
        self.all_models = all_models;
        self
    }
}

/// Result value object handed back across the tooling boundary: the payload
/// bytes plus an optional failure marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildActionResult {
    pub result: Vec<u8>,
    pub failure: Option<String>,
}

impl BuildActionResult {
    pub fn of(result: Vec<u8>) -> Self {
        Self {
            result,
            failure: None,
        }
    }

    pub fn failed(failure: impl Into<String>) -> Self {
        Self {
            result: Vec::new(),
            failure: Some(failure.into()),
        }
    }
}

/// One per-project model: which build owns the project, the project's path
/// within that build, and the model object itself. The aggregate result of a
/// composite fetch is an ordered sequence of these, root build first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectModelEntry {
    pub build_root: PathBuf,
    pub project_path: String,
    pub model: Model,
}

impl ProjectModelEntry {
    pub fn new(build_root: impl Into<PathBuf>, project_path: impl Into<String>, model: Model) -> Self {
        Self {
            build_root: build_root.into(),
            project_path: project_path.into(),
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_result_has_no_failure_marker() {
        let result = BuildActionResult::of(vec![1, 2, 3]);
        assert_eq!(result.result, vec![1, 2, 3]);
        assert!(result.failure.is_none());
    }

    #[test]
    fn failed_result_carries_the_marker_and_no_payload() {
        let result = BuildActionResult::failed("included build failed to configure");
        assert!(result.result.is_empty());
        assert_eq!(
            result.failure.as_deref(),
            Some("included build failed to configure")
        );
    }
}
