use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A project within a single build, identified by its colon-separated path
/// (`:app`, `:sibling:core`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub path: String,
    pub name: String,
    pub dir: PathBuf,
}

impl Project {
    pub fn new(path: impl Into<String>, name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
