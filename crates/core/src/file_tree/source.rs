use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::file_tree::resolve::TaskRef;
use crate::file_tree::visitor::{FileEntry, FileVisitor};

/// A leaf provider of file system entries. Resolution of a composite tree
/// bottoms out in these.
pub trait TreeSource: Send + Sync {
    fn display_name(&self) -> &str;

    /// Walks every entry of this source, relative paths rooted at the source.
    fn visit(&self, visitor: &mut dyn FileVisitor) -> Result<()>;

    /// Tasks that produce this source's contents, if any.
    fn built_by(&self) -> &[TaskRef] {
        &[]
    }
}

/// A tree rooted at a directory on disk. A missing root is an empty tree,
/// not an error. Entries are visited in sorted order so repeated walks of an
/// unchanged directory yield the same sequence.
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    root: PathBuf,
    display_name: String,
    built_by: Vec<TaskRef>,
}

impl DirectoryTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let display_name = format!("directory '{}'", root.display());
        Self {
            root,
            display_name,
            built_by: Vec::new(),
        }
    }

    pub fn built_by(mut self, task: TaskRef) -> Self {
        self.built_by.push(task);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TreeSource for DirectoryTree {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn visit(&self, visitor: &mut dyn FileVisitor) -> Result<()> {
        if !self.root.is_dir() {
            return Ok(());
        }
        for entry in walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
                .to_path_buf();
            let file_entry = FileEntry {
                path: entry.path().to_path_buf(),
                relative_path: relative,
                is_dir: entry.file_type().is_dir(),
            };
            if file_entry.is_dir {
                visitor.visit_dir(&file_entry)?;
            } else {
                visitor.visit_file(&file_entry)?;
            }
        }
        Ok(())
    }

    fn built_by(&self) -> &[TaskRef] {
        &self.built_by
    }
}

/// A tree whose entries are fixed at construction. Used by model builders
/// that describe inputs without touching disk, and by tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTree {
    display_name: String,
    entries: Vec<FileEntry>,
    built_by: Vec<TaskRef>,
}

impl InMemoryTree {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            entries: Vec::new(),
            built_by: Vec::new(),
        }
    }

    pub fn with_file(mut self, relative_path: impl Into<PathBuf>) -> Self {
        let relative_path = relative_path.into();
        self.entries
            .push(FileEntry::file(relative_path.clone(), relative_path));
        self
    }

    pub fn with_dir(mut self, relative_path: impl Into<PathBuf>) -> Self {
        let relative_path = relative_path.into();
        self.entries
            .push(FileEntry::dir(relative_path.clone(), relative_path));
        self
    }

    pub fn built_by(mut self, task: TaskRef) -> Self {
        self.built_by.push(task);
        self
    }
}

impl TreeSource for InMemoryTree {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn visit(&self, visitor: &mut dyn FileVisitor) -> Result<()> {
        for entry in &self.entries {
            if entry.is_dir {
                visitor.visit_dir(entry)?;
            } else {
                visitor.visit_file(entry)?;
            }
        }
        Ok(())
    }

    fn built_by(&self) -> &[TaskRef] {
        &self.built_by
    }
}
