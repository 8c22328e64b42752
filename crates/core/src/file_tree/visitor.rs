use std::path::PathBuf;

use crate::error::Result;

/// A single file system entry reported during a tree walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute location of the entry.
    pub path: PathBuf,
    /// Location relative to the root of the tree that produced it.
    pub relative_path: PathBuf,
    pub is_dir: bool,
}

impl FileEntry {
    pub fn file(path: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            relative_path: relative_path.into(),
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            relative_path: relative_path.into(),
            is_dir: true,
        }
    }
}

/// Receives entries while a file tree is walked.
///
/// Entries arrive in composition order: visiting `a.union(b)` reports all of
/// `a`'s entries before any of `b`'s, no matter how deeply the union nests.
pub trait FileVisitor {
    fn visit_dir(&mut self, entry: &FileEntry) -> Result<()>;
    fn visit_file(&mut self, entry: &FileEntry) -> Result<()>;
}

/// Visitor that records the relative paths of everything it sees.
#[derive(Debug, Default)]
pub struct EntryCollector {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

impl FileVisitor for EntryCollector {
    fn visit_dir(&mut self, entry: &FileEntry) -> Result<()> {
        self.dirs.push(entry.relative_path.clone());
        Ok(())
    }

    fn visit_file(&mut self, entry: &FileEntry) -> Result<()> {
        self.files.push(entry.relative_path.clone());
        Ok(())
    }
}
