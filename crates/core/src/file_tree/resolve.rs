use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::file_tree::filter::TreeFilter;
use crate::file_tree::source::TreeSource;
use crate::file_tree::visitor::{FileEntry, FileVisitor};
use crate::file_tree::FileTree;

/// Opaque handle to a task that produces part of a file tree. Used for build
/// ordering; never carries file contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskRef {
    path: String,
}

impl TaskRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// A leaf tree produced by content resolution: the underlying source plus the
/// stack of filters to apply while walking it.
#[derive(Clone)]
pub struct ResolvedTree {
    source: Arc<dyn TreeSource>,
    filters: Vec<Arc<TreeFilter>>,
}

impl ResolvedTree {
    pub(crate) fn new(source: Arc<dyn TreeSource>) -> Self {
        Self {
            source,
            filters: Vec::new(),
        }
    }

    pub(crate) fn matching(mut self, filter: Arc<TreeFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn display_name(&self) -> &str {
        self.source.display_name()
    }

    pub fn built_by(&self) -> &[TaskRef] {
        self.source.built_by()
    }

    /// Walks the source, reporting only entries that pass every filter.
    pub fn visit(&self, visitor: &mut dyn FileVisitor) -> Result<()> {
        if self.filters.is_empty() {
            return self.source.visit(visitor);
        }
        let mut filtering = FilteringVisitor {
            inner: visitor,
            filters: &self.filters,
        };
        self.source.visit(&mut filtering)
    }
}

impl fmt::Debug for ResolvedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedTree")
            .field("source", &self.source.display_name())
            .field("filters", &self.filters.len())
            .finish()
    }
}

struct FilteringVisitor<'a> {
    inner: &'a mut dyn FileVisitor,
    filters: &'a [Arc<TreeFilter>],
}

impl FilteringVisitor<'_> {
    fn accepts(&self, entry: &FileEntry) -> bool {
        self.filters.iter().all(|f| f.matches(&entry.relative_path))
    }
}

impl FileVisitor for FilteringVisitor<'_> {
    fn visit_dir(&mut self, entry: &FileEntry) -> Result<()> {
        if self.accepts(entry) {
            self.inner.visit_dir(entry)?;
        }
        Ok(())
    }

    fn visit_file(&mut self, entry: &FileEntry) -> Result<()> {
        if self.accepts(entry) {
            self.inner.visit_file(entry)?;
        }
        Ok(())
    }
}

/// Transient, single-use context that flattens a composite tree into its
/// ordered leaf trees without touching the file system.
#[derive(Debug, Default)]
pub struct ContentResolveContext {
    trees: Vec<ResolvedTree>,
}

impl ContentResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks a tree to resolve itself into this context.
    pub fn add(&mut self, tree: &FileTree) {
        tree.resolve_contents(self);
    }

    pub fn add_leaf(&mut self, tree: ResolvedTree) {
        self.trees.push(tree);
    }

    /// Spawns a fresh context for resolving a nested composite in isolation.
    pub fn new_context(&self) -> ContentResolveContext {
        ContentResolveContext::new()
    }

    /// Terminal operation: everything added so far, in insertion order.
    pub fn into_trees(self) -> Vec<ResolvedTree> {
        self.trees
    }
}

/// Transient context that records which tasks must run before a tree's
/// contents exist. Never enumerates files.
#[derive(Debug, Default)]
pub struct DependencyResolveContext {
    tasks: Vec<TaskRef>,
}

impl DependencyResolveContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tree: &FileTree) {
        tree.resolve_dependencies(self);
    }

    pub fn add_task(&mut self, task: TaskRef) {
        if !self.tasks.contains(&task) {
            self.tasks.push(task);
        }
    }

    pub fn tasks(&self) -> &[TaskRef] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<TaskRef> {
        self.tasks
    }
}
