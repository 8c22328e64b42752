//! Lazy composable file trees.
//!
//! A [`FileTree`] is a description of a hierarchical file collection, not the
//! collection itself: unions and filters compose descriptions, and nothing is
//! listed until a consumer visits the tree or resolves it through a context.

pub mod filter;
pub mod resolve;
pub mod source;
pub mod visitor;

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

pub use filter::{FilterSpec, PathMatcher, PatternSet, Predicate, TreeFilter};
pub use resolve::{ContentResolveContext, DependencyResolveContext, ResolvedTree, TaskRef};
pub use source::{DirectoryTree, InMemoryTree, TreeSource};
pub use visitor::{EntryCollector, FileEntry, FileVisitor};

/// A lazily resolved, composable file tree.
///
/// Composition builds a value tree, so a tree can never contain itself and
/// resolution always terminates.
#[derive(Clone)]
pub enum FileTree {
    /// A concrete leaf source.
    Leaf(Arc<dyn TreeSource>),
    /// The ordered union of other trees. Insertion order is traversal order.
    Union(Vec<FileTree>),
    /// A filtered view of another tree.
    Filtered {
        inner: Box<FileTree>,
        filter: Arc<TreeFilter>,
    },
}

impl FileTree {
    /// A composite with zero sources. Resolves and visits successfully with
    /// no entries.
    pub fn empty() -> FileTree {
        FileTree::Union(Vec::new())
    }

    pub fn from_source(source: impl TreeSource + 'static) -> FileTree {
        FileTree::Leaf(Arc::new(source))
    }

    pub fn union_all(trees: Vec<FileTree>) -> FileTree {
        FileTree::Union(trees)
    }

    /// Returns a new tree holding the entries of `self` followed by the
    /// entries of `other`. Not deduplicated.
    pub fn union(self, other: FileTree) -> FileTree {
        FileTree::Union(vec![self, other])
    }

    /// Returns a filtered view of this tree. The receiver is untouched.
    pub fn matching(self, filter: TreeFilter) -> FileTree {
        FileTree::Filtered {
            inner: Box::new(self),
            filter: Arc::new(filter),
        }
    }

    /// A filtered tree reports its inner tree's name; a union has no single
    /// source to name.
    pub fn display_name(&self) -> String {
        match self {
            FileTree::Leaf(source) => source.display_name().to_string(),
            FileTree::Union(_) => "file tree".to_string(),
            FileTree::Filtered { inner, .. } => inner.display_name(),
        }
    }

    /// Flattens this tree into the given context.
    ///
    /// A union adds each source unchanged. A filtered tree resolves its inner
    /// tree into a nested context and re-adds every resolved leaf with the
    /// filter applied individually, so filtering distributes over union:
    /// `(a ∪ b).matching(f)` resolves to the same leaves as
    /// `a.matching(f) ∪ b.matching(f)`.
    pub fn resolve_contents(&self, context: &mut ContentResolveContext) {
        match self {
            FileTree::Leaf(source) => context.add_leaf(ResolvedTree::new(Arc::clone(source))),
            FileTree::Union(sources) => {
                for source in sources {
                    source.resolve_contents(context);
                }
            }
            FileTree::Filtered { inner, filter } => {
                let mut nested = context.new_context();
                inner.resolve_contents(&mut nested);
                for leaf in nested.into_trees() {
                    context.add_leaf(leaf.matching(Arc::clone(filter)));
                }
            }
        }
    }

    /// Records the tasks that produce this tree's contents. Filters change
    /// which files appear, not what must run first, so they are skipped over.
    pub fn resolve_dependencies(&self, context: &mut DependencyResolveContext) {
        match self {
            FileTree::Leaf(source) => {
                for task in source.built_by() {
                    context.add_task(task.clone());
                }
            }
            FileTree::Union(sources) => {
                for source in sources {
                    source.resolve_dependencies(context);
                }
            }
            FileTree::Filtered { inner, .. } => inner.resolve_dependencies(context),
        }
    }

    /// Resolves this tree and walks every leaf in composition order.
    pub fn visit(&self, visitor: &mut dyn FileVisitor) -> Result<()> {
        let mut context = ContentResolveContext::new();
        self.resolve_contents(&mut context);
        for tree in context.into_trees() {
            tree.visit(visitor)?;
        }
        Ok(())
    }

    /// A composite has no single backing file, so this is always the full
    /// recursive visit.
    pub fn visit_tree_or_backing_file(&self, visitor: &mut dyn FileVisitor) -> Result<()> {
        self.visit(visitor)
    }

    /// Identity: a composite already satisfies the file tree contract.
    pub fn as_file_tree(&self) -> &FileTree {
        self
    }
}

impl fmt::Debug for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTree::Leaf(source) => f
                .debug_tuple("FileTree::Leaf")
                .field(&source.display_name())
                .finish(),
            FileTree::Union(sources) => f
                .debug_tuple("FileTree::Union")
                .field(&sources.len())
                .finish(),
            FileTree::Filtered { inner, .. } => f
                .debug_tuple("FileTree::Filtered")
                .field(&inner.display_name())
                .finish(),
        }
    }
}
