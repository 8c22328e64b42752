use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Opaque path matching contract. Pattern syntax is supplied by the caller;
/// the file tree core only stores matchers and forwards paths to them.
pub trait PathMatcher: Send + Sync {
    fn matches(&self, relative_path: &Path) -> bool;
}

impl<F> PathMatcher for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn matches(&self, relative_path: &Path) -> bool {
        self(relative_path)
    }
}

/// Structured include/exclude matcher set.
///
/// An empty include list means "include everything". Excludes always win over
/// includes.
#[derive(Clone, Default)]
pub struct PatternSet {
    includes: Vec<Arc<dyn PathMatcher>>,
    excludes: Vec<Arc<dyn PathMatcher>>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, matcher: impl PathMatcher + 'static) -> Self {
        self.includes.push(Arc::new(matcher));
        self
    }

    pub fn exclude(mut self, matcher: impl PathMatcher + 'static) -> Self {
        self.excludes.push(Arc::new(matcher));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    pub fn matches(&self, relative_path: &Path) -> bool {
        let included = self.includes.is_empty()
            || self.includes.iter().any(|m| m.matches(relative_path));
        included && !self.excludes.iter().any(|m| m.matches(relative_path))
    }
}

impl fmt::Debug for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSet")
            .field("includes", &self.includes.len())
            .field("excludes", &self.excludes.len())
            .finish()
    }
}

/// Caller supplied filtering predicate over tree-relative paths.
pub type Predicate = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Filter applied to a file tree view. Either a caller supplied predicate or
/// a structured pattern set, never both.
#[derive(Clone)]
pub enum TreeFilter {
    Predicate(Predicate),
    Patterns(PatternSet),
}

impl TreeFilter {
    pub fn predicate(f: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        TreeFilter::Predicate(Arc::new(f))
    }

    pub fn patterns(set: PatternSet) -> Self {
        TreeFilter::Patterns(set)
    }

    pub fn matches(&self, relative_path: &Path) -> bool {
        match self {
            TreeFilter::Predicate(f) => f(relative_path),
            TreeFilter::Patterns(set) => set.matches(relative_path),
        }
    }
}

impl fmt::Debug for TreeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeFilter::Predicate(_) => f.write_str("TreeFilter::Predicate"),
            TreeFilter::Patterns(set) => f.debug_tuple("TreeFilter::Patterns").field(set).finish(),
        }
    }
}

/// Raw filter configuration as it arrives from a caller. Exactly one of the
/// two parts must be supplied; anything else is a programming error caught
/// here, before the filter ever reaches a tree.
#[derive(Clone, Default)]
pub struct FilterSpec {
    pub predicate: Option<Predicate>,
    pub patterns: Option<PatternSet>,
}

impl FilterSpec {
    pub fn with_predicate(f: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(Arc::new(f)),
            patterns: None,
        }
    }

    pub fn with_patterns(set: PatternSet) -> Self {
        Self {
            predicate: None,
            patterns: Some(set),
        }
    }

    pub fn into_filter(self) -> Result<TreeFilter> {
        match (self.predicate, self.patterns) {
            (Some(f), None) => Ok(TreeFilter::Predicate(f)),
            (None, Some(set)) => Ok(TreeFilter::Patterns(set)),
            (Some(_), Some(_)) => Err(Error::InvalidFilter(
                "a filter takes either a predicate or a pattern set, not both".into(),
            )),
            (None, None) => Err(Error::InvalidFilter(
                "a filter needs a predicate or a pattern set".into(),
            )),
        }
    }
}
