use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::builder::ModelBuilder;
use crate::model::outline::ProjectOutlineBuilder;

/// Registry of model builders, consulted in registration order.
#[derive(Clone, Default)]
pub struct ModelBuilderRegistry {
    builders: Vec<Arc<dyn ModelBuilder>>,
}

impl ModelBuilderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in builders already registered.
    pub fn with_default_builders() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ProjectOutlineBuilder));
        registry
    }

    pub fn register(&mut self, builder: Arc<dyn ModelBuilder>) {
        self.builders.push(builder);
    }

    /// Returns the first builder claiming the model name, or
    /// [`Error::UnknownModel`] when none does.
    pub fn lookup(&self, model_name: &str) -> Result<Arc<dyn ModelBuilder>> {
        self.builders
            .iter()
            .find(|b| b.can_build(model_name))
            .cloned()
            .ok_or_else(|| Error::UnknownModel {
                model: model_name.to_string(),
            })
    }
}

impl fmt::Debug for ModelBuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBuilderRegistry")
            .field("builders", &self.builders.len())
            .finish()
    }
}
