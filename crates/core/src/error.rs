use std::io;
use std::path::PathBuf;

/// Errors that can occur during model introspection and file tree resolution
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No builder is registered for model '{model}'")]
    UnknownModel { model: String },

    #[error("Model '{model}' is not supported by this build")]
    UnsupportedModel {
        model: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Included build '{build}' failed: {reason}")]
    NestedBuild { build: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wraps a registry lookup miss into the signal exposed at the tooling
    /// boundary. Any other error passes through unchanged.
    pub fn into_unsupported_model(self) -> Error {
        match self {
            Error::UnknownModel { model } => Error::UnsupportedModel {
                model: model.clone(),
                source: Box::new(Error::UnknownModel { model }),
            },
            other => other,
        }
    }
}

/// Result type alias for tessera-core operations
pub type Result<T> = std::result::Result<T, Error>;
