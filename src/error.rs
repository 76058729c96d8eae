use std::fmt;

use model::ModelError;
use pipeline::PipelineError;

/// All errors that can occur while driving fit cycles.
#[derive(Debug)]
pub enum RunError {
    /// Data synthesis or normalization failed, caught before training.
    Pipeline(PipelineError),
    /// The trainable capability failed; propagated unmodified.
    Model(ModelError),
    /// Invalid run configuration, caught before any cycle starts.
    InvalidConfig(String),
    /// An underlying I/O error (config file, renderer output).
    Io(std::io::Error),
    /// Config or renderer JSON could not be read or written.
    Json(serde_json::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pipeline(e) => write!(f, "pipeline error: {e}"),
            Self::Model(e) => write!(f, "model error: {e}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pipeline(e) => Some(e),
            Self::Model(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::InvalidConfig(_) => None,
        }
    }
}

impl From<PipelineError> for RunError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

impl From<ModelError> for RunError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for RunError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
