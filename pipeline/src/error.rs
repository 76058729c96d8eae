use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used across the data pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The data pipeline's error type.
#[derive(Debug)]
pub enum PipelineError {
    /// Two paired sequences disagree in length.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// An input value is outside its valid domain.
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },

    /// A sequence contains a NaN or infinite element.
    NonFinite { what: &'static str },
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(
                    f,
                    "shape mismatch for {what}: got {got}, expected {expected}"
                )
            }
            PipelineError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {name}: {reason}")
            }
            PipelineError::NonFinite { what } => {
                write!(f, "{what} contains a non-finite value")
            }
        }
    }
}

impl Error for PipelineError {}
