use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used in the entire model crate.
pub type Result<T> = std::result::Result<T, ModelError>;

/// The model crate's error type.
#[derive(Debug)]
pub enum ModelError {
    /// Two buffers that must agree in length do not.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    /// A training or construction input is invalid.
    InvalidConfig(&'static str),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::ShapeMismatch {
                what,
                got,
                expected,
            } => {
                write!(
                    f,
                    "shape mismatch for {what}: got {got}, expected {expected}"
                )
            }
            ModelError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl Error for ModelError {}
