mod activations;
mod error;
mod layers;
mod loss;
mod optimizer;
mod sequential;
mod trainable;

pub use activations::ActFn;
pub use error::{ModelError, Result};
pub use layers::Dense;
pub use loss::Mse;
pub use optimizer::{Adam, GradientDescent, Optimizer};
pub use sequential::SequentialRegressor;
pub use trainable::{EpochMetrics, EpochSink, FitConfig, LogSink, NullSink, Trainable};
