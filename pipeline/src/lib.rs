mod cloud;
mod curve;
mod error;
mod normalize;
mod params;
mod sparse;

pub use cloud::{Point, PredictionPair, zip_points};
pub use curve::{CurveSample, generate, generate_with};
pub use error::{PipelineError, Result};
pub use normalize::{MinMaxSeries, SeriesPair};
pub use params::{GenerationParameters, MAX_SPARSITY};
pub use sparse::select;
