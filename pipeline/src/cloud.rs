use serde::Serialize;

use crate::{PipelineError, Result};

/// One (x, y) record of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The presentation-side outcome of one fit cycle: the observed cloud and
/// the model's estimate over the probe grid.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionPair {
    pub original: Vec<Point>,
    pub estimated: Vec<Point>,
}

/// Zips two parallel sequences into (x, y) records, preserving order.
///
/// # Errors
/// Returns `PipelineError::ShapeMismatch` when the lengths differ.
pub fn zip_points(xs: &[f64], ys: &[f64]) -> Result<Vec<Point>> {
    if xs.len() != ys.len() {
        return Err(PipelineError::ShapeMismatch {
            what: "point cloud",
            got: ys.len(),
            expected: xs.len(),
        });
    }

    Ok(xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| Point { x, y })
        .collect())
}
