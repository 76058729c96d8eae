use rand::{Rng, seq::SliceRandom};

use crate::{CurveSample, PipelineError, Result};

/// A sequence of values together with its minimum and maximum, supporting
/// a [0, 1] normalization and its exact inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxSeries {
    values: Vec<f64>,
    min: f64,
    max: f64,
}

impl MinMaxSeries {
    /// Wraps a sequence, computing its bounds.
    ///
    /// # Errors
    /// Returns `PipelineError` when the sequence is empty or contains a
    /// non-finite element.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(PipelineError::InvalidParameter {
                name: "series",
                reason: "must not be empty",
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::NonFinite { what: "series" });
        }

        let min = values.iter().fold(f64::INFINITY, |acc, &v| acc.min(v));
        let max = values.iter().fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));

        Ok(Self { values, min, max })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether the series is single-valued (`max == min`), in which case
    /// [`MinMaxSeries::normalize`] maps every element to 0 instead of
    /// dividing by zero.
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Maps each element to `(v - min) / (max - min)`.
    ///
    /// Every result lies in [0, 1]. For a degenerate series the result is
    /// all zeros; query [`MinMaxSeries::is_degenerate`] to tell the cases
    /// apart.
    pub fn normalize(&self) -> Vec<f64> {
        if self.is_degenerate() {
            log::warn!("normalizing a single-valued series of length {}", self.len());
            return vec![0.0; self.values.len()];
        }

        let range = self.max - self.min;
        self.values.iter().map(|&v| (v - self.min) / range).collect()
    }

    /// Maps each normalized element back through `v * (max - min) + min`,
    /// the exact inverse of [`MinMaxSeries::normalize`].
    pub fn scale(&self, normalized: &[f64]) -> Vec<f64> {
        let range = self.max - self.min;
        normalized.iter().map(|&v| v * range + self.min).collect()
    }
}

/// Two series shuffled under one shared permutation, so that element `i` of
/// each still describes the same observation.
#[derive(Debug, Clone)]
pub struct SeriesPair {
    x: MinMaxSeries,
    y: MinMaxSeries,
    permutation: Vec<usize>,
}

impl SeriesPair {
    /// Builds a pair from raw parallel sequences using the process RNG for
    /// the shuffle.
    ///
    /// # Errors
    /// Returns `PipelineError::ShapeMismatch` when lengths differ, and any
    /// error of [`MinMaxSeries::new`].
    pub fn create(xs: &[f64], ys: &[f64]) -> Result<Self> {
        Self::create_with(xs, ys, &mut rand::rng())
    }

    /// Same as [`SeriesPair::create`] with a caller-provided RNG.
    ///
    /// # Errors
    /// Returns `PipelineError::ShapeMismatch` when lengths differ, and any
    /// error of [`MinMaxSeries::new`].
    pub fn create_with<R: Rng + ?Sized>(xs: &[f64], ys: &[f64], rng: &mut R) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(PipelineError::ShapeMismatch {
                what: "paired series",
                got: ys.len(),
                expected: xs.len(),
            });
        }

        let mut permutation: Vec<usize> = (0..xs.len()).collect();
        permutation.shuffle(rng);

        let shuffled_x: Vec<f64> = permutation.iter().map(|&i| xs[i]).collect();
        let shuffled_y: Vec<f64> = permutation.iter().map(|&i| ys[i]).collect();

        Ok(Self {
            x: MinMaxSeries::new(shuffled_x)?,
            y: MinMaxSeries::new(shuffled_y)?,
            permutation,
        })
    }

    /// Convenience over [`SeriesPair::create`] for a generated sample.
    ///
    /// # Errors
    /// Same as [`SeriesPair::create`].
    pub fn from_sample(sample: &CurveSample) -> Result<Self> {
        Self::create(sample.xs(), sample.ys())
    }

    pub fn x(&self) -> &MinMaxSeries {
        &self.x
    }

    pub fn y(&self) -> &MinMaxSeries {
        &self.y
    }

    /// The shared shuffle order: position `i` of both series holds the
    /// observation that was at `permutation()[i]` before shuffling.
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }
}
