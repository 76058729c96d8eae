use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{PipelineError, Result};

/// Largest accepted `sparsity` value.
pub const MAX_SPARSITY: u32 = 6;

/// The knobs controlling one generate/fit cycle.
///
/// A value of this type is immutable once built: callers derive updated
/// copies through the `with_*` constructors instead of mutating in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GenerationParameters {
    pub min_x: f64,
    pub max_x: f64,
    pub n_points: usize,
    pub coefficient: f64,
    pub noise_percent: f64,
    pub sparsity: u32,
    pub batch_size: NonZeroUsize,
    pub epochs: NonZeroUsize,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            min_x: 0.5,
            max_x: 4.0,
            n_points: 400,
            coefficient: 2.0,
            noise_percent: 2.5,
            sparsity: 2,
            batch_size: NonZeroUsize::new(32).unwrap(),
            epochs: NonZeroUsize::new(200).unwrap(),
        }
    }
}

impl GenerationParameters {
    /// Checks every field against its domain.
    ///
    /// # Errors
    /// Returns `PipelineError::InvalidParameter` naming the first offending
    /// field. Runs before any generation or normalization work.
    pub fn validate(&self) -> Result<()> {
        if !self.min_x.is_finite() || !self.max_x.is_finite() {
            return Err(PipelineError::InvalidParameter {
                name: "min_x/max_x",
                reason: "bounds must be finite",
            });
        }
        if self.min_x >= self.max_x {
            return Err(PipelineError::InvalidParameter {
                name: "min_x",
                reason: "must be strictly below max_x",
            });
        }
        if self.n_points < 2 {
            return Err(PipelineError::InvalidParameter {
                name: "n_points",
                reason: "must be at least 2",
            });
        }
        if !self.coefficient.is_finite() {
            return Err(PipelineError::InvalidParameter {
                name: "coefficient",
                reason: "must be finite",
            });
        }
        if !self.noise_percent.is_finite() || self.noise_percent < 0.0 {
            return Err(PipelineError::InvalidParameter {
                name: "noise_percent",
                reason: "must be finite and non-negative",
            });
        }
        if self.sparsity == 0 || self.sparsity > MAX_SPARSITY {
            return Err(PipelineError::InvalidParameter {
                name: "sparsity",
                reason: "must be between 1 and 6",
            });
        }

        Ok(())
    }

    /// Returns a copy with an updated noise percentage.
    pub fn with_noise_percent(self, noise_percent: f64) -> Self {
        Self {
            noise_percent,
            ..self
        }
    }

    /// Returns a copy with an updated epoch count.
    pub fn with_epochs(self, epochs: NonZeroUsize) -> Self {
        Self { epochs, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GenerationParameters::default().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let params = GenerationParameters {
            min_x: 4.0,
            max_x: 0.5,
            ..Default::default()
        };

        assert!(matches!(
            params.validate(),
            Err(PipelineError::InvalidParameter { name: "min_x", .. })
        ));
    }

    #[test]
    fn sparsity_out_of_range_is_rejected() {
        for sparsity in [0, 7] {
            let params = GenerationParameters {
                sparsity,
                ..Default::default()
            };

            assert!(matches!(
                params.validate(),
                Err(PipelineError::InvalidParameter {
                    name: "sparsity",
                    ..
                })
            ));
        }
    }

    #[test]
    fn too_few_points_are_rejected() {
        let params = GenerationParameters {
            n_points: 1,
            ..Default::default()
        };

        assert!(params.validate().is_err());
    }

    #[test]
    fn with_updaters_leave_the_rest_untouched() {
        let base = GenerationParameters::default();
        let updated = base
            .with_noise_percent(5.0)
            .with_epochs(NonZeroUsize::new(400).unwrap());

        assert_eq!(updated.noise_percent, 5.0);
        assert_eq!(updated.epochs.get(), 400);
        assert_eq!(updated.min_x, base.min_x);
        assert_eq!(updated.n_points, base.n_points);
    }
}
