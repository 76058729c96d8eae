use ndarray::Array1;
use rand::Rng;

use crate::{GenerationParameters, PipelineError, Result, sparse};

/// A synthesized observation set: two index-aligned sequences of finite
/// values, equal in length by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSample {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl CurveSample {
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// Synthesizes a noisy sparse sample of `exp(-coefficient * x)` using the
/// process RNG. Run-to-run output differs in the noise term only.
///
/// # Errors
/// Returns `PipelineError` on invalid parameters or a non-finite curve.
pub fn generate(params: &GenerationParameters) -> Result<CurveSample> {
    generate_with(params, &mut rand::rng())
}

/// Same as [`generate`], drawing noise from the provided RNG. Pass a seeded
/// `StdRng` for reproducible output.
///
/// # Errors
/// Returns `PipelineError` on invalid parameters or a non-finite curve.
pub fn generate_with<R: Rng + ?Sized>(
    params: &GenerationParameters,
    rng: &mut R,
) -> Result<CurveSample> {
    params.validate()?;

    let grid = Array1::linspace(params.min_x, params.max_x, params.n_points);
    let indices = sparse::select(params.n_points, params.sparsity)?;
    let xs: Vec<f64> = indices.iter().map(|&i| grid[i]).collect();

    let ys: Vec<f64> = xs.iter().map(|&x| (-params.coefficient * x).exp()).collect();
    if ys.iter().any(|y| !y.is_finite()) {
        return Err(PipelineError::NonFinite { what: "curve" });
    }

    let max_y = ys.iter().fold(f64::NEG_INFINITY, |acc, &y| acc.max(y));
    let min_y = ys.iter().fold(f64::INFINITY, |acc, &y| acc.min(y));
    let mean_magnitude = 0.5 * (max_y + min_y);
    if mean_magnitude == 0.0 {
        return Err(PipelineError::InvalidParameter {
            name: "noise_percent",
            reason: "curve mean magnitude is zero",
        });
    }

    let noise_factor = (params.noise_percent / 100.0) * (max_y - min_y) / mean_magnitude;
    let ys: Vec<f64> = ys
        .into_iter()
        .map(|y| y + noise_factor * rng.random::<f64>())
        .collect();

    log::debug!(
        "retained {} of {} grid points (sparsity {})",
        xs.len(),
        params.n_points,
        params.sparsity
    );

    Ok(CurveSample { xs, ys })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn sample_lengths_match_the_sparse_index_set() {
        let params = GenerationParameters::default();
        let sample = generate(&params).unwrap();
        let indices = sparse::select(params.n_points, params.sparsity).unwrap();

        assert_eq!(sample.len(), indices.len());
        assert_eq!(sample.xs().len(), sample.ys().len());
    }

    #[test]
    fn first_x_is_the_lower_bound() {
        let sample = generate(&GenerationParameters::default()).unwrap();
        assert_eq!(sample.xs()[0], 0.5);
    }

    #[test]
    fn noise_stays_within_the_computed_band() {
        let params = GenerationParameters::default();
        let sample = generate(&params).unwrap();

        let raw: Vec<f64> = sample
            .xs()
            .iter()
            .map(|&x| (-params.coefficient * x).exp())
            .collect();
        let max_y = raw.iter().fold(f64::NEG_INFINITY, |acc, &y| acc.max(y));
        let min_y = raw.iter().fold(f64::INFINITY, |acc, &y| acc.min(y));
        let factor = (params.noise_percent / 100.0) * (max_y - min_y) / (0.5 * (max_y + min_y));

        for (&y, &base) in sample.ys().iter().zip(&raw) {
            assert!(y >= base);
            assert!(y <= base + factor);
        }
    }

    #[test]
    fn zero_noise_reproduces_the_exact_curve() {
        let params = GenerationParameters::default().with_noise_percent(0.0);
        let sample = generate(&params).unwrap();

        for (&x, &y) in sample.xs().iter().zip(sample.ys()) {
            assert_eq!(y, (-params.coefficient * x).exp());
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let params = GenerationParameters::default();
        let a = generate_with(&params, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_with(&params, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn invalid_parameters_fail_before_any_drawing() {
        let params = GenerationParameters {
            sparsity: 0,
            ..Default::default()
        };

        assert!(generate(&params).is_err());
    }
}
