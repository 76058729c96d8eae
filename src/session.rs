use model::{EpochSink, FitConfig, Trainable};
use ndarray::Array1;
use pipeline::{GenerationParameters, PredictionPair, SeriesPair, zip_points};

use crate::RunError;

/// Sequences one train/test cycle over an injected trainable capability:
/// fit on the normalized pair, probe the unit interval, predict, and scale
/// everything back into raw coordinates.
///
/// A session runs cycles through `&mut self`, so at most one cycle per
/// instance is in flight at a time.
pub struct FitSession<T: Trainable> {
    trainable: T,
}

impl<T: Trainable> FitSession<T> {
    /// Creates a new `FitSession` owning the trainable.
    pub fn new(trainable: T) -> Self {
        Self { trainable }
    }

    /// Hands the trainable back, consuming the session.
    pub fn into_inner(self) -> T {
        self.trainable
    }

    /// Runs one full cycle and assembles the presentation-side outcome.
    ///
    /// The pair is only read during the call: the probe grid is regenerated
    /// at the full `n_points` over [0, 1], never sparsified.
    ///
    /// # Errors
    /// Returns `RunError::Pipeline` for validation failures and
    /// `RunError::Model` for trainable failures, both without touching
    /// `pair`.
    pub async fn run(
        &mut self,
        pair: &SeriesPair,
        params: &GenerationParameters,
        sink: &mut dyn EpochSink,
    ) -> Result<PredictionPair, RunError> {
        params.validate()?;

        let x_norm = pair.x().normalize();
        let y_norm = pair.y().normalize();
        let config = FitConfig {
            batch_size: params.batch_size,
            epochs: params.epochs,
            shuffle: true,
        };

        log::info!(
            "fitting {} observation(s) for {} epoch(s)",
            x_norm.len(),
            params.epochs
        );
        self.trainable.fit(&x_norm, &y_norm, &config, sink).await?;

        let probe = Array1::linspace(0.0, 1.0, params.n_points).to_vec();
        let predicted = self.trainable.predict(&probe).await?;

        let estimated_x = pair.x().scale(&probe);
        let estimated_y = pair.y().scale(&predicted);

        let original = zip_points(pair.x().values(), pair.y().values())?;
        let estimated = zip_points(&estimated_x, &estimated_y)?;

        Ok(PredictionPair {
            original,
            estimated,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use model::{ModelError, NullSink};
    use pipeline::generate;

    use super::*;

    /// A stand-in capability that predicts its input unchanged.
    struct IdentityStub {
        fitted: bool,
    }

    #[async_trait]
    impl Trainable for IdentityStub {
        async fn fit(
            &mut self,
            xs: &[f64],
            ys: &[f64],
            _config: &FitConfig,
            _sink: &mut dyn EpochSink,
        ) -> model::Result<()> {
            assert_eq!(xs.len(), ys.len());
            self.fitted = true;
            Ok(())
        }

        async fn predict(&self, xs: &[f64]) -> model::Result<Vec<f64>> {
            assert!(self.fitted);
            Ok(xs.to_vec())
        }
    }

    struct FailingStub;

    #[async_trait]
    impl Trainable for FailingStub {
        async fn fit(
            &mut self,
            _xs: &[f64],
            _ys: &[f64],
            _config: &FitConfig,
            _sink: &mut dyn EpochSink,
        ) -> model::Result<()> {
            Err(ModelError::InvalidConfig("training backend unavailable"))
        }

        async fn predict(&self, _xs: &[f64]) -> model::Result<Vec<f64>> {
            unreachable!("predict must not run after a failed fit")
        }
    }

    #[tokio::test]
    async fn cycle_against_an_identity_stub_recovers_the_input_range() {
        let params = GenerationParameters::default();
        let sample = generate(&params).unwrap();
        let pair = SeriesPair::from_sample(&sample).unwrap();

        let mut session = FitSession::new(IdentityStub { fitted: false });
        let prediction = session.run(&pair, &params, &mut NullSink).await.unwrap();

        // The probe grid is regenerated at full n_points, not sparsified.
        assert_eq!(prediction.estimated.len(), params.n_points);
        assert_eq!(prediction.original.len(), sample.len());

        // An identity predictor maps the probe bounds back onto the
        // observed x range, whose lower end is always min_x.
        assert!((prediction.estimated[0].x - params.min_x).abs() < 1e-9);
        assert!(
            (prediction.estimated.last().unwrap().x - pair.x().max()).abs() < 1e-9
        );
    }

    #[tokio::test]
    async fn original_cloud_mirrors_the_shuffled_pair() {
        let params = GenerationParameters::default();
        let sample = generate(&params).unwrap();
        let pair = SeriesPair::from_sample(&sample).unwrap();

        let mut session = FitSession::new(IdentityStub { fitted: false });
        let prediction = session.run(&pair, &params, &mut NullSink).await.unwrap();

        for (point, (&x, &y)) in prediction
            .original
            .iter()
            .zip(pair.x().values().iter().zip(pair.y().values()))
        {
            assert_eq!(point.x, x);
            assert_eq!(point.y, y);
        }
    }

    #[tokio::test]
    async fn trainable_failures_propagate_unmodified() {
        let params = GenerationParameters::default();
        let sample = generate(&params).unwrap();
        let pair = SeriesPair::from_sample(&sample).unwrap();
        let values_before = pair.x().values().to_vec();

        let mut session = FitSession::new(FailingStub);
        let result = session.run(&pair, &params, &mut NullSink).await;

        assert!(matches!(
            result,
            Err(RunError::Model(ModelError::InvalidConfig(_)))
        ));
        assert_eq!(pair.x().values(), values_before);
    }

    #[tokio::test]
    async fn invalid_parameters_fail_before_training() {
        let params = GenerationParameters::default();
        let sample = generate(&params).unwrap();
        let pair = SeriesPair::from_sample(&sample).unwrap();

        let broken = GenerationParameters {
            sparsity: 0,
            ..params
        };
        let mut session = FitSession::new(FailingStub);

        // FailingStub would error differently; the pipeline rejects first.
        assert!(matches!(
            session.run(&pair, &broken, &mut NullSink).await,
            Err(RunError::Pipeline(_))
        ));
    }
}
