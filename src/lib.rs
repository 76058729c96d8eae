mod config;
mod controls;
mod error;
mod session;
mod view;

pub use config::RunConfig;
pub use controls::{FixedFeed, ParameterFeed, SweepFeed};
pub use error::RunError;
pub use session::FitSession;
pub use view::{JsonRenderer, LogRenderer, PlotOptions, ScatterRenderer, Series};

use model::{LogSink, SequentialRegressor};
use pipeline::{GenerationParameters, SeriesPair, generate, generate_with, zip_points};
use rand::{SeedableRng, rngs::StdRng};

/// Drives every cycle the configuration describes: synthesize a sample,
/// render it, fit a fresh default regressor, render the outcome.
///
/// # Errors
/// Returns the first `RunError` encountered; later cycles do not run.
pub async fn run(config: &RunConfig, renderer: &mut dyn ScatterRenderer) -> Result<(), RunError> {
    let mut feed = config.feed()?;
    let mut cycle: u64 = 0;

    while let Some(params) = feed.next_parameters() {
        // Derive a distinct but reproducible seed per cycle.
        let seed = config.seed.map(|s| s.wrapping_add(cycle));
        log::info!(
            "cycle {cycle}: n_points={}, sparsity={}, noise={}%, epochs={}",
            params.n_points,
            params.sparsity,
            params.noise_percent,
            params.epochs
        );
        run_cycle(&params, seed, renderer).await?;
        cycle += 1;
    }

    Ok(())
}

async fn run_cycle(
    params: &GenerationParameters,
    seed: Option<u64>,
    renderer: &mut dyn ScatterRenderer,
) -> Result<(), RunError> {
    let (sample, pair, regressor) = match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = generate_with(params, &mut rng)?;
            let pair = SeriesPair::create_with(sample.xs(), sample.ys(), &mut rng)?;
            let regressor = SequentialRegressor::single_input_default(Some(seed));
            (sample, pair, regressor)
        }
        None => {
            let sample = generate(params)?;
            let pair = SeriesPair::from_sample(&sample)?;
            let regressor = SequentialRegressor::single_input_default(None);
            (sample, pair, regressor)
        }
    };

    let observed = zip_points(sample.xs(), sample.ys())?;
    renderer.render(
        &format!(
            "Input data (noise={}%, epochs={})",
            params.noise_percent, params.epochs
        ),
        &[Series {
            label: "Actual",
            points: &observed,
        }],
        &PlotOptions::default(),
    )?;

    let mut session = FitSession::new(regressor);
    let prediction = session.run(&pair, params, &mut LogSink).await?;

    renderer.render(
        &format!(
            "Output vs. Input (noise={}%, epochs={})",
            params.noise_percent, params.epochs
        ),
        &[
            Series {
                label: "Actual",
                points: &prediction.original,
            },
            Series {
                label: "Predicted",
                points: &prediction.estimated,
            },
        ],
        &PlotOptions::default(),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[tokio::test]
    async fn a_small_seeded_run_completes_end_to_end() {
        let config = RunConfig {
            parameters: GenerationParameters {
                n_points: 40,
                batch_size: NonZeroUsize::new(8).unwrap(),
                epochs: NonZeroUsize::new(2).unwrap(),
                ..Default::default()
            },
            seed: Some(1),
            ..Default::default()
        };

        run(&config, &mut LogRenderer).await.unwrap();
    }

    #[tokio::test]
    async fn an_invalid_config_fails_before_any_cycle() {
        let config = RunConfig {
            parameters: GenerationParameters {
                sparsity: 9,
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(run(&config, &mut LogRenderer).await.is_err());
    }
}
