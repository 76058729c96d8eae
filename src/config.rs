use std::{
    fs::File,
    io::BufReader,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use pipeline::GenerationParameters;
use serde::Deserialize;

use crate::{
    RunError,
    controls::{FixedFeed, ParameterFeed, SweepFeed},
};

/// A full run description, usually loaded from a JSON file. Every field has
/// a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RunConfig {
    /// Base parameters for every cycle.
    pub parameters: GenerationParameters,
    /// Extra cycles with these noise percentages substituted into the base.
    pub noise_sweep: Vec<f64>,
    /// Extra cycles with these epoch counts substituted into the base.
    pub epoch_sweep: Vec<usize>,
    /// Seed for noise, shuffling, and weight init. Unseeded runs draw from
    /// the process RNG and are not numerically reproducible.
    pub seed: Option<u64>,
    /// When set, point clouds are written as JSON files derived from this
    /// path instead of being summarized in the log.
    pub output: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parameters: GenerationParameters::default(),
            noise_sweep: Vec::new(),
            epoch_sweep: Vec::new(),
            seed: None,
            output: None,
        }
    }
}

impl RunConfig {
    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns `RunError::Io` when the file cannot be read and
    /// `RunError::Json` when it does not parse.
    pub fn load(path: &Path) -> Result<Self, RunError> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Checks the whole configuration before any cycle runs.
    ///
    /// # Errors
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), RunError> {
        self.parameters.validate()?;

        if self.epoch_sweep.contains(&0) {
            return Err(RunError::InvalidConfig(
                "epoch_sweep entries must be positive".to_string(),
            ));
        }
        if self
            .noise_sweep
            .iter()
            .any(|n| !n.is_finite() || *n < 0.0)
        {
            return Err(RunError::InvalidConfig(
                "noise_sweep entries must be finite and non-negative".to_string(),
            ));
        }

        for noise_percent in &self.noise_sweep {
            self.parameters
                .with_noise_percent(*noise_percent)
                .validate()?;
        }

        Ok(())
    }

    /// Builds the parameter feed this configuration describes: a sweep when
    /// any sweep list is present, a one-shot feed otherwise.
    ///
    /// # Errors
    /// Same as [`RunConfig::validate`], which runs first.
    pub fn feed(&self) -> Result<Box<dyn ParameterFeed>, RunError> {
        self.validate()?;

        if self.noise_sweep.is_empty() && self.epoch_sweep.is_empty() {
            return Ok(Box::new(FixedFeed::new(self.parameters)));
        }

        let epoch_steps: Vec<NonZeroUsize> = self
            .epoch_sweep
            .iter()
            .map(|&e| {
                NonZeroUsize::new(e).ok_or_else(|| {
                    RunError::InvalidConfig("epoch_sweep entries must be positive".to_string())
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Box::new(SweepFeed::new(
            self.parameters,
            &self.noise_sweep,
            &epoch_steps,
        )))
    }
}
