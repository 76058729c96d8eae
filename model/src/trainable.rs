use std::num::NonZeroUsize;

use async_trait::async_trait;

use crate::Result;

/// Options recognized by [`Trainable::fit`].
#[derive(Debug, Clone, Copy)]
pub struct FitConfig {
    pub batch_size: NonZeroUsize,
    pub epochs: NonZeroUsize,
    pub shuffle: bool,
}

/// Per-epoch training metrics reported through an [`EpochSink`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMetrics {
    pub mse: f64,
}

/// Observer for per-epoch progress. Reporting is observability only; no
/// training decision hinges on it.
pub trait EpochSink: Send {
    fn on_epoch_end(&mut self, epoch: usize, metrics: &EpochMetrics);
}

/// An [`EpochSink`] that discards every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EpochSink for NullSink {
    fn on_epoch_end(&mut self, _epoch: usize, _metrics: &EpochMetrics) {}
}

/// An [`EpochSink`] that reports through the logging facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EpochSink for LogSink {
    fn on_epoch_end(&mut self, epoch: usize, metrics: &EpochMetrics) {
        log::debug!("epoch {epoch}: mse {}", metrics.mse);
    }
}

/// Abstraction over a trainable regression capability.
///
/// This trait is the only interface the orchestration layer requires to fit
/// and evaluate a model; the composition of layers, losses, and optimizers
/// lives behind implementations of it. Both operations may suspend; they
/// represent a long-running external computation.
#[async_trait]
pub trait Trainable: Send {
    /// Trains on index-aligned `xs`/`ys` until `config.epochs` epochs have
    /// completed, reporting each epoch to `sink`.
    ///
    /// # Errors
    /// Implementations should return:
    /// - `ModelError::ShapeMismatch` when `xs` and `ys` disagree in length.
    /// - `ModelError::InvalidConfig` for invalid domain inputs.
    ///
    /// # Panics
    /// Implementations should not panic; they should report failures via
    /// `ModelError`.
    async fn fit(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        config: &FitConfig,
        sink: &mut dyn EpochSink,
    ) -> Result<()>;

    /// Evaluates the model on `xs`, returning one prediction per input.
    ///
    /// # Errors
    /// Returns a `ModelError` if invariants are violated.
    async fn predict(&self, xs: &[f64]) -> Result<Vec<f64>>;
}
