use async_trait::async_trait;
use ndarray::prelude::*;
use ndarray_rand::{RandomExt, rand_distr::Uniform};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    ActFn, Adam, Dense, EpochMetrics, EpochSink, FitConfig, ModelError, Mse, Optimizer, Result,
    Trainable,
};

/// A dense feed-forward regressor over a flat parameter vector: a stack of
/// [`Dense`] layers, a loss, an optimizer, and the RNG driving weight
/// initialization and batch shuffling.
pub struct SequentialRegressor<O, R>
where
    O: Optimizer,
    R: Rng,
{
    layers: Vec<Dense>,
    params: Vec<f64>,
    grad: Vec<f64>,
    loss_fn: Mse,
    optimizer: O,
    rng: R,
    initialized: bool,
}

impl<O, R> SequentialRegressor<O, R>
where
    O: Optimizer,
    R: Rng,
{
    /// Creates a new `SequentialRegressor`.
    ///
    /// # Arguments
    /// * `layers` - The dense layers the network is composed of.
    /// * `optimizer` - The update rule applied after each batch gradient.
    /// * `rng` - A random number generator.
    pub fn new(layers: Vec<Dense>, optimizer: O, rng: R) -> Self {
        let size: usize = layers.iter().map(Dense::size).sum();

        Self {
            layers,
            params: vec![0.0; size],
            grad: vec![0.0; size],
            loss_fn: Mse::new(),
            optimizer,
            rng,
            initialized: false,
        }
    }

    /// Returns the amount of parameters in the network.
    pub fn size(&self) -> usize {
        self.params.len()
    }

    /// Draws glorot-uniform weights for every layer; biases start at zero.
    fn init_params(&mut self) -> Result<()> {
        let mut offset = 0;

        for layer in &self.layers {
            let (fan_in, fan_out) = layer.dim();
            let w_size = fan_in * fan_out;
            let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
            let dist = Uniform::new(-limit, limit)
                .map_err(|_| ModelError::InvalidConfig("degenerate weight init bounds"))?;

            let weights = Array1::random_using(w_size, dist, &mut self.rng);
            for (p, w) in self.params[offset..offset + w_size].iter_mut().zip(weights) {
                *p = w;
            }

            offset += layer.size();
        }

        self.initialized = true;
        Ok(())
    }
}

impl SequentialRegressor<Adam, StdRng> {
    /// The default single-input regressor: a 1 → 50 → 50 (sigmoid) → 1
    /// dense stack trained with Adam. An unseeded instance draws its
    /// initial weights from the operating system.
    pub fn single_input_default(seed: Option<u64>) -> Self {
        let layers = vec![
            Dense::new((1, 50), None),
            Dense::new((50, 50), Some(ActFn::Sigmoid)),
            Dense::new((50, 1), None),
        ];
        let size: usize = layers.iter().map(Dense::size).sum();
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self::new(layers, Adam::with_defaults(size), rng)
    }
}

fn forward_pass(layers: &mut [Dense], params: &[f64], x: Array2<f64>) -> Result<Array2<f64>> {
    let mut x = x;
    let mut offset = 0;

    for layer in layers {
        let size = layer.size();
        x = layer.forward(&params[offset..offset + size], x.view())?;
        offset += size;
    }

    Ok(x)
}

fn apply_pass(layers: &[Dense], params: &[f64], x: Array2<f64>) -> Result<Array2<f64>> {
    let mut x = x;
    let mut offset = 0;

    for layer in layers {
        let size = layer.size();
        x = layer.apply(&params[offset..offset + size], x.view())?;
        offset += size;
    }

    Ok(x)
}

fn backward_pass(
    layers: &mut [Dense],
    params: &[f64],
    grad: &mut [f64],
    d: Array2<f64>,
) -> Result<()> {
    let mut d = d;
    let mut offset = params.len();

    for layer in layers.iter_mut().rev() {
        let size = layer.size();
        offset -= size;
        d = layer.backward(
            &params[offset..offset + size],
            &mut grad[offset..offset + size],
            d,
        )?;
    }

    Ok(())
}

#[async_trait]
impl<O, R> Trainable for SequentialRegressor<O, R>
where
    O: Optimizer + Sync,
    R: Rng + Send + Sync,
{
    async fn fit(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        config: &FitConfig,
        sink: &mut dyn EpochSink,
    ) -> Result<()> {
        if xs.len() != ys.len() {
            return Err(ModelError::ShapeMismatch {
                what: "training pair",
                got: ys.len(),
                expected: xs.len(),
            });
        }
        if xs.is_empty() {
            return Err(ModelError::InvalidConfig("training set must not be empty"));
        }

        if !self.initialized {
            self.init_params()?;
        }

        let mut order: Vec<usize> = (0..xs.len()).collect();

        for epoch in 0..config.epochs.get() {
            if config.shuffle {
                order.shuffle(&mut self.rng);
            }

            let mut total_loss = 0.0;
            let mut num_batches = 0;

            for chunk in order.chunks(config.batch_size.get()) {
                let bx = Array2::from_shape_fn((chunk.len(), 1), |(row, _)| xs[chunk[row]]);
                let by = Array2::from_shape_fn((chunk.len(), 1), |(row, _)| ys[chunk[row]]);

                self.grad.fill(0.0);
                let y_pred = forward_pass(&mut self.layers, &self.params, bx)?;
                if y_pred.dim() != by.dim() {
                    return Err(ModelError::ShapeMismatch {
                        what: "network output",
                        got: y_pred.ncols(),
                        expected: by.ncols(),
                    });
                }

                total_loss += self.loss_fn.loss(y_pred.view(), by.view());
                num_batches += 1;

                let d = self.loss_fn.loss_prime(y_pred.view(), by.view());
                backward_pass(&mut self.layers, &self.params, &mut self.grad, d)?;
                self.optimizer.update_params(&mut self.params, &self.grad)?;
            }

            // Epoch loss is approximated by averaging the batch losses.
            let mse = total_loss / num_batches as f64;
            sink.on_epoch_end(epoch, &EpochMetrics { mse });
        }

        Ok(())
    }

    async fn predict(&self, xs: &[f64]) -> Result<Vec<f64>> {
        if xs.is_empty() {
            return Ok(Vec::new());
        }

        let x = Array2::from_shape_fn((xs.len(), 1), |(row, _)| xs[row]);
        let out = apply_pass(&self.layers, &self.params, x)?;
        if out.ncols() != 1 {
            return Err(ModelError::ShapeMismatch {
                what: "network output",
                got: out.ncols(),
                expected: 1,
            });
        }

        Ok(out.column(0).to_vec())
    }
}
