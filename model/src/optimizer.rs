use crate::{ModelError, Result};

/// Defines the strategy for updating model parameters based on calculated
/// gradients.
pub trait Optimizer: Send {
    /// Updates the provided slice of parameters using the gradient.
    ///
    /// # Arguments
    /// * `params` - The parameters to update.
    /// * `grad` - A reference to the model's gradient.
    ///
    /// # Errors
    /// Returns an error if the sizes of `params` and `grad` disagree.
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]) -> Result<()>;
}

#[derive(Debug)]
pub struct GradientDescent {
    learning_rate: f64,
}

impl GradientDescent {
    /// Creates a new `GradientDescent` optimizer.
    ///
    /// # Arguments
    /// * `learning_rate` - The small coefficient that modulates the amount of
    ///   training per update.
    ///
    /// # Returns
    /// A new `GradientDescent` instance.
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for GradientDescent {
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]) -> Result<()> {
        if grad.len() != params.len() {
            return Err(ModelError::ShapeMismatch {
                what: "gradient",
                got: grad.len(),
                expected: params.len(),
            });
        }

        let lr = self.learning_rate;

        for (p, g) in params.iter_mut().zip(grad) {
            *p -= lr * g;
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct Adam {
    learning_rate: f64,
    beta1: f64,
    beta2: f64,
    beta1_t: f64,
    beta2_t: f64,
    v: Box<[f64]>,
    s: Box<[f64]>,
    epsilon: f64,
}

impl Adam {
    /// Creates a new `Adam` optimizer.
    ///
    /// # Arguments
    /// * `len` - The amount of parameters this instance should hold.
    /// * `learning_rate` - The small coefficient that modulates the amount of
    ///   training per update.
    /// * `beta1`, `beta2`, `epsilon` - Hyperparameters to the optimization
    ///   algorithm.
    ///
    /// # Returns
    /// A new `Adam` instance.
    pub fn new(len: usize, learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Self {
        Self {
            learning_rate,
            beta1,
            beta2,
            beta1_t: 1.,
            beta2_t: 1.,
            v: vec![0.; len].into_boxed_slice(),
            s: vec![0.; len].into_boxed_slice(),
            epsilon,
        }
    }

    /// Creates an `Adam` with the usual defaults (lr 1e-3, betas 0.9/0.999).
    pub fn with_defaults(len: usize) -> Self {
        Self::new(len, 1e-3, 0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn update_params(&mut self, params: &mut [f64], grad: &[f64]) -> Result<()> {
        if grad.len() != params.len() || params.len() != self.v.len() {
            return Err(ModelError::ShapeMismatch {
                what: "gradient",
                got: grad.len(),
                expected: self.v.len(),
            });
        }

        let Self {
            learning_rate: lr,
            beta1: b1,
            beta2: b2,
            epsilon: eps,
            ..
        } = *self;

        self.beta1_t *= b1;
        self.beta2_t *= b2;

        let bc1 = 1. - self.beta1_t;
        let bc2 = 1. - self.beta2_t;
        let step_size = lr * (bc2.sqrt() / bc1);

        params
            .iter_mut()
            .zip(grad)
            .zip(self.v.iter_mut())
            .zip(self.s.iter_mut())
            .for_each(|(((p, g), v), s)| {
                *v = b1 * *v + (1. - b1) * g;
                *s = b2 * *s + (1. - b2) * g.powi(2);
                *p -= step_size * *v / (s.sqrt() + eps);
            });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_descent_steps_against_the_gradient() {
        let mut params = [1.0, -1.0];
        let mut optimizer = GradientDescent::new(0.5);

        optimizer.update_params(&mut params, &[2.0, -2.0]).unwrap();

        assert_eq!(params, [0.0, 0.0]);
    }

    #[test]
    fn adam_first_step_has_learning_rate_magnitude() {
        let mut params = [0.0];
        let mut optimizer = Adam::new(1, 0.1, 0.9, 0.999, 1e-8);

        optimizer.update_params(&mut params, &[1.0]).unwrap();

        assert!((params[0] + 0.1).abs() < 1e-6, "got {}", params[0]);
    }

    #[test]
    fn adam_accumulates_momentum_across_steps() {
        let mut params = [0.0];
        let mut optimizer = Adam::with_defaults(1);

        optimizer.update_params(&mut params, &[1.0]).unwrap();
        let after_first = params[0];
        optimizer.update_params(&mut params, &[1.0]).unwrap();

        assert!(params[0] < after_first);
    }

    #[test]
    fn mismatched_gradient_length_is_rejected() {
        let mut params = [0.0, 0.0];
        let mut adam = Adam::with_defaults(2);
        let mut gd = GradientDescent::new(0.1);

        assert!(adam.update_params(&mut params, &[1.0]).is_err());
        assert!(gd.update_params(&mut params, &[1.0]).is_err());
    }
}
