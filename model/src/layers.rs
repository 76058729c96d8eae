use ndarray::{linalg, prelude::*};

use crate::{ActFn, ModelError, Result};

/// A fully connected layer computing `x · w + b` over a flat parameter
/// slice, with an optional elementwise activation.
///
/// The training path ([`Dense::forward`] / [`Dense::backward`]) caches the
/// input and pre-activation between passes; [`Dense::apply`] is a pure
/// inference path that caches nothing.
#[derive(Debug, Clone)]
pub struct Dense {
    dim: (usize, usize),
    act_fn: Option<ActFn>,
    size: usize,

    // Forward metadata consumed by the next backward pass.
    x: Array2<f64>,
    z: Array2<f64>,
}

impl Dense {
    /// Creates a new `Dense`.
    ///
    /// # Arguments
    /// * `dim` - The (input, output) widths of the layer.
    /// * `act_fn` - An optional activation applied after the affine map.
    pub fn new(dim: (usize, usize), act_fn: Option<ActFn>) -> Self {
        Self {
            dim,
            size: (dim.0 + 1) * dim.1,
            act_fn,
            x: Array2::zeros((0, 0)),
            z: Array2::zeros((0, 0)),
        }
    }

    /// Returns the size of this layer.
    ///
    /// # Returns
    /// The amount of parameters this layer has.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    /// Training forward pass: computes the layer output and caches the
    /// state the next [`Dense::backward`] call needs.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` when `params` or `x` disagree
    /// with the layer dimensions.
    pub fn forward(&mut self, params: &[f64], x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let z = self.affine(params, x)?;
        self.x = x.to_owned();
        self.z = z.clone();
        Ok(self.activate(z))
    }

    /// Inference pass: same computation as [`Dense::forward`] without
    /// touching the cached training state.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` when `params` or `x` disagree
    /// with the layer dimensions.
    pub fn apply(&self, params: &[f64], x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let z = self.affine(params, x)?;
        Ok(self.activate(z))
    }

    /// Backward pass: writes this layer's gradient into `grad` and returns
    /// the error signal for the previous layer.
    ///
    /// Must follow a [`Dense::forward`] call on the same batch.
    ///
    /// # Errors
    /// Returns `ModelError::ShapeMismatch` when the slices disagree with the
    /// layer dimensions.
    pub fn backward(
        &mut self,
        params: &[f64],
        grad: &mut [f64],
        mut d: Array2<f64>,
    ) -> Result<Array2<f64>> {
        self.check_slice("layer params", params.len())?;
        self.check_slice("layer grad", grad.len())?;

        if let Some(act_fn) = self.act_fn {
            d.zip_mut_with(&self.z, |dv, &z| *dv *= act_fn.df(z));
        }

        let (mut dw, mut db) = self.view_grad(grad);
        linalg::general_mat_mul(1.0, &self.x.t(), &d, 0.0, &mut dw);
        db.assign(&d.sum_axis(Axis(0)));

        let (w, _) = self.view_params(params);
        let mut upstream = Array2::zeros((d.nrows(), self.dim.0));
        linalg::general_mat_mul(1.0, &d, &w.t(), 0.0, &mut upstream);

        Ok(upstream)
    }

    fn affine(&self, params: &[f64], x: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_slice("layer params", params.len())?;
        if x.ncols() != self.dim.0 {
            return Err(ModelError::ShapeMismatch {
                what: "layer input",
                got: x.ncols(),
                expected: self.dim.0,
            });
        }

        let (w, b) = self.view_params(params);
        let mut z = Array2::zeros((x.nrows(), self.dim.1));
        linalg::general_mat_mul(1.0, &x, &w, 0.0, &mut z);
        z += &b;

        Ok(z)
    }

    fn activate(&self, z: Array2<f64>) -> Array2<f64> {
        match self.act_fn {
            Some(act_fn) => z.mapv(|v| act_fn.f(v)),
            None => z,
        }
    }

    fn check_slice(&self, what: &'static str, got: usize) -> Result<()> {
        if got != self.size {
            return Err(ModelError::ShapeMismatch {
                what,
                got,
                expected: self.size,
            });
        }

        Ok(())
    }

    /// Gives a view of the raw parameter slice as the weights and biases of
    /// this layer.
    ///
    /// # Arguments
    /// * `params` - A slice of parameters, already checked for size.
    ///
    /// # Returns
    /// A tuple containing the weights and biases.
    fn view_params<'a>(&self, params: &'a [f64]) -> (ArrayView2<'a, f64>, ArrayView1<'a, f64>) {
        let w_size = self.size - self.dim.1;
        let weights = ArrayView2::from_shape(self.dim, &params[..w_size]).unwrap();
        let biases = ArrayView1::from_shape(self.dim.1, &params[w_size..]).unwrap();
        (weights, biases)
    }

    /// Gives a view of the raw gradient slice as the delta weights and delta
    /// biases of this layer.
    ///
    /// # Arguments
    /// * `grad` - A gradient slice, already checked for size.
    ///
    /// # Returns
    /// A tuple containing the delta weights and delta biases.
    fn view_grad<'a>(
        &self,
        grad: &'a mut [f64],
    ) -> (ArrayViewMut2<'a, f64>, ArrayViewMut1<'a, f64>) {
        let w_size = self.size - self.dim.1;
        let (dw_raw, db_raw) = grad.split_at_mut(w_size);
        let dw = ArrayViewMut2::from_shape(self.dim, dw_raw).unwrap();
        let db = ArrayViewMut1::from_shape(self.dim.1, db_raw).unwrap();
        (dw, db)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn size_counts_weights_and_biases() {
        assert_eq!(Dense::new((1, 50), None).size(), 100);
        assert_eq!(Dense::new((50, 50), Some(ActFn::Sigmoid)).size(), 2550);
        assert_eq!(Dense::new((50, 1), None).size(), 51);
    }

    #[test]
    fn forward_computes_the_affine_map() {
        let mut layer = Dense::new((2, 1), None);
        // w = [3, 4]ᵀ, b = [10]
        let params = [3.0, 4.0, 10.0];
        let out = layer.forward(&params, array![[1.0, 2.0]].view()).unwrap();

        assert_eq!(out, array![[1.0 * 3.0 + 2.0 * 4.0 + 10.0]]);
    }

    #[test]
    fn apply_matches_forward() {
        let mut layer = Dense::new((2, 2), Some(ActFn::Sigmoid));
        let params = [0.5, -0.5, 1.0, 0.25, 0.1, -0.1];
        let x = array![[0.3, 0.7], [1.0, 0.0]];

        let trained = layer.forward(&params, x.view()).unwrap();
        let inferred = layer.apply(&params, x.view()).unwrap();

        assert_eq!(trained, inferred);
    }

    #[test]
    fn backward_produces_the_expected_gradient() {
        let mut layer = Dense::new((1, 1), None);
        // w = [2], b = [1]
        let params = [2.0, 1.0];
        let mut grad = [0.0, 0.0];

        layer.forward(&params, array![[3.0]].view()).unwrap();
        let upstream = layer
            .backward(&params, &mut grad, array![[5.0]])
            .unwrap();

        assert_eq!(grad, [15.0, 5.0]); // dw = x·d, db = d
        assert_eq!(upstream, array![[10.0]]); // d·wᵀ
    }

    #[test]
    fn wrong_input_width_is_rejected() {
        let mut layer = Dense::new((2, 1), None);
        let params = [0.0, 0.0, 0.0];

        assert!(layer.forward(&params, array![[1.0]].view()).is_err());
        assert!(layer.apply(&params, array![[1.0]].view()).is_err());
    }

    #[test]
    fn wrong_param_count_is_rejected() {
        let layer = Dense::new((2, 1), None);
        assert!(layer.apply(&[0.0], array![[1.0, 2.0]].view()).is_err());
    }
}
