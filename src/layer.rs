//! Concrete network layers.
//!
//! Every layer except the output owns a [`Connection`]: the weights (and optional
//! bias) coupling it to the next layer. Column `j` of a connection's weight matrix
//! holds the strengths from every node of this layer to node `j` of the next one.
//!
//! Layers hold no per-pass state; activations flow through
//! [`crate::ForwardTrace`] instead.

use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::activation::ScalarFn;
use crate::{Activation, Error, Matrix, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
/// Initial value of weights and biases.
pub enum Init {
    /// Independent uniform draws in `[0, 1)`.
    #[default]
    Uniform,
    /// Every weight and bias set to the same value.
    Constant(f64),
}

impl Init {
    fn matrix<R: Rng + ?Sized>(self, m: usize, n: usize, rng: &mut R) -> Matrix {
        match self {
            Init::Uniform => {
                let dist = Uniform::new(0.0, 1.0);
                Matrix::from_fn(m, n, |_, _| dist.sample(rng))
            }
            Init::Constant(v) => Matrix::from_fn(m, n, |_, _| v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Weights from one layer to the next.
pub struct Connection {
    /// Shape `(count, next_count)`.
    pub(crate) weights: Matrix,
    /// Shape `(1, next_count)`, present iff bias is enabled.
    pub(crate) bias: Option<Matrix>,
}

impl Connection {
    pub fn new_with_rng<R: Rng + ?Sized>(
        count: usize,
        next_count: usize,
        bias_enabled: bool,
        init: Init,
        rng: &mut R,
    ) -> Self {
        let weights = init.matrix(count, next_count, rng);
        let bias = bias_enabled.then(|| init.matrix(1, next_count, rng));
        Self { weights, bias }
    }

    /// Build from explicit parameters. `bias` must be `1 x weights.cols()`.
    pub fn from_parts(weights: Matrix, bias: Option<Matrix>) -> Result<Self> {
        if let Some(b) = &bias {
            if b.shape() != (1, weights.cols()) {
                return Err(Error::ShapeMismatch(format!(
                    "bias is {}x{}, expected 1x{}",
                    b.rows(),
                    b.cols(),
                    weights.cols()
                )));
            }
        }
        Ok(Self { weights, bias })
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.weights.rows()
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.weights.cols()
    }

    #[inline]
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    #[inline]
    pub fn bias(&self) -> Option<&Matrix> {
        self.bias.as_ref()
    }

    #[inline]
    pub fn bias_enabled(&self) -> bool {
        self.bias.is_some()
    }

    /// Pre-activations of the next layer: `outputs · W (+ b)`.
    ///
    /// `outputs` is the `1 x count` row of this layer's post-activation values.
    pub fn propagate(&self, outputs: &Matrix) -> Result<Matrix> {
        let z = outputs.multiply(&self.weights)?;
        match &self.bias {
            Some(b) => z.add(b),
            None => Ok(z),
        }
    }

    /// `W <- W + lr * dW`, and the same for the bias.
    pub(crate) fn apply(&mut self, grad: &ConnectionGradient, lr: f64) -> Result<()> {
        let weights = self.weights.add(&grad.weights.scale(lr))?;
        let bias = match (&self.bias, &grad.bias) {
            (Some(b), Some(db)) => Some(b.add(&db.scale(lr))?),
            (None, None) => None,
            _ => {
                return Err(Error::ShapeMismatch(
                    "bias gradient does not match connection bias".to_owned(),
                ));
            }
        };
        self.weights = weights;
        self.bias = bias;
        Ok(())
    }

    pub fn is_finite(&self) -> bool {
        self.weights.is_finite() && self.bias.as_ref().is_none_or(Matrix::is_finite)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Weight deltas for one [`Connection`], same shapes as its parameters.
pub struct ConnectionGradient {
    pub weights: Matrix,
    pub bias: Option<Matrix>,
}

#[derive(Debug, Clone)]
pub struct InputLayer {
    count: usize,
    pub(crate) connection: Connection,
}

impl InputLayer {
    pub fn new_with_rng<R: Rng + ?Sized>(
        count: usize,
        next_count: usize,
        bias_enabled: bool,
        init: Init,
        rng: &mut R,
    ) -> Self {
        Self {
            count,
            connection: Connection::new_with_rng(count, next_count, bias_enabled, init, rng),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

#[derive(Debug, Clone)]
pub struct HiddenLayer {
    count: usize,
    activation: Activation,
    pub(crate) f: ScalarFn,
    pub(crate) df: ScalarFn,
    pub(crate) connection: Connection,
}

impl HiddenLayer {
    pub fn new_with_rng<R: Rng + ?Sized>(
        count: usize,
        next_count: usize,
        activation: Activation,
        bias_enabled: bool,
        init: Init,
        rng: &mut R,
    ) -> Self {
        let (f, df) = activation.functions();
        Self {
            count,
            activation,
            f,
            df,
            connection: Connection::new_with_rng(count, next_count, bias_enabled, init, rng),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

#[derive(Debug, Clone)]
pub struct OutputLayer {
    count: usize,
    activation: Activation,
    pub(crate) f: ScalarFn,
    pub(crate) df: ScalarFn,
}

impl OutputLayer {
    pub fn new(count: usize, activation: Activation) -> Self {
        let (f, df) = activation.functions();
        Self {
            count,
            activation,
            f,
            df,
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn uniform_init_has_expected_shapes_and_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let c = Connection::new_with_rng(3, 4, true, Init::Uniform, &mut rng);

        assert_eq!(c.weights().shape(), (3, 4));
        assert_eq!(c.bias().map(Matrix::shape), Some((1, 4)));
        for &v in c.weights().as_slice().iter().chain(c.bias().unwrap().as_slice()) {
            assert!((0.0..1.0).contains(&v), "weight {v} out of [0, 1)");
        }
    }

    #[test]
    fn bias_is_absent_when_disabled() {
        let mut rng = StdRng::seed_from_u64(7);
        let c = Connection::new_with_rng(2, 5, false, Init::Uniform, &mut rng);
        assert!(!c.bias_enabled());
        assert_eq!((c.in_dim(), c.out_dim()), (2, 5));
    }

    #[test]
    fn propagate_adds_bias_to_weighted_sum() {
        let w = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::row_vector(&[0.5, -0.5]);
        let c = Connection::from_parts(w, Some(b)).unwrap();

        let z = c.propagate(&Matrix::row_vector(&[1.0, 1.0])).unwrap();
        assert_eq!(z.as_slice(), &[4.5, 5.5]);

        assert!(matches!(
            c.propagate(&Matrix::row_vector(&[1.0, 1.0, 1.0])),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn from_parts_validates_bias_shape() {
        let w = Matrix::empty(2, 3);
        assert!(Connection::from_parts(w.clone(), Some(Matrix::empty(1, 2))).is_err());
        assert!(Connection::from_parts(w, Some(Matrix::empty(1, 3))).is_ok());
    }

    #[test]
    fn apply_moves_parameters_along_gradient() {
        let mut c = Connection::from_parts(
            Matrix::from_rows(&[vec![1.0, 1.0]]).unwrap(),
            Some(Matrix::row_vector(&[0.0, 0.0])),
        )
        .unwrap();
        let grad = ConnectionGradient {
            weights: Matrix::row_vector(&[2.0, -4.0]),
            bias: Some(Matrix::row_vector(&[1.0, 1.0])),
        };

        c.apply(&grad, 0.5).unwrap();
        assert_eq!(c.weights().as_slice(), &[2.0, -1.0]);
        assert_eq!(c.bias().unwrap().as_slice(), &[0.5, 0.5]);

        let no_bias = ConnectionGradient {
            weights: Matrix::row_vector(&[0.0, 0.0]),
            bias: None,
        };
        assert!(c.apply(&no_bias, 0.5).is_err());
    }

    #[test]
    fn layers_resolve_activation_functions_once() {
        let mut rng = StdRng::seed_from_u64(0);
        let h = HiddenLayer::new_with_rng(2, 1, Activation::Relu, false, Init::Constant(1.0), &mut rng);
        assert_eq!((h.f)(-1.0), 0.0);
        assert_eq!((h.df)(2.0), 1.0);
        assert_eq!(h.connection().weights().as_slice(), &[1.0, 1.0]);

        let o = OutputLayer::new(1, Activation::Sigmoid);
        assert_eq!((o.f)(0.0), 0.5);
    }
}
