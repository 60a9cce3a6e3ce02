//! Activation functions.
//!
//! A layer computes a pre-activation value `z = a_prev · W + b` per node and then
//! applies an activation element-wise: `a = activation(z)`.
//!
//! Topology descriptors name activations by string. The name is resolved exactly
//! once, when the network is built, into an [`Activation`] value stored on the
//! layer. Derivatives are evaluated at the cached pre-activation `z`.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Unary real function, used for both activations and their derivatives.
pub type ScalarFn = fn(f64) -> f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
/// Element-wise activation function.
pub enum Activation {
    #[default]
    Identity,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub const IDENTITY: &'static str = "identity";
    pub const RELU: &'static str = "relu";
    pub const SIGMOID: &'static str = "sigmoid";
    pub const TANH: &'static str = "tanh";

    /// Permissive lookup: unknown names resolve to [`Activation::Identity`].
    ///
    /// A misspelt name in a topology descriptor silently produces a linear layer,
    /// so the fallback is logged. Use [`str::parse`] for a strict lookup.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("unknown activation {name:?}, falling back to identity");
            Activation::Identity
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Activation::Identity => Self::IDENTITY,
            Activation::Relu => Self::RELU,
            Activation::Sigmoid => Self::SIGMOID,
            Activation::Tanh => Self::TANH,
        }
    }

    /// The `(activation, derivative)` pair for this variant.
    pub fn functions(self) -> (ScalarFn, ScalarFn) {
        match self {
            Activation::Identity => (identity, identity_delta),
            Activation::Relu => (relu, relu_delta),
            Activation::Sigmoid => (sigmoid, sigmoid_delta),
            Activation::Tanh => (tanh, tanh_delta),
        }
    }

    #[inline]
    pub fn apply(self, z: f64) -> f64 {
        match self {
            Activation::Identity => identity(z),
            Activation::Relu => relu(z),
            Activation::Sigmoid => sigmoid(z),
            Activation::Tanh => z.tanh(),
        }
    }

    /// Derivative with respect to the pre-activation input `z`.
    #[inline]
    pub fn derivative(self, z: f64) -> f64 {
        match self {
            Activation::Identity => identity_delta(z),
            Activation::Relu => relu_delta(z),
            Activation::Sigmoid => sigmoid_delta(z),
            Activation::Tanh => tanh_delta(z),
        }
    }
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            Self::IDENTITY => Ok(Activation::Identity),
            Self::RELU => Ok(Activation::Relu),
            Self::SIGMOID => Ok(Activation::Sigmoid),
            Self::TANH => Ok(Activation::Tanh),
            other => Err(Error::InvalidConfig(format!(
                "unknown activation function {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
pub fn identity(x: f64) -> f64 {
    x
}

#[inline]
pub fn identity_delta(_x: f64) -> f64 {
    1.0
}

#[inline]
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

#[inline]
pub fn relu_delta(x: f64) -> f64 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

#[inline]
pub fn sigmoid(x: f64) -> f64 {
    // Numerically stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

#[inline]
pub fn sigmoid_delta(x: f64) -> f64 {
    let s = sigmoid(x);
    s * (1.0 - s)
}

#[inline]
fn tanh(x: f64) -> f64 {
    x.tanh()
}

#[inline]
fn tanh_delta(x: f64) -> f64 {
    let t = x.tanh();
    1.0 - t * t
}
