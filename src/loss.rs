//! Error functions.
//!
//! The network reports a *signed* per-output error rather than a squared loss:
//! training moves each output toward its target, so the sign of
//! `expected - actual` is what drives the backward pass.
//!
//! - [`ErrorFunction`] maps `(actual, expected)` to a signed error per output node.
//! - [`matrix_average_difference`] reduces a whole output column to one scalar,
//!   used as the convergence metric of the training loop.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Matrix, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
/// Per-node error function.
pub enum ErrorFunction {
    /// `expected - actual`.
    #[default]
    Difference,
}

impl ErrorFunction {
    pub const DIFFERENCE: &'static str = "difference";

    /// Permissive lookup: unknown names resolve to [`ErrorFunction::Difference`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("unknown error function {name:?}, falling back to difference");
            ErrorFunction::Difference
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorFunction::Difference => Self::DIFFERENCE,
        }
    }

    #[inline]
    pub fn signed_error(self, actual: f64, expected: f64) -> f64 {
        match self {
            ErrorFunction::Difference => difference(actual, expected),
        }
    }

    /// Applies the error function node by node.
    pub fn errors(self, actual: &[f64], expected: &[f64]) -> Result<Vec<f64>> {
        if actual.len() != expected.len() {
            return Err(Error::ShapeMismatch(format!(
                "actual len {} does not match expected len {}",
                actual.len(),
                expected.len()
            )));
        }

        Ok(actual
            .iter()
            .zip(expected)
            .map(|(&a, &e)| self.signed_error(a, e))
            .collect())
    }
}

impl FromStr for ErrorFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            Self::DIFFERENCE => Ok(ErrorFunction::Difference),
            other => Err(Error::InvalidConfig(format!(
                "unknown error function {other:?}"
            ))),
        }
    }
}

impl fmt::Display for ErrorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[inline]
pub fn difference(actual: f64, expected: f64) -> f64 {
    expected - actual
}

/// Mean of `expected - actual` over two `(m, 1)` column matrices.
///
/// Fails with [`Error::ShapeMismatch`] if either input has more than one column,
/// if the row counts differ, or if there are no rows to average.
pub fn matrix_average_difference(actual: &Matrix, expected: &Matrix) -> Result<f64> {
    if actual.cols() != 1 || expected.cols() != 1 {
        return Err(Error::ShapeMismatch(format!(
            "expected (m, 1) columns, got {}x{} and {}x{}",
            actual.rows(),
            actual.cols(),
            expected.rows(),
            expected.cols()
        )));
    }
    if actual.rows() != expected.rows() {
        return Err(Error::ShapeMismatch(format!(
            "actual has {} rows, expected has {}",
            actual.rows(),
            expected.rows()
        )));
    }
    if actual.rows() == 0 {
        return Err(Error::ShapeMismatch(
            "cannot average an empty column".to_owned(),
        ));
    }

    let sum: f64 = actual
        .as_slice()
        .iter()
        .zip(expected.as_slice())
        .map(|(&a, &e)| difference(a, e))
        .sum();
    Ok(sum / actual.rows() as f64)
}
