//! Dense row-major matrices.
//!
//! `Matrix` is the numeric foundation of the network: weights are stored as
//! `(count, next_count)` matrices and per-example activations travel as `1 x count`
//! row vectors.
//!
//! Every operation is pure: it returns a fresh `Matrix` and never mutates its
//! operands. Shape errors are reported as [`Error::ShapeMismatch`].

use std::fmt;

use crate::matmul::gemm_f64;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    m: usize,
    n: usize,
    /// Row-major buffer with `m * n` entries.
    data: Vec<f64>,
}

impl Matrix {
    /// Build an `m x n` matrix from a flat row-major buffer.
    pub fn new(m: usize, n: usize, data: Vec<f64>) -> Result<Self> {
        let expected = m
            .checked_mul(n)
            .ok_or_else(|| Error::ShapeMismatch(format!("{m} x {n} overflows usize")))?;
        if data.len() != expected {
            return Err(Error::ShapeMismatch(format!(
                "data length {} does not match {m} x {n}",
                data.len()
            )));
        }
        Ok(Self { m, n, data })
    }

    /// Build a matrix from per-row vectors. Every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let m = rows.len();
        let n = rows.first().map_or(0, Vec::len);

        let mut data = Vec::with_capacity(m * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::ShapeMismatch(format!(
                    "row {i} has len {}, expected {n}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self { m, n, data })
    }

    /// Zero-filled `m x n` matrix.
    ///
    /// # Panics
    ///
    /// If `m * n` overflows `usize`.
    pub fn empty(m: usize, n: usize) -> Self {
        Self {
            m,
            n,
            data: vec![0.0; element_count(m, n)],
        }
    }

    /// `m x n` matrix whose entry `(i, j)` is `f(i, j)`, filled in row-major order.
    ///
    /// # Panics
    ///
    /// If `m * n` overflows `usize`.
    pub fn from_fn<F: FnMut(usize, usize) -> f64>(m: usize, n: usize, mut f: F) -> Self {
        let mut data = Vec::with_capacity(element_count(m, n));
        for i in 0..m {
            for j in 0..n {
                data.push(f(i, j));
            }
        }
        Self { m, n, data }
    }

    /// `1 x values.len()` matrix.
    pub fn row_vector(values: &[f64]) -> Self {
        Self {
            m: 1,
            n: values.len(),
            data: values.to_vec(),
        }
    }

    /// `values.len() x 1` matrix.
    pub fn column_vector(values: &[f64]) -> Self {
        Self {
            m: values.len(),
            n: 1,
            data: values.to_vec(),
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.m
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    /// Returns the entry at `(i, j)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.m && j < self.n {
            Some(self.data[i * self.n + j])
        } else {
            None
        }
    }

    /// Returns row `i`.
    ///
    /// Panics if `i >= rows()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the matrix and return its row-major buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// True if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "subtract", |a, b| a - b)
    }

    /// Elementwise (Hadamard) product.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix> {
        self.zip_with(other, "hadamard", |a, b| a * b)
    }

    /// Standard matrix product. Requires `self.cols() == other.rows()`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.n != other.m {
            return Err(Error::ShapeMismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                self.m, self.n, other.m, other.n
            )));
        }

        let mut result = Matrix::empty(self.m, other.n);
        gemm_f64(
            self.m,
            other.n,
            self.n,
            &self.data,
            &other.data,
            &mut result.data,
        );
        Ok(result)
    }

    pub fn scale(&self, s: f64) -> Matrix {
        self.map(|v| v * s)
    }

    pub fn transpose(&self) -> Matrix {
        let mut result = Matrix::empty(self.n, self.m);
        for i in 0..self.m {
            for j in 0..self.n {
                result.data[j * self.m + i] = self.data[i * self.n + j];
            }
        }
        result
    }

    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Matrix {
        Matrix {
            m: self.m,
            n: self.n,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Matrix, op: &str, f: F) -> Result<Matrix> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch(format!(
                "cannot {op} {}x{} and {}x{}",
                self.m, self.n, other.m, other.n
            )));
        }

        Ok(Matrix {
            m: self.m,
            n: self.n,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }
}

/// `m * n`, panicking on overflow.
fn element_count(m: usize, n: usize) -> usize {
    match m.checked_mul(n) {
        Some(len) => len,
        None => panic!("matrix shape {m} x {n} overflows usize"),
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{m: {}, n: {}", self.m, self.n)?;
        for i in 0..self.m {
            write!(f, "[")?;
            for (j, v) in self.row(i).iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{v}")?;
            }
            write!(f, "]")?;
            if i + 1 < self.m {
                writeln!(f, ",")?;
            }
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
        Matrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
    }

    #[test]
    fn new_validates_buffer_length() {
        assert!(Matrix::new(2, 3, vec![0.0; 6]).is_ok());
        assert!(matches!(
            Matrix::new(2, 3, vec![0.0; 5]),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn empty_is_zero_filled() {
        let z = Matrix::empty(3, 2);
        assert_eq!(z.shape(), (3, 2));
        assert!(z.as_slice().iter().all(|&v| v == 0.0));

        let none = Matrix::empty(0, 4);
        assert_eq!(none.shape(), (0, 4));
        assert!(none.as_slice().is_empty());
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn empty_panics_on_overflowing_shape() {
        let _ = Matrix::empty(usize::MAX, 2);
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn from_fn_panics_on_overflowing_shape() {
        let _ = Matrix::from_fn(2, usize::MAX, |_, _| 0.0);
    }

    #[test]
    fn into_vec_returns_row_major_buffer() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(a.clone().into_vec(), a.as_slice().to_vec());
        assert_eq!(a.into_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn add_and_subtract_are_elementwise() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let c = m(&[&[10.0, 9.0, 8.0], &[7.0, 6.0, 5.0]]);

        assert_eq!(a.add(&c).unwrap(), m(&[&[11.0; 3], &[11.0; 3]]));
        assert_eq!(
            c.subtract(&a).unwrap(),
            m(&[&[9.0, 7.0, 5.0], &[3.0, 1.0, -1.0]])
        );
    }

    #[test]
    fn add_is_commutative_and_associative() {
        let a = m(&[&[0.5, -1.0], &[2.0, 3.25]]);
        let b = m(&[&[1.5, 4.0], &[-2.0, 0.75]]);
        let c = m(&[&[0.25, 0.5], &[8.0, -4.0]]);

        assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
        assert_eq!(
            a.add(&b).unwrap().add(&c).unwrap(),
            a.add(&b.add(&c).unwrap()).unwrap()
        );
    }

    #[test]
    fn elementwise_ops_reject_shape_mismatch() {
        let a = Matrix::empty(2, 3);
        let b = Matrix::empty(3, 2);
        assert!(matches!(a.add(&b), Err(Error::ShapeMismatch(_))));
        assert!(matches!(a.subtract(&b), Err(Error::ShapeMismatch(_))));
        assert!(matches!(a.hadamard(&b), Err(Error::ShapeMismatch(_))));
    }

    #[test]
    fn multiply_computes_product_and_shape() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = m(&[&[7.0, 8.0], &[9.0, 10.0], &[11.0, 12.0]]);

        let p = a.multiply(&b).unwrap();
        assert_eq!(p.shape(), (2, 2));
        assert_eq!(p, m(&[&[58.0, 64.0], &[139.0, 154.0]]));

        let q = b.multiply(&a).unwrap();
        assert_eq!(q.shape(), (3, 3));
    }

    #[test]
    fn multiply_rejects_incompatible_inner_dims() {
        let a = Matrix::empty(2, 3);
        let err = a.multiply(&a).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
        assert!(format!("{err}").contains("2x3"));
    }

    #[test]
    fn multiply_is_associative_on_exact_values() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[0.5, -1.0, 2.0], &[1.0, 0.0, -0.5]]);
        let c = m(&[&[2.0], &[-1.0], &[4.0]]);

        let left = a.multiply(&b).unwrap().multiply(&c).unwrap();
        let right = a.multiply(&b.multiply(&c).unwrap()).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn transpose_swaps_indices_and_is_an_involution() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let t = a.transpose();

        assert_eq!(t.shape(), (3, 2));
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(t.get(j, i), a.get(i, j));
            }
        }
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn scale_and_map() {
        let a = m(&[&[1.0, -2.0], &[3.0, -4.0]]);
        assert_eq!(a.scale(1.0), a);
        assert_eq!(a.scale(2.0), m(&[&[2.0, -4.0], &[6.0, -8.0]]));
        assert_eq!(a.map(|v| v.max(0.0)), m(&[&[1.0, 0.0], &[3.0, 0.0]]));
    }

    #[test]
    fn operations_do_not_mutate_operands() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let before = a.clone();
        let _ = a.add(&a).unwrap();
        let _ = a.multiply(&a).unwrap();
        let _ = a.transpose();
        let _ = a.scale(3.0);
        assert_eq!(a, before);
    }

    #[test]
    fn display_lists_rows() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        assert_eq!(format!("{a}"), "{m: 2, n: 2\n[1, 2],\n[3, 4]}");
    }

    #[test]
    fn row_and_column_vectors() {
        let r = Matrix::row_vector(&[1.0, 2.0, 3.0]);
        let c = Matrix::column_vector(&[1.0, 2.0, 3.0]);
        assert_eq!(r.shape(), (1, 3));
        assert_eq!(c.shape(), (3, 1));
        assert_eq!(r.transpose(), c);
        assert_eq!(r.multiply(&c).unwrap().as_slice(), &[14.0]);
    }
}
