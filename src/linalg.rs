//! Fixed-size dense linear algebra for metric computations
//!
//! Vectors, matrices and rank-3 tensors of dimension at most [`MAX_DIM`] are stored in fixed-size
//! arrays together with their active dimension, so no heap allocation happens per grid node.

use crate::types::{GridError, RealScalar, Result};
use std::ops::{Index, IndexMut};

/// Largest supported dimension
pub const MAX_DIM: usize = 3;

/// Default absolute tolerance on the determinant used by [`SmallMatrix::inverse`]
pub const SINGULAR_TOLERANCE: f64 = 1e-13;

/// Dot product of two vectors of equal length
pub fn dot<T: RealScalar>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (x, y)| acc + *x * *y)
}

/// Copy a slice into a zero-padded fixed-size array
pub(crate) fn padded<T: RealScalar>(values: &[T]) -> [T; MAX_DIM] {
    let mut out = [T::zero(); MAX_DIM];
    out[..values.len()].copy_from_slice(values);
    out
}

/// A square matrix of dimension 1, 2 or 3
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmallMatrix<T: RealScalar> {
    dim: usize,
    data: [[T; MAX_DIM]; MAX_DIM],
}

impl<T: RealScalar> SmallMatrix<T> {
    /// Create a zero matrix
    pub fn zeros(dim: usize) -> Self {
        assert!(
            (1..=MAX_DIM).contains(&dim),
            "SmallMatrix dimension must be between 1 and {MAX_DIM}"
        );
        Self {
            dim,
            data: [[T::zero(); MAX_DIM]; MAX_DIM],
        }
    }

    /// Create an identity matrix
    pub fn identity(dim: usize) -> Self {
        let mut m = Self::zeros(dim);
        for i in 0..dim {
            m.data[i][i] = T::one();
        }
        m
    }

    /// Create a matrix from its rows
    pub fn from_rows(rows: &[&[T]]) -> Result<Self> {
        let dim = rows.len();
        if !(1..=MAX_DIM).contains(&dim) {
            return Err(GridError::InvalidDimension(dim));
        }
        let mut m = Self::zeros(dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(GridError::LengthMismatch {
                    expected: dim,
                    found: row.len(),
                });
            }
            m.data[i][..dim].copy_from_slice(row);
        }
        Ok(m)
    }

    /// The dimension of the matrix
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Set an entry and its transpose
    pub fn set_symmetric(&mut self, i: usize, j: usize, value: T) {
        self[[i, j]] = value;
        self[[j, i]] = value;
    }

    /// A row of the matrix
    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.dim);
        &self.data[i][..self.dim]
    }

    /// Copy the entries into nested vectors, row by row
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        (0..self.dim).map(|i| self.row(i).to_vec()).collect()
    }

    /// Matrix product `self * other`
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.dim, other.dim);
        let mut out = Self::zeros(self.dim);
        for i in 0..self.dim {
            for j in 0..self.dim {
                out.data[i][j] = (0..self.dim)
                    .fold(T::zero(), |acc, l| acc + self.data[i][l] * other.data[l][j]);
            }
        }
        out
    }

    /// Largest absolute difference from the transpose
    pub fn asymmetry(&self) -> T {
        let mut max = T::zero();
        for i in 0..self.dim {
            for j in i + 1..self.dim {
                max = max.max((self.data[i][j] - self.data[j][i]).abs());
            }
        }
        max
    }

    /// The determinant
    pub fn det(&self) -> T {
        let a = &self.data;
        match self.dim {
            1 => a[0][0],
            2 => a[0][0] * a[1][1] - a[0][1] * a[1][0],
            3 => {
                a[0][0] * (a[1][1] * a[2][2] - a[1][2] * a[2][1])
                    - a[0][1] * (a[1][0] * a[2][2] - a[1][2] * a[2][0])
                    + a[0][2] * (a[1][0] * a[2][1] - a[1][1] * a[2][0])
            }
            _ => unreachable!(),
        }
    }

    /// Compute the inverse and the determinant
    ///
    /// Returns [`GridError::SingularMatrix`] if `|det| < tolerance` or the determinant is not finite.
    pub fn inverse(&self, tolerance: T) -> Result<(Self, T)> {
        let det = self.det();
        if !det.is_finite() || det.abs() < tolerance {
            return Err(GridError::SingularMatrix {
                det: det.to_f64().unwrap_or(f64::NAN),
            });
        }
        let a = &self.data;
        let mut inv = Self::zeros(self.dim);
        match self.dim {
            1 => {
                inv.data[0][0] = T::one() / det;
            }
            2 => {
                inv.data[0][0] = a[1][1] / det;
                inv.data[0][1] = -a[0][1] / det;
                inv.data[1][0] = -a[1][0] / det;
                inv.data[1][1] = a[0][0] / det;
            }
            3 => {
                inv.data[0][0] = (a[1][1] * a[2][2] - a[1][2] * a[2][1]) / det;
                inv.data[0][1] = (a[0][2] * a[2][1] - a[0][1] * a[2][2]) / det;
                inv.data[0][2] = (a[0][1] * a[1][2] - a[0][2] * a[1][1]) / det;
                inv.data[1][0] = (a[1][2] * a[2][0] - a[1][0] * a[2][2]) / det;
                inv.data[1][1] = (a[0][0] * a[2][2] - a[0][2] * a[2][0]) / det;
                inv.data[1][2] = (a[0][2] * a[1][0] - a[0][0] * a[1][2]) / det;
                inv.data[2][0] = (a[1][0] * a[2][1] - a[1][1] * a[2][0]) / det;
                inv.data[2][1] = (a[0][1] * a[2][0] - a[0][0] * a[2][1]) / det;
                inv.data[2][2] = (a[0][0] * a[1][1] - a[0][1] * a[1][0]) / det;
            }
            _ => unreachable!(),
        }
        Ok((inv, det))
    }
}

impl<T: RealScalar> Index<[usize; 2]> for SmallMatrix<T> {
    type Output = T;

    fn index(&self, [i, j]: [usize; 2]) -> &T {
        assert!(i < self.dim && j < self.dim, "SmallMatrix index out of range");
        &self.data[i][j]
    }
}

impl<T: RealScalar> IndexMut<[usize; 2]> for SmallMatrix<T> {
    fn index_mut(&mut self, [i, j]: [usize; 2]) -> &mut T {
        assert!(i < self.dim && j < self.dim, "SmallMatrix index out of range");
        &mut self.data[i][j]
    }
}

/// A rank-3 tensor `t[k][i][j]` of dimension 1, 2 or 3
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmallTensor3<T: RealScalar> {
    dim: usize,
    data: [[[T; MAX_DIM]; MAX_DIM]; MAX_DIM],
}

impl<T: RealScalar> SmallTensor3<T> {
    /// Create a zero tensor
    pub fn zeros(dim: usize) -> Self {
        assert!(
            (1..=MAX_DIM).contains(&dim),
            "SmallTensor3 dimension must be between 1 and {MAX_DIM}"
        );
        Self {
            dim,
            data: [[[T::zero(); MAX_DIM]; MAX_DIM]; MAX_DIM],
        }
    }

    /// The dimension of the tensor
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Set `t[k][i][j]` and `t[k][j][i]`
    pub fn set_symmetric(&mut self, k: usize, i: usize, j: usize, value: T) {
        self[[k, i, j]] = value;
        self[[k, j, i]] = value;
    }

    /// Copy the entries into nested vectors indexed `[k][i][j]`
    pub fn to_nested(&self) -> Vec<Vec<Vec<T>>> {
        (0..self.dim)
            .map(|k| {
                (0..self.dim)
                    .map(|i| self.data[k][i][..self.dim].to_vec())
                    .collect()
            })
            .collect()
    }
}

impl<T: RealScalar> Index<[usize; 3]> for SmallTensor3<T> {
    type Output = T;

    fn index(&self, [k, i, j]: [usize; 3]) -> &T {
        assert!(
            k < self.dim && i < self.dim && j < self.dim,
            "SmallTensor3 index out of range"
        );
        &self.data[k][i][j]
    }
}

impl<T: RealScalar> IndexMut<[usize; 3]> for SmallTensor3<T> {
    fn index_mut(&mut self, [k, i, j]: [usize; 3]) -> &mut T {
        assert!(
            k < self.dim && i < self.dim && j < self.dim,
            "SmallTensor3 index out of range"
        );
        &mut self.data[k][i][j]
    }
}
