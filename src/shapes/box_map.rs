//! Affine box mapping

use crate::linalg::MAX_DIM;
use crate::traits::{MapEvaluation, Mapping};
use crate::types::{GridError, RealScalar, Result};

/// Affine map from the reference box \[-1,1\]^d to the box `[xmin, xmax]`
///
/// The map has no curvature, so every evaluation is homogeneous.
#[derive(Debug, Clone, Copy)]
pub struct BoxMap<T: RealScalar> {
    dim: usize,
    xmin: [T; MAX_DIM],
    half_length: [T; MAX_DIM],
}

impl<T: RealScalar> BoxMap<T> {
    /// Create a box map
    pub fn new(xmin: &[T], xmax: &[T]) -> Result<Self> {
        let dim = xmin.len();
        if dim != 2 && dim != 3 {
            return Err(GridError::InvalidDimension(dim));
        }
        if xmax.len() != dim {
            return Err(GridError::LengthMismatch {
                expected: dim,
                found: xmax.len(),
            });
        }
        let two = T::from(2.0).unwrap();
        let mut lo = [T::zero(); MAX_DIM];
        let mut half_length = [T::zero(); MAX_DIM];
        for d in 0..dim {
            if xmin[d] >= xmax[d] {
                return Err(GridError::InvalidBounds { dim: d });
            }
            lo[d] = xmin[d];
            half_length[d] = (xmax[d] - xmin[d]) / two;
        }
        Ok(Self {
            dim,
            xmin: lo,
            half_length,
        })
    }
}

impl<T: RealScalar> Mapping for BoxMap<T> {
    type T = T;

    fn dim(&self) -> usize {
        self.dim
    }

    fn evaluate(&self, u: &[T], _second_derivatives: bool) -> MapEvaluation<T> {
        assert_eq!(u.len(), self.dim);
        let mut x = [T::zero(); MAX_DIM];
        let mut dxdu = [[T::zero(); MAX_DIM]; MAX_DIM];
        for d in 0..self.dim {
            x[d] = self.xmin[d] + (T::one() + u[d]) * self.half_length[d];
            dxdu[d][d] = self.half_length[d];
        }
        MapEvaluation {
            x,
            dxdu,
            ddxdu: None,
        }
    }
}
