//! Map from reference to physical space.

use crate::linalg::MAX_DIM;
use crate::metrics::SecondDerivatives;
use crate::types::RealScalar;

/// Position and derivatives of a mapping at a reference point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapEvaluation<T: RealScalar> {
    /// Physical position; entries beyond the dimension are zero
    pub x: [T; MAX_DIM],
    /// `dxdu[a]` is the derivative `dx/du_a`
    pub dxdu: [[T; MAX_DIM]; MAX_DIM],
    /// Second derivatives; `None` marks a homogeneous point
    pub ddxdu: Option<SecondDerivatives<T>>,
}

pub trait Mapping: Sync {
    //! Transfinite mapping from reference coordinates to physical coordinates

    /// Scalar type
    type T: RealScalar;

    /// The dimension of both the reference and the physical space
    fn dim(&self) -> usize;

    /// Evaluate the position and its first derivatives at `u`
    ///
    /// If `second_derivatives` is true, implementations that have curvature information must also
    /// fill `ddxdu`. Returning `None` there declares the point homogeneous.
    fn evaluate(&self, u: &[Self::T], second_derivatives: bool) -> MapEvaluation<Self::T>;
}
