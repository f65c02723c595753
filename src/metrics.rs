//! Differential geometry at a point of a curvilinear coordinate system
//!
//! Given the reference coordinates `u`, the physical position `x`, the covariant basis
//! `g_a = dx/du_a` and optionally the second derivatives `d²x/(du_a du_b)`, a [`Metrics`] holds
//! the covariant metric `g_ij = g_i · g_j`, its inverse `g^ij`, the determinant of `g_ij` and, if
//! second derivatives were given, the Christoffel symbols of the second kind `Γ^k_ij` and the
//! L-coefficients `L^k = Γ^k_ij g^ij`.

use crate::linalg::{dot, padded, SmallMatrix, SmallTensor3, MAX_DIM, SINGULAR_TOLERANCE};
use crate::types::{to_f64_vec, GridError, RealScalar, Result};
use itertools::Itertools;

/// Check that the dimension is 2 or 3
pub(crate) fn check_dim(dim: usize) -> Result<()> {
    if dim == 2 || dim == 3 {
        Ok(())
    } else {
        Err(GridError::InvalidDimension(dim))
    }
}

fn check_finite<T: RealScalar>(values: &[T]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(dim) => Err(GridError::NonFiniteCoordinate { dim }),
        None => Ok(()),
    }
}

fn check_len<T>(values: &[T], dim: usize) -> Result<()> {
    if values.len() == dim {
        Ok(())
    } else {
        Err(GridError::LengthMismatch {
            expected: dim,
            found: values.len(),
        })
    }
}

/// Second derivatives `d²x/(du_a du_b)` of a mapping at a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondDerivatives<T: RealScalar> {
    dim: usize,
    values: [[[T; MAX_DIM]; MAX_DIM]; MAX_DIM],
}

impl<T: RealScalar> SecondDerivatives<T> {
    /// Create a set of second derivatives with every entry zero
    pub fn zeros(dim: usize) -> Result<Self> {
        check_dim(dim)?;
        Ok(Self {
            dim,
            values: [[[T::zero(); MAX_DIM]; MAX_DIM]; MAX_DIM],
        })
    }

    /// Create from `d²x/dr²`, `d²x/ds²` and `d²x/drds`
    pub fn new_2d(ddxdrr: &[T], ddxdss: &[T], ddxdrs: &[T]) -> Result<Self> {
        let mut d = Self::zeros(2)?;
        d.set(0, 0, ddxdrr)?;
        d.set(1, 1, ddxdss)?;
        d.set(0, 1, ddxdrs)?;
        Ok(d)
    }

    /// Create from `d²x/dr²`, `d²x/ds²`, `d²x/dt²`, `d²x/drds`, `d²x/drdt` and `d²x/dsdt`
    pub fn new_3d(
        ddxdrr: &[T],
        ddxdss: &[T],
        ddxdtt: &[T],
        ddxdrs: &[T],
        ddxdrt: &[T],
        ddxdst: &[T],
    ) -> Result<Self> {
        let mut d = Self::zeros(3)?;
        d.set(0, 0, ddxdrr)?;
        d.set(1, 1, ddxdss)?;
        d.set(2, 2, ddxdtt)?;
        d.set(0, 1, ddxdrs)?;
        d.set(0, 2, ddxdrt)?;
        d.set(1, 2, ddxdst)?;
        Ok(d)
    }

    /// The dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Set `d²x/(du_a du_b)`; the pair `(b, a)` is set too
    pub fn set(&mut self, a: usize, b: usize, value: &[T]) -> Result<()> {
        if a >= self.dim || b >= self.dim {
            return Err(GridError::DimensionMismatch {
                expected: self.dim,
                found: a.max(b) + 1,
            });
        }
        check_len(value, self.dim)?;
        self.values[a][b] = padded(value);
        self.values[b][a] = padded(value);
        Ok(())
    }

    /// Get `d²x/(du_a du_b)`
    pub fn get(&self, a: usize, b: usize) -> &[T] {
        assert!(a < self.dim && b < self.dim);
        &self.values[a][b][..self.dim]
    }
}

/// Christoffel symbols and L-coefficients, present only for non-homogeneous points
#[derive(Debug, Clone, Copy, PartialEq)]
struct Curvature<T: RealScalar> {
    gamma_s: SmallTensor3<T>,
    l: [T; MAX_DIM],
}

/// Metrics at a point of a curvilinear coordinate system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics<T: RealScalar> {
    dim: usize,
    u: [T; MAX_DIM],
    x: [T; MAX_DIM],
    covariant_basis: [[T; MAX_DIM]; MAX_DIM],
    covariant_metric: SmallMatrix<T>,
    contravariant_metric: SmallMatrix<T>,
    det_covariant_metric: T,
    curvature: Option<Curvature<T>>,
}

impl<T: RealScalar> Metrics<T> {
    /// Create metrics using the default singularity tolerance
    ///
    /// `covariant_basis[a]` is `dx/du_a`. `second_derivatives` equal to `None` marks a
    /// homogeneous point: no Christoffel symbols or L-coefficients are computed.
    pub fn new(
        u: &[T],
        x: &[T],
        covariant_basis: &[&[T]],
        second_derivatives: Option<&SecondDerivatives<T>>,
    ) -> Result<Self> {
        Self::with_tolerance(
            u,
            x,
            covariant_basis,
            second_derivatives,
            T::from(SINGULAR_TOLERANCE).unwrap(),
        )
    }

    /// Create metrics using a given absolute tolerance on `det(g_ij)`
    pub fn with_tolerance(
        u: &[T],
        x: &[T],
        covariant_basis: &[&[T]],
        second_derivatives: Option<&SecondDerivatives<T>>,
        tolerance: T,
    ) -> Result<Self> {
        let dim = covariant_basis.len();
        check_dim(dim)?;
        check_len(u, dim)?;
        check_len(x, dim)?;
        check_finite(u)?;
        check_finite(x)?;
        for &g in covariant_basis {
            check_len(g, dim)?;
        }
        if let Some(d) = second_derivatives {
            if d.dim() != dim {
                return Err(GridError::DimensionMismatch {
                    expected: dim,
                    found: d.dim(),
                });
            }
        }

        let mut basis = [[T::zero(); MAX_DIM]; MAX_DIM];
        for (b, &g) in basis.iter_mut().zip(covariant_basis) {
            *b = padded(g);
        }

        let mut covariant_metric = SmallMatrix::zeros(dim);
        for (i, j) in (0..dim).tuple_combinations().chain((0..dim).map(|i| (i, i))) {
            covariant_metric.set_symmetric(i, j, dot(&basis[i][..dim], &basis[j][..dim]));
        }

        let (contravariant_metric, det_covariant_metric) = covariant_metric
            .inverse(tolerance)
            .map_err(|e| match e {
                GridError::SingularMatrix { det } => GridError::DegenerateMetric {
                    u: to_f64_vec(u),
                    det,
                },
                e => e,
            })?;

        let mut metrics = Self {
            dim,
            u: padded(u),
            x: padded(x),
            covariant_basis: basis,
            covariant_metric,
            contravariant_metric,
            det_covariant_metric,
            curvature: None,
        };
        if let Some(d) = second_derivatives {
            metrics.curvature = Some(metrics.compute_curvature(d));
        }
        Ok(metrics)
    }

    /// Create 2D metrics
    ///
    /// `second_derivatives` is `(d²x/dr², d²x/ds², d²x/drds)`.
    pub fn new_2d(
        u: &[T],
        x: &[T],
        dxdr: &[T],
        dxds: &[T],
        second_derivatives: Option<(&[T], &[T], &[T])>,
    ) -> Result<Self> {
        let second = second_derivatives
            .map(|(rr, ss, rs)| SecondDerivatives::new_2d(rr, ss, rs))
            .transpose()?;
        Self::new(u, x, &[dxdr, dxds], second.as_ref())
    }

    /// Create 3D metrics
    ///
    /// `second_derivatives` is
    /// `(d²x/dr², d²x/ds², d²x/dt², d²x/drds, d²x/drdt, d²x/dsdt)`.
    #[allow(clippy::type_complexity)]
    pub fn new_3d(
        u: &[T],
        x: &[T],
        dxdr: &[T],
        dxds: &[T],
        dxdt: &[T],
        second_derivatives: Option<(&[T], &[T], &[T], &[T], &[T], &[T])>,
    ) -> Result<Self> {
        let second = second_derivatives
            .map(|(rr, ss, tt, rs, rt, st)| SecondDerivatives::new_3d(rr, ss, tt, rs, rt, st))
            .transpose()?;
        Self::new(u, x, &[dxdr, dxds, dxdt], second.as_ref())
    }

    fn compute_curvature(&self, second: &SecondDerivatives<T>) -> Curvature<T> {
        let dim = self.dim;
        let contra = self.contra_basis();
        let g_inv = &self.contravariant_metric;

        let mut gamma_s = SmallTensor3::zeros(dim);
        for (i, j) in (0..dim).map(|i| (i, i)).chain((0..dim).tuple_combinations()) {
            for (k, cnt_g) in contra.iter().take(dim).enumerate() {
                gamma_s.set_symmetric(k, i, j, dot(second.get(i, j), &cnt_g[..dim]));
            }
        }

        let two = T::one() + T::one();
        let mut l = [T::zero(); MAX_DIM];
        for (k, lk) in l.iter_mut().take(dim).enumerate() {
            *lk = (0..dim).fold(T::zero(), |acc, i| acc + gamma_s[[k, i, i]] * g_inv[[i, i]])
                + (0..dim)
                    .tuple_combinations()
                    .fold(T::zero(), |acc, (i, j)| {
                        acc + two * gamma_s[[k, i, j]] * g_inv[[i, j]]
                    });
        }

        Curvature { gamma_s, l }
    }

    /// Contravariant basis `g^k = g^kj g_j`, zero-padded
    fn contra_basis(&self) -> [[T; MAX_DIM]; MAX_DIM] {
        let mut out = [[T::zero(); MAX_DIM]; MAX_DIM];
        for (k, cnt_g) in out.iter_mut().take(self.dim).enumerate() {
            for (i, c) in cnt_g.iter_mut().take(self.dim).enumerate() {
                *c = (0..self.dim).fold(T::zero(), |acc, j| {
                    acc + self.contravariant_metric[[k, j]] * self.covariant_basis[j][i]
                });
            }
        }
        out
    }

    /// Compute the contravariant basis vectors `g^0, .., g^(dim-1)`
    pub fn contra_vectors(&self) -> Vec<Vec<T>> {
        self.contra_basis()
            .iter()
            .take(self.dim)
            .map(|g| g[..self.dim].to_vec())
            .collect()
    }

    /// Compute the contravariant basis vectors of 2D metrics
    pub fn contra_vectors_2d(&self) -> Option<([T; 2], [T; 2])> {
        if self.dim != 2 {
            return None;
        }
        let c = self.contra_basis();
        Some(([c[0][0], c[0][1]], [c[1][0], c[1][1]]))
    }

    /// Compute the contravariant basis vectors of 3D metrics
    pub fn contra_vectors_3d(&self) -> Option<([T; 3], [T; 3], [T; 3])> {
        if self.dim != 3 {
            return None;
        }
        let c = self.contra_basis();
        Some((c[0], c[1], c[2]))
    }

    /// The dimension
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Reference coordinates
    pub fn u(&self) -> &[T] {
        &self.u[..self.dim]
    }

    /// Physical coordinates
    pub fn x(&self) -> &[T] {
        &self.x[..self.dim]
    }

    /// Covariant basis vector `g_a = dx/du_a`, or `None` if `a` is not below the dimension
    pub fn covariant_basis(&self, a: usize) -> Option<&[T]> {
        if a < self.dim {
            Some(&self.covariant_basis[a][..self.dim])
        } else {
            None
        }
    }

    /// Covariant metric `g_ij`
    pub fn covariant_metric(&self) -> &SmallMatrix<T> {
        &self.covariant_metric
    }

    /// Contravariant metric `g^ij`
    pub fn contravariant_metric(&self) -> &SmallMatrix<T> {
        &self.contravariant_metric
    }

    /// Determinant of `g_ij`
    pub fn det_covariant_metric(&self) -> T {
        self.det_covariant_metric
    }

    /// Jacobian determinant `sqrt(det(g_ij))` of the mapping
    pub fn jacobian_determinant(&self) -> T {
        self.det_covariant_metric.sqrt()
    }

    /// Homogeneous points have no second derivatives and therefore no Christoffel symbols
    pub fn is_homogeneous(&self) -> bool {
        self.curvature.is_none()
    }

    /// Christoffel symbols of the second kind `Γ^k_ij`, indexed `[k, i, j]`
    pub fn gamma_s(&self) -> Option<&SmallTensor3<T>> {
        self.curvature.as_ref().map(|c| &c.gamma_s)
    }

    /// A single Christoffel symbol `Γ^k_ij`
    pub fn gamma_s_entry(&self, k: usize, i: usize, j: usize) -> Option<T> {
        if k >= self.dim || i >= self.dim || j >= self.dim {
            return None;
        }
        self.gamma_s().map(|g| g[[k, i, j]])
    }

    /// L-coefficients `L^k = Γ^k_ij g^ij`
    pub fn l_coefficients(&self) -> Option<&[T]> {
        self.curvature.as_ref().map(|c| &c.l[..self.dim])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    /// Polar coordinates (r, θ) at a point
    fn polar_metrics(r: f64, theta: f64) -> Metrics<f64> {
        let (c, s) = (theta.cos(), theta.sin());
        Metrics::new_2d(
            &[r, theta],
            &[r * c, r * s],
            &[c, s],
            &[-r * s, r * c],
            Some((&[0.0, 0.0], &[-r * c, -r * s], &[-s, c])),
        )
        .unwrap()
    }

    #[test]
    fn test_polar() {
        let r = 1.5;
        let m = polar_metrics(r, 0.3);
        assert_eq!(m.dim(), 2);
        assert!(!m.is_homogeneous());

        let g = m.covariant_metric();
        assert_relative_eq!(g[[0, 0]], 1.0, epsilon = 1e-14);
        assert_relative_eq!(g[[0, 1]], 0.0, epsilon = 1e-14);
        assert_relative_eq!(g[[1, 1]], r * r, epsilon = 1e-14);
        assert_relative_eq!(m.det_covariant_metric(), r * r, epsilon = 1e-14);
        assert_relative_eq!(m.jacobian_determinant(), r, epsilon = 1e-14);
        assert_relative_eq!(m.contravariant_metric()[[1, 1]], 1.0 / (r * r), epsilon = 1e-14);

        // Γ^r_θθ = -r, Γ^θ_rθ = 1/r
        assert_relative_eq!(m.gamma_s_entry(0, 1, 1).unwrap(), -r, epsilon = 1e-14);
        assert_relative_eq!(m.gamma_s_entry(1, 0, 1).unwrap(), 1.0 / r, epsilon = 1e-14);
        assert_relative_eq!(m.gamma_s_entry(1, 1, 0).unwrap(), 1.0 / r, epsilon = 1e-14);
        assert_relative_eq!(m.gamma_s_entry(0, 0, 0).unwrap(), 0.0, epsilon = 1e-14);

        // Laplacian in polar coordinates has -L^r = 1/r
        let l = m.l_coefficients().unwrap();
        assert_relative_eq!(l[0], -1.0 / r, epsilon = 1e-14);
        assert_relative_eq!(l[1], 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_homogeneous() {
        let m = Metrics::new_2d(&[0.0, 0.0], &[1.0, 2.0], &[2.0, 0.0], &[0.0, 3.0], None).unwrap();
        assert!(m.is_homogeneous());
        assert!(m.gamma_s().is_none());
        assert!(m.gamma_s_entry(0, 0, 0).is_none());
        assert!(m.l_coefficients().is_none());
        assert_relative_eq!(m.det_covariant_metric(), 36.0);
        assert_eq!(m.x(), &[1.0, 2.0]);
        assert!(m.covariant_basis(2).is_none());
    }

    #[test]
    fn test_zero_second_derivatives_not_homogeneous() {
        let d = SecondDerivatives::<f64>::zeros(2).unwrap();
        let m = Metrics::new(&[0.0, 0.0], &[0.0, 0.0], &[&[1.0, 0.0], &[0.0, 1.0]], Some(&d))
            .unwrap();
        assert!(!m.is_homogeneous());
        assert_eq!(m.l_coefficients().unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn test_skewed_l_coefficients() {
        // Constant skewed basis with arbitrary second derivatives; compare L with a full double
        // contraction over all (i, j)
        let g0 = [2.0, 0.5, 0.0];
        let g1 = [0.3, 1.0, 0.2];
        let g2 = [0.1, -0.4, 1.5];
        let d = SecondDerivatives::new_3d(
            &[0.1, 0.2, 0.3],
            &[-0.5, 0.0, 0.7],
            &[1.0, 1.0, -1.0],
            &[0.4, -0.2, 0.0],
            &[0.0, 0.3, 0.9],
            &[-0.6, 0.1, 0.2],
        )
        .unwrap();
        let m = Metrics::new(&[0.0; 3], &[0.0; 3], &[&g0, &g1, &g2], Some(&d)).unwrap();

        let gamma = m.gamma_s().unwrap();
        let g_inv = m.contravariant_metric();
        for k in 0..3 {
            let mut expected = 0.0;
            for i in 0..3 {
                for j in 0..3 {
                    assert_eq!(gamma[[k, i, j]], gamma[[k, j, i]]);
                    expected += gamma[[k, i, j]] * g_inv[[i, j]];
                }
            }
            assert_relative_eq!(m.l_coefficients().unwrap()[k], expected, epsilon = 1e-13);
        }

        // Γ^k_ij = (d²x/du_i du_j) · g^k
        let contra = m.contra_vectors();
        assert_relative_eq!(
            gamma[[1, 0, 2]],
            dot(d.get(0, 2), &contra[1]),
            epsilon = 1e-14
        );

        // g^i · g_j = δ_ij
        let (c0, c1, c2) = m.contra_vectors_3d().unwrap();
        assert_relative_eq!(dot(&c0, &g0), 1.0, epsilon = 1e-14);
        assert_relative_eq!(dot(&c1, &g0), 0.0, epsilon = 1e-14);
        assert_relative_eq!(dot(&c2, &g2), 1.0, epsilon = 1e-14);
        assert!(m.contra_vectors_2d().is_none());

        let id = g_inv.mul(m.covariant_metric());
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(id[[i, j]], expected, epsilon = 1e-13);
            }
        }
    }

    /// Sheared basis `g_0 = (1, 0)`, `g_1 = (1, 1)`
    ///
    /// `g_ij = [[1, 1], [1, 2]]` and `g^ij = [[2, -1], [-1, 1]]`.
    fn sheared_metrics() -> Metrics<f64> {
        Metrics::new_2d(
            &[0.0, 0.0],
            &[0.0, 0.0],
            &[1.0, 0.0],
            &[1.0, 1.0],
            Some((&[1.0, 0.0], &[0.0, 0.0], &[0.0, 1.0])),
        )
        .unwrap()
    }

    #[test]
    fn test_contra_vectors_2d() {
        let m = sheared_metrics();
        assert_relative_eq!(m.contravariant_metric()[[0, 1]], -1.0);
        let (c0, c1) = m.contra_vectors_2d().unwrap();
        assert_eq!(c0, [1.0, -1.0]);
        assert_eq!(c1, [0.0, 1.0]);

        // g^i · g_j = δ_ij
        let g0 = m.covariant_basis(0).unwrap();
        let g1 = m.covariant_basis(1).unwrap();
        assert_relative_eq!(dot(&c0, g0), 1.0);
        assert_relative_eq!(dot(&c0, g1), 0.0);
        assert_relative_eq!(dot(&c1, g0), 0.0);
        assert_relative_eq!(dot(&c1, g1), 1.0);

        assert_eq!(m.contra_vectors(), vec![vec![1.0, -1.0], vec![0.0, 1.0]]);
        assert!(m.contra_vectors_3d().is_none());
    }

    #[test]
    fn test_hand_computed_l() {
        // g^0 = (1, -1), g^1 = (0, 1)
        let m = sheared_metrics();
        let gamma = m.gamma_s().unwrap();
        assert_relative_eq!(gamma[[0, 0, 0]], 1.0);
        assert_relative_eq!(gamma[[1, 0, 0]], 0.0);
        assert_relative_eq!(gamma[[0, 1, 1]], 0.0);
        assert_relative_eq!(gamma[[1, 1, 1]], 0.0);
        assert_relative_eq!(gamma[[0, 0, 1]], -1.0);
        assert_relative_eq!(gamma[[0, 1, 0]], -1.0);
        assert_relative_eq!(gamma[[1, 0, 1]], 1.0);
        // L^0 = 1*2 + 0*1 + 2*(-1)*(-1) = 4, L^1 = 0*2 + 0*1 + 2*1*(-1) = -2
        let l = m.l_coefficients().unwrap();
        assert_relative_eq!(l[0], 4.0, epsilon = 1e-15);
        assert_relative_eq!(l[1], -2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_non_finite_input() {
        match Metrics::new_2d(&[0.0, 0.0], &[0.0, 0.0], &[f64::NAN, 0.0], &[0.0, 1.0], None) {
            Err(GridError::DegenerateMetric { u, det }) => {
                assert_eq!(u, vec![0.0, 0.0]);
                assert!(det.is_nan());
            }
            _ => panic!("Expected a degenerate metric error"),
        }
        assert_eq!(
            Metrics::new_2d(&[0.0, 0.0], &[0.0, f64::INFINITY], &[1.0, 0.0], &[0.0, 1.0], None),
            Err(GridError::NonFiniteCoordinate { dim: 1 })
        );
        assert_eq!(
            Metrics::new_2d(&[f64::NAN, 0.0], &[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0], None),
            Err(GridError::NonFiniteCoordinate { dim: 0 })
        );
    }

    #[test]
    fn test_degenerate() {
        let e = Metrics::new_2d(&[0.5, -0.5], &[0.0, 0.0], &[1.0, 1.0], &[2.0, 2.0], None);
        match e {
            Err(GridError::DegenerateMetric { u, det }) => {
                assert_eq!(u, vec![0.5, -0.5]);
                assert_relative_eq!(det, 0.0);
            }
            _ => panic!("Expected a degenerate metric error"),
        }
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            Metrics::new(&[0.0], &[0.0], &[&[1.0]], None),
            Err(GridError::InvalidDimension(1))
        );
        assert_eq!(
            Metrics::new_2d(&[0.0, 0.0], &[0.0], &[1.0, 0.0], &[0.0, 1.0], None),
            Err(GridError::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
        let d = SecondDerivatives::<f64>::zeros(3).unwrap();
        assert_eq!(
            Metrics::new(&[0.0; 2], &[0.0; 2], &[&[1.0, 0.0], &[0.0, 1.0]], Some(&d)),
            Err(GridError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_inputs_are_copied() {
        let mut g0 = vec![1.0, 0.0];
        let m = Metrics::new_2d(&[0.0, 0.0], &[0.0, 0.0], &g0, &[0.0, 1.0], None).unwrap();
        g0[0] = 5.0;
        assert_eq!(m.covariant_basis(0).unwrap(), &[1.0, 0.0]);
    }
}
