//! Per-node metric queries on a structured lattice

use crate::linalg::SmallMatrix;
use crate::metrics::Metrics;
use crate::types::RealScalar;

pub trait MetricField {
    //! A structured lattice that stores [`Metrics`] at each node
    //!
    //! Nodes are addressed by the lattice index `(i, j, k)`; 2D lattices use `k = 0`.

    /// Scalar type
    type T: RealScalar;

    /// The dimension of the lattice
    fn ndim(&self) -> usize;

    /// The metrics stored at node `(i, j, k)`
    ///
    /// # Panics
    /// Panics if the node is outside the lattice.
    fn metrics(&self, i: usize, j: usize, k: usize) -> &Metrics<Self::T>;

    /// Reference coordinates of node `(i, j, k)`
    fn u(&self, i: usize, j: usize, k: usize) -> &[Self::T] {
        self.metrics(i, j, k).u()
    }

    /// Physical coordinates of node `(i, j, k)`
    fn x(&self, i: usize, j: usize, k: usize) -> &[Self::T] {
        self.metrics(i, j, k).x()
    }

    /// Covariant basis vector `g_dim` at node `(i, j, k)`, `None` if `dim` is not below [`Self::ndim`]
    fn covar_basis(&self, i: usize, j: usize, k: usize, dim: usize) -> Option<&[Self::T]> {
        self.metrics(i, j, k).covariant_basis(dim)
    }

    /// Covariant metric `g_ij` at node `(i, j, k)`
    fn covar_matrix(&self, i: usize, j: usize, k: usize) -> &SmallMatrix<Self::T> {
        self.metrics(i, j, k).covariant_metric()
    }

    /// Contravariant metric `g^ij` at node `(i, j, k)`
    fn contra_matrix(&self, i: usize, j: usize, k: usize) -> &SmallMatrix<Self::T> {
        self.metrics(i, j, k).contravariant_metric()
    }

    /// Determinant of the covariant metric at node `(i, j, k)`
    fn det_covar_matrix(&self, i: usize, j: usize, k: usize) -> Self::T {
        self.metrics(i, j, k).det_covariant_metric()
    }

    /// Christoffel symbol `Γ^a_bc` at node `(i, j, k)`
    ///
    /// `None` if the node is homogeneous or an index is not below [`Self::ndim`].
    fn gamma_s(
        &self,
        i: usize,
        j: usize,
        k: usize,
        a: usize,
        b: usize,
        c: usize,
    ) -> Option<Self::T> {
        self.metrics(i, j, k).gamma_s_entry(a, b, c)
    }

    /// L-coefficient `L^dim` at node `(i, j, k)`
    ///
    /// `None` if the node is homogeneous or `dim` is not below [`Self::ndim`].
    fn l_coeff(&self, i: usize, j: usize, k: usize, dim: usize) -> Option<Self::T> {
        self.metrics(i, j, k)
            .l_coefficients()
            .and_then(|l| l.get(dim).copied())
    }
}
