//! Structured grid

use super::boundary::{boundary_nodes, Boundary};
use super::options::GridOptions;
use crate::linalg::MAX_DIM;
use crate::metrics::{check_dim, Metrics};
use crate::traits::{Mapping, MetricField};
use crate::types::{GridError, RealScalar, Result};
use log::{debug, warn};
use rayon::prelude::*;

/// Evenly spaced points from `min` to `max`, both included
fn linspace<T: RealScalar>(min: T, max: T, npts: usize) -> Vec<T> {
    let step = (max - min) / T::from(npts - 1).unwrap();
    (0..npts)
        .map(|i| {
            if i + 1 == npts {
                max
            } else {
                min + T::from(i).unwrap() * step
            }
        })
        .collect()
}

/// Lattice index `(i, j, k)` of a flat index
fn lattice_index(npts: &[usize; MAX_DIM], flat: usize) -> [usize; MAX_DIM] {
    [
        flat % npts[0],
        (flat / npts[0]) % npts[1],
        flat / (npts[0] * npts[1]),
    ]
}

/// Reference coordinates of a lattice node
fn node_coordinates<T: RealScalar>(coords: &[&[T]], index: [usize; MAX_DIM]) -> [T; MAX_DIM] {
    let mut u = [T::zero(); MAX_DIM];
    for (d, c) in coords.iter().enumerate() {
        u[d] = c[index[d]];
    }
    u
}

/// Check per-dimension coordinate sets and return the number of points per dimension
fn check_coordinates<T: RealScalar>(coords: &[&[T]]) -> Result<[usize; MAX_DIM]> {
    check_dim(coords.len())?;
    let mut npts = [1; MAX_DIM];
    for (d, c) in coords.iter().enumerate() {
        if c.len() < 2 {
            return Err(GridError::TooFewPoints {
                dim: d,
                npts: c.len(),
            });
        }
        if c.iter().any(|v| !v.is_finite()) {
            return Err(GridError::NonFiniteCoordinate { dim: d });
        }
        npts[d] = c.len();
    }
    Ok(npts)
}

/// A structured 2D or 3D grid with metrics stored at every node
///
/// Node `(i, j, k)` has flat index `i + j * npts(0) + k * npts(0) * npts(1)`; 2D grids have a
/// single layer `k = 0`. Grids are either rectangular (identity mapping, homogeneous nodes) or
/// generated by a transfinite [`Mapping`].
#[derive(Debug, Clone)]
pub struct StructuredGrid<T: RealScalar> {
    ndim: usize,
    npts: [usize; MAX_DIM],
    umin: [T; MAX_DIM],
    umax: [T; MAX_DIM],
    xmin: [T; MAX_DIM],
    xmax: [T; MAX_DIM],
    metrics: Vec<Metrics<T>>,
}

impl<T: RealScalar> StructuredGrid<T> {
    /// Create a uniform rectangular grid from the bounds and number of points per dimension
    pub fn rect_uniform(min: &[T], max: &[T], npts: &[usize]) -> Result<Self> {
        Self::rect_uniform_with_options(min, max, npts, &GridOptions::default())
    }

    /// Create a uniform rectangular grid using the given options
    pub fn rect_uniform_with_options(
        min: &[T],
        max: &[T],
        npts: &[usize],
        options: &GridOptions,
    ) -> Result<Self> {
        let ndim = min.len();
        check_dim(ndim)?;
        for len in [max.len(), npts.len()] {
            if len != ndim {
                return Err(GridError::LengthMismatch {
                    expected: ndim,
                    found: len,
                });
            }
        }
        for d in 0..ndim {
            if npts[d] < 2 {
                return Err(GridError::TooFewPoints {
                    dim: d,
                    npts: npts[d],
                });
            }
            if !min[d].is_finite() || !max[d].is_finite() {
                return Err(GridError::NonFiniteCoordinate { dim: d });
            }
            if min[d] >= max[d] {
                return Err(GridError::InvalidBounds { dim: d });
            }
        }
        let coords = (0..ndim)
            .map(|d| linspace(min[d], max[d], npts[d]))
            .collect::<Vec<_>>();
        let coords = coords.iter().map(|c| c.as_slice()).collect::<Vec<_>>();
        Self::rect_set_with_options(&coords, options)
    }

    /// Create a 2D rectangular grid from the coordinates of the lattice lines
    pub fn rect_set_2d(x: &[T], y: &[T]) -> Result<Self> {
        Self::rect_set_with_options(&[x, y], &GridOptions::default())
    }

    /// Create a 3D rectangular grid from the coordinates of the lattice planes
    pub fn rect_set_3d(x: &[T], y: &[T], z: &[T]) -> Result<Self> {
        Self::rect_set_with_options(&[x, y, z], &GridOptions::default())
    }

    /// Create a rectangular grid from one coordinate set per dimension
    ///
    /// The coordinates need not be evenly spaced. Reference and physical coordinates coincide
    /// and all nodes are homogeneous.
    pub fn rect_set_with_options(coords: &[&[T]], options: &GridOptions) -> Result<Self> {
        let npts = check_coordinates(coords)?;
        let ndim = coords.len();
        let tolerance = T::from(options.singular_tolerance()).unwrap();

        let mut unit = [[T::zero(); MAX_DIM]; MAX_DIM];
        for (d, e) in unit.iter_mut().enumerate() {
            e[d] = T::one();
        }
        let basis = unit.iter().take(ndim).map(|e| &e[..ndim]).collect::<Vec<_>>();

        Self::build(ndim, npts, options, |index| {
            let u = node_coordinates(coords, index);
            Metrics::with_tolerance(&u[..ndim], &u[..ndim], &basis, None, tolerance)
        })
    }

    /// Create a 2D curvilinear grid by evaluating `map` at the reference coordinates `r × s`
    pub fn transfinite_2d<M: Mapping<T = T>>(map: &M, r: &[T], s: &[T]) -> Result<Self> {
        Self::transfinite_with_options(map, &[r, s], &GridOptions::default())
    }

    /// Create a 3D curvilinear grid by evaluating `map` at the reference coordinates `r × s × t`
    pub fn transfinite_3d<M: Mapping<T = T>>(map: &M, r: &[T], s: &[T], t: &[T]) -> Result<Self> {
        Self::transfinite_with_options(map, &[r, s, t], &GridOptions::default())
    }

    /// Create a curvilinear grid from one reference coordinate set per dimension
    ///
    /// Second derivatives are requested at every node; nodes where the mapping provides none are
    /// homogeneous.
    pub fn transfinite_with_options<M: Mapping<T = T>>(
        map: &M,
        coords: &[&[T]],
        options: &GridOptions,
    ) -> Result<Self> {
        let npts = check_coordinates(coords)?;
        let ndim = coords.len();
        if map.dim() != ndim {
            return Err(GridError::DimensionMismatch {
                expected: map.dim(),
                found: ndim,
            });
        }
        let tolerance = T::from(options.singular_tolerance()).unwrap();

        let grid = Self::build(ndim, npts, options, |index| {
            let u = node_coordinates(coords, index);
            let ev = map.evaluate(&u[..ndim], true);
            let basis = ev
                .dxdu
                .iter()
                .take(ndim)
                .map(|g| &g[..ndim])
                .collect::<Vec<_>>();
            Metrics::with_tolerance(
                &u[..ndim],
                &ev.x[..ndim],
                &basis,
                ev.ddxdu.as_ref(),
                tolerance,
            )
        })?;

        let nhomogeneous = grid.iter_metrics().filter(|m| m.is_homogeneous()).count();
        if nhomogeneous > 0 {
            warn!(
                "Mapping returned no second derivatives at {} of {} nodes; these nodes are homogeneous.",
                nhomogeneous,
                grid.size()
            );
        }
        Ok(grid)
    }

    /// Build the metrics at every node; the first failing node aborts the construction
    fn build<F: Fn([usize; MAX_DIM]) -> Result<Metrics<T>> + Sync>(
        ndim: usize,
        npts: [usize; MAX_DIM],
        options: &GridOptions,
        node: F,
    ) -> Result<Self> {
        let size = npts.iter().product::<usize>();
        let make = |flat: usize| {
            let index = lattice_index(&npts, flat);
            node(index).map_err(|e| match e {
                GridError::DegenerateMetric { u, det } => {
                    GridError::DegenerateNode { index, u, det }
                }
                e => e,
            })
        };
        let metrics = if options.parallel() {
            (0..size)
                .into_par_iter()
                .map(make)
                .collect::<Result<Vec<_>>>()?
        } else {
            (0..size).map(make).collect::<Result<Vec<_>>>()?
        };

        let mut umin = [T::zero(); MAX_DIM];
        let mut umax = [T::zero(); MAX_DIM];
        let mut xmin = [T::zero(); MAX_DIM];
        let mut xmax = [T::zero(); MAX_DIM];
        for d in 0..ndim {
            umin[d] = metrics[0].u()[d];
            umax[d] = metrics[0].u()[d];
            xmin[d] = metrics[0].x()[d];
            xmax[d] = metrics[0].x()[d];
        }
        for m in &metrics[1..] {
            for d in 0..ndim {
                umin[d] = umin[d].min(m.u()[d]);
                umax[d] = umax[d].max(m.u()[d]);
                xmin[d] = xmin[d].min(m.x()[d]);
                xmax[d] = xmax[d].max(m.x()[d]);
            }
        }

        debug!(
            "Built {}D structured grid with {:?} points ({} nodes, {} homogeneous)",
            ndim,
            &npts[..ndim],
            size,
            metrics.iter().filter(|m| m.is_homogeneous()).count()
        );

        Ok(Self {
            ndim,
            npts,
            umin,
            umax,
            xmin,
            xmax,
            metrics,
        })
    }

    /// The total number of nodes
    pub fn size(&self) -> usize {
        self.metrics.len()
    }

    /// The number of points along dimension `d`
    pub fn npts(&self, d: usize) -> usize {
        self.npts[..self.ndim][d]
    }

    /// Minimum physical coordinate along dimension `d`
    pub fn xmin(&self, d: usize) -> T {
        self.xmin[..self.ndim][d]
    }

    /// Maximum physical coordinate along dimension `d`
    pub fn xmax(&self, d: usize) -> T {
        self.xmax[..self.ndim][d]
    }

    /// Length of the physical bounding box along dimension `d`
    pub fn xlength(&self, d: usize) -> T {
        self.xmax(d) - self.xmin(d)
    }

    /// Minimum reference coordinate along dimension `d`
    pub fn umin(&self, d: usize) -> T {
        self.umin[..self.ndim][d]
    }

    /// Maximum reference coordinate along dimension `d`
    pub fn umax(&self, d: usize) -> T {
        self.umax[..self.ndim][d]
    }

    /// Physical coordinates of the node with flat index `n`
    pub fn node(&self, n: usize) -> &[T] {
        self.metrics[n].x()
    }

    /// Flat index of node `(i, j, k)`
    pub fn node_index(&self, i: usize, j: usize, k: usize) -> usize {
        assert!(
            i < self.npts[0] && j < self.npts[1] && k < self.npts[2],
            "Lattice index ({i}, {j}, {k}) out of range"
        );
        i + j * self.npts[0] + k * self.npts[0] * self.npts[1]
    }

    /// Lattice index `(i, j, k)` of the node with flat index `n`
    pub fn lattice_index(&self, n: usize) -> [usize; 3] {
        assert!(n < self.size(), "Node index {n} out of range");
        lattice_index(&self.npts, n)
    }

    /// Iterate over the metrics of all nodes in flat index order
    pub fn iter_metrics(&self) -> std::slice::Iter<'_, Metrics<T>> {
        self.metrics.iter()
    }

    fn require_dim(&self, expected: usize) -> Result<()> {
        if self.ndim == expected {
            Ok(())
        } else {
            Err(GridError::DimensionMismatch {
                expected,
                found: self.ndim,
            })
        }
    }

    /// Nodes on a 2D edge: 0 (bottom), 1 (right), 2 (top) or 3 (left)
    pub fn edge(&self, code: usize) -> Result<Vec<usize>> {
        self.require_dim(2)?;
        boundary_nodes(&self.npts[..2], Boundary::from_edge_code(code)?)
    }

    /// Nodes on a 2D edge given its tag: 10 (left), 11 (right), 20 (bottom) or 21 (top)
    pub fn edge_given_tag(&self, tag: usize) -> Result<Vec<usize>> {
        self.require_dim(2)?;
        boundary_nodes(&self.npts[..2], Boundary::from_edge_tag(tag)?)
    }

    /// Nodes on a 3D face: 0 (xmin), 1 (xmax), 2 (ymin), 3 (ymax), 4 (zmin) or 5 (zmax)
    pub fn face(&self, code: usize) -> Result<Vec<usize>> {
        self.require_dim(3)?;
        boundary_nodes(&self.npts, Boundary::from_face_code(code)?)
    }

    /// Nodes on a 3D face given its tag: 100/101 (xmin/xmax), 200/201 (y) or 300/301 (z)
    pub fn face_given_tag(&self, tag: usize) -> Result<Vec<usize>> {
        self.require_dim(3)?;
        boundary_nodes(&self.npts, Boundary::from_face_tag(tag)?)
    }

    /// Nodes on the boundary with the given edge tag (2D) or face tag (3D)
    pub fn boundary(&self, tag: usize) -> Result<Vec<usize>> {
        if self.ndim == 2 {
            self.edge_given_tag(tag)
        } else {
            self.face_given_tag(tag)
        }
    }

    /// Node coordinates of a 2D grid as arrays `xx[j][i]`, `yy[j][i]`
    pub fn meshgrid_2d(&self) -> Result<(Vec<Vec<T>>, Vec<Vec<T>>)> {
        self.require_dim(2)?;
        let component = |c: usize| -> Vec<Vec<T>> {
            (0..self.npts[1])
                .map(|j| {
                    (0..self.npts[0])
                        .map(|i| MetricField::x(self, i, j, 0)[c])
                        .collect()
                })
                .collect()
        };
        Ok((component(0), component(1)))
    }

    /// Node coordinates of a 3D grid as arrays `xx[k][j][i]`, `yy[k][j][i]`, `zz[k][j][i]`
    #[allow(clippy::type_complexity)]
    pub fn meshgrid_3d(&self) -> Result<(Vec<Vec<Vec<T>>>, Vec<Vec<Vec<T>>>, Vec<Vec<Vec<T>>>)> {
        self.require_dim(3)?;
        let component = |c: usize| -> Vec<Vec<Vec<T>>> {
            (0..self.npts[2])
                .map(|k| {
                    (0..self.npts[1])
                        .map(|j| {
                            (0..self.npts[0])
                                .map(|i| MetricField::x(self, i, j, k)[c])
                                .collect()
                        })
                        .collect()
                })
                .collect()
        };
        Ok((component(0), component(1), component(2)))
    }
}

impl<T: RealScalar> MetricField for StructuredGrid<T> {
    type T = T;

    fn ndim(&self) -> usize {
        self.ndim
    }

    fn metrics(&self, i: usize, j: usize, k: usize) -> &Metrics<T> {
        &self.metrics[self.node_index(i, j, k)]
    }
}
