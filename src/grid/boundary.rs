//! Boundary identification on structured lattices
//!
//! Boundaries are the edges (2D) or faces (3D) where one lattice index is at its minimum or
//! maximum. Node sets are generated from index arithmetic and returned as ascending flat indices.
//!
//! | 2D edge | code | tag |   | 3D face | code | tag |
//! |---------|------|-----|---|---------|------|-----|
//! | bottom  | 0    | 20  |   | xmin    | 0    | 100 |
//! | right   | 1    | 11  |   | xmax    | 1    | 101 |
//! | top     | 2    | 21  |   | ymin    | 2    | 200 |
//! | left    | 3    | 10  |   | ymax    | 3    | 201 |
//! |         |      |     |   | zmin    | 4    | 300 |
//! |         |      |     |   | zmax    | 5    | 301 |

use crate::types::{GridError, Result};
use itertools::Itertools;

/// A lattice axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First reference coordinate
    X,
    /// Second reference coordinate
    Y,
    /// Third reference coordinate
    Z,
}

impl Axis {
    /// Create from an axis index
    pub fn from_usize(u: usize) -> Option<Self> {
        match u {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }

    /// The axis index
    pub fn as_usize(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// The end of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Lattice index 0
    Min,
    /// Last lattice index
    Max,
}

impl Side {
    fn as_usize(self) -> usize {
        match self {
            Side::Min => 0,
            Side::Max => 1,
        }
    }
}

/// An edge of a 2D lattice or a face of a 3D lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boundary {
    /// The axis normal to the boundary
    pub axis: Axis,
    /// The end of the axis
    pub side: Side,
}

impl Boundary {
    /// Create a boundary
    pub fn new(axis: Axis, side: Side) -> Self {
        Self { axis, side }
    }

    /// The 2D edge with code 0 (bottom), 1 (right), 2 (top) or 3 (left)
    pub fn from_edge_code(code: usize) -> Result<Self> {
        match code {
            0 => Ok(Self::new(Axis::Y, Side::Min)),
            1 => Ok(Self::new(Axis::X, Side::Max)),
            2 => Ok(Self::new(Axis::Y, Side::Max)),
            3 => Ok(Self::new(Axis::X, Side::Min)),
            _ => Err(GridError::InvalidTag(code)),
        }
    }

    /// The 3D face with code `2 * axis + side`
    pub fn from_face_code(code: usize) -> Result<Self> {
        let axis = Axis::from_usize(code / 2).ok_or(GridError::InvalidTag(code))?;
        let side = if code % 2 == 0 { Side::Min } else { Side::Max };
        Ok(Self::new(axis, side))
    }

    /// The 2D edge with tag 10 (left), 11 (right), 20 (bottom) or 21 (top)
    pub fn from_edge_tag(tag: usize) -> Result<Self> {
        match tag {
            10 | 11 | 20 | 21 => Self::from_tag(tag, 10),
            _ => Err(GridError::InvalidTag(tag)),
        }
    }

    /// The 3D face with tag 100/101 (x), 200/201 (y) or 300/301 (z)
    pub fn from_face_tag(tag: usize) -> Result<Self> {
        match tag {
            100 | 101 | 200 | 201 | 300 | 301 => Self::from_tag(tag, 100),
            _ => Err(GridError::InvalidTag(tag)),
        }
    }

    fn from_tag(tag: usize, base: usize) -> Result<Self> {
        let axis = Axis::from_usize(tag / base - 1).ok_or(GridError::InvalidTag(tag))?;
        let side = if tag % base == 0 { Side::Min } else { Side::Max };
        Ok(Self::new(axis, side))
    }

    /// The tag of this boundary on a lattice of dimension `ndim`
    pub fn tag(&self, ndim: usize) -> usize {
        let base = if ndim == 2 { 10 } else { 100 };
        base * (self.axis.as_usize() + 1) + self.side.as_usize()
    }
}

/// Flat indices of the nodes on a boundary of a lattice with `npts` points per dimension
///
/// The flat index of `(i, j, k)` is `i + j * npts[0] + k * npts[0] * npts[1]`.
pub fn boundary_nodes(npts: &[usize], boundary: Boundary) -> Result<Vec<usize>> {
    let axis = boundary.axis.as_usize();
    if axis >= npts.len() {
        return Err(GridError::DimensionMismatch {
            expected: axis + 1,
            found: npts.len(),
        });
    }
    let strides = npts
        .iter()
        .scan(1, |stride, n| {
            let s = *stride;
            *stride *= n;
            Some(s)
        })
        .collect::<Vec<_>>();
    let fixed = match boundary.side {
        Side::Min => 0,
        Side::Max => npts[axis] - 1,
    };
    let offset = fixed * strides[axis];

    // Slowest-varying dimension first so that the output is sorted
    let others = (0..npts.len())
        .rev()
        .filter(|d| *d != axis)
        .collect::<Vec<_>>();
    Ok(others
        .iter()
        .map(|d| 0..npts[*d])
        .multi_cartesian_product()
        .map(|index| {
            offset
                + index
                    .iter()
                    .zip(&others)
                    .map(|(i, d)| i * strides[*d])
                    .sum::<usize>()
        })
        .collect())
}
