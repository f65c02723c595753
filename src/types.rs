//! Types specific to curvgrid

/// Floating point type used for coordinates and metrics
pub trait RealScalar: num::Float + std::fmt::Debug + Send + Sync + 'static {}

impl<T: num::Float + std::fmt::Debug + Send + Sync + 'static> RealScalar for T {}

/// Grid and metrics errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A small matrix could not be inverted
    #[error("Singular matrix: det = {det:e}")]
    SingularMatrix {
        /// Determinant found during the inversion
        det: f64,
    },
    /// The covariant metric at a point is not invertible
    #[error("Degenerate mapping at u = {u:?}: det(g_ij) = {det:e}")]
    DegenerateMetric {
        /// Reference coordinates of the point
        u: Vec<f64>,
        /// Determinant of the covariant metric
        det: f64,
    },
    /// The covariant metric at a grid node is not invertible
    #[error("Degenerate mapping at node {index:?} (u = {u:?}): det(g_ij) = {det:e}")]
    DegenerateNode {
        /// Lattice index (i, j, k) of the node
        index: [usize; 3],
        /// Reference coordinates of the node
        u: Vec<f64>,
        /// Determinant of the covariant metric
        det: f64,
    },
    /// A lattice dimension has fewer than two points
    #[error("Dimension {dim} has {npts} points; at least 2 are required")]
    TooFewPoints {
        /// Dimension index
        dim: usize,
        /// Number of points given
        npts: usize,
    },
    /// A coordinate is NaN or infinite
    #[error("Non-finite coordinate along dimension {dim}")]
    NonFiniteCoordinate {
        /// Dimension index
        dim: usize,
    },
    /// A lower bound is not below its upper bound
    #[error("Invalid bounds along dimension {dim}: min must be smaller than max")]
    InvalidBounds {
        /// Dimension index
        dim: usize,
    },
    /// Input arrays have inconsistent lengths
    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// Expected length
        expected: usize,
        /// Length found
        found: usize,
    },
    /// Only 2D and 3D are supported
    #[error("Invalid dimension {0}: only 2D and 3D are supported")]
    InvalidDimension(usize),
    /// Operation used with the wrong dimension
    #[error("Dimension mismatch: expected {expected}D, found {found}D")]
    DimensionMismatch {
        /// Dimension required by the operation
        expected: usize,
        /// Dimension of the object
        found: usize,
    },
    /// Unknown edge/face code or boundary tag
    #[error("Invalid boundary code or tag: {0}")]
    InvalidTag(usize),
}

/// Result type
pub type Result<T> = std::result::Result<T, GridError>;

/// Convert a slice of scalars to `f64` for error reporting
pub(crate) fn to_f64_vec<T: RealScalar>(values: &[T]) -> Vec<f64> {
    values
        .iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN))
        .collect()
}
