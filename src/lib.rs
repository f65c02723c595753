//! Curvgrid
//!
//! Metric tensors, Christoffel symbols of the second kind and L-coefficients at the nodes of
//! structured 2D and 3D grids, either rectangular or generated by a transfinite mapping.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod grid;
pub mod linalg;
pub mod metrics;
pub mod shapes;
pub mod traits;
pub mod types;

pub use grid::{GridOptions, StructuredGrid};
pub use metrics::{Metrics, SecondDerivatives};
pub use types::{GridError, Result};
