//! Structured grid creation and storage

pub mod boundary;
pub mod options;
pub mod structured;

pub use boundary::{Axis, Boundary, Side};
pub use options::GridOptions;
pub use structured::StructuredGrid;
