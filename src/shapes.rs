//! Definition of various mappings used to generate curvilinear grids.

mod box_map;
mod quarter_ring;

pub use box_map::BoxMap;
pub use quarter_ring::{QuarterRing2d, QuarterRing3d};
