//! Options used when building a structured grid

use crate::linalg::SINGULAR_TOLERANCE;

/// Options used when building a structured grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    /// Absolute tolerance on `det(g_ij)` below which a node is considered degenerate
    singular_tolerance: f64,
    /// Build the metrics of the nodes in parallel
    parallel: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            singular_tolerance: SINGULAR_TOLERANCE,
            parallel: false,
        }
    }
}

impl GridOptions {
    /// Set the singularity tolerance
    pub fn set_singular_tolerance(&mut self, tolerance: f64) {
        assert!(tolerance >= 0.0, "Tolerance must not be negative");
        self.singular_tolerance = tolerance;
    }

    /// Get the singularity tolerance
    pub fn singular_tolerance(&self) -> f64 {
        self.singular_tolerance
    }

    /// Enable or disable parallel construction
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Is the grid built in parallel?
    pub fn parallel(&self) -> bool {
        self.parallel
    }
}
