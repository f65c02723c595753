//! Quarter ring mappings

use crate::linalg::MAX_DIM;
use crate::metrics::SecondDerivatives;
use crate::traits::{MapEvaluation, Mapping};
use crate::types::RealScalar;
use num::Float;

/// Radial and angular scale factors `A = (b - a) / 2` and `B = π / 4`
fn scale_factors<T: RealScalar>(a: T, b: T) -> (T, T) {
    let two = T::from(2.0).unwrap();
    ((b - a) / two, T::from(std::f64::consts::FRAC_PI_4).unwrap())
}

/// A quarter of a ring in the first quadrant
///
/// The reference square \[-1,1\]^2 is mapped to the region between the circles of radius `a` and
/// `b`. The first reference coordinate is radial and the second is angular, so
/// `ρ = a + (1 + r)(b - a)/2` and `α = (1 + s)π/4`.
#[derive(Debug, Clone, Copy)]
pub struct QuarterRing2d<T: RealScalar> {
    a: T,
    b: T,
}

impl<T: RealScalar> QuarterRing2d<T> {
    /// Create a quarter ring with inner radius `a` and outer radius `b`
    pub fn new(a: T, b: T) -> Self {
        assert!(a > T::zero() && a < b, "Radii must satisfy 0 < a < b");
        Self { a, b }
    }
}

impl<T: RealScalar> Mapping for QuarterRing2d<T> {
    type T = T;

    fn dim(&self) -> usize {
        2
    }

    fn evaluate(&self, u: &[T], second_derivatives: bool) -> MapEvaluation<T> {
        assert_eq!(u.len(), 2);
        let zero = T::zero();
        let one = T::one();
        let (a_r, b_s) = scale_factors(self.a, self.b);
        let rho = self.a + (one + u[0]) * a_r;
        let (sin, cos) = Float::sin_cos((one + u[1]) * b_s);

        let ddxdu = if second_derivatives {
            SecondDerivatives::new_2d(
                &[zero, zero],
                &[-rho * cos * b_s * b_s, -rho * sin * b_s * b_s],
                &[-a_r * sin * b_s, a_r * cos * b_s],
            )
            .ok()
        } else {
            None
        };

        MapEvaluation {
            x: [rho * cos, rho * sin, zero],
            dxdu: [
                [a_r * cos, a_r * sin, zero],
                [-rho * sin * b_s, rho * cos * b_s, zero],
                [zero; MAX_DIM],
            ],
            ddxdu,
        }
    }
}

/// A quarter ring extruded along the first axis
///
/// The reference cube \[-1,1\]^3 is mapped so that `x0 = h(1 + r)/2` and the plane `(x1, x2)`
/// holds a [`QuarterRing2d`] with radii `a` and `b` driven by `(s, t)`.
#[derive(Debug, Clone, Copy)]
pub struct QuarterRing3d<T: RealScalar> {
    a: T,
    b: T,
    h: T,
}

impl<T: RealScalar> QuarterRing3d<T> {
    /// Create an extruded quarter ring with radii `a < b` and thickness `h`
    pub fn new(a: T, b: T, h: T) -> Self {
        assert!(a > T::zero() && a < b, "Radii must satisfy 0 < a < b");
        assert!(h > T::zero(), "Thickness must be positive");
        Self { a, b, h }
    }
}

impl<T: RealScalar> Mapping for QuarterRing3d<T> {
    type T = T;

    fn dim(&self) -> usize {
        3
    }

    fn evaluate(&self, u: &[T], second_derivatives: bool) -> MapEvaluation<T> {
        assert_eq!(u.len(), 3);
        let zero = T::zero();
        let one = T::one();
        let half_h = self.h / T::from(2.0).unwrap();
        let (a_r, b_s) = scale_factors(self.a, self.b);
        let rho = self.a + (one + u[1]) * a_r;
        let (sin, cos) = Float::sin_cos((one + u[2]) * b_s);

        let ddxdu = if second_derivatives {
            let z = [zero; 3];
            SecondDerivatives::new_3d(
                &z,
                &z,
                &[zero, -rho * cos * b_s * b_s, -rho * sin * b_s * b_s],
                &z,
                &z,
                &[zero, -a_r * sin * b_s, a_r * cos * b_s],
            )
            .ok()
        } else {
            None
        };

        MapEvaluation {
            x: [half_h * (one + u[0]), rho * cos, rho * sin],
            dxdu: [
                [half_h, zero, zero],
                [zero, a_r * cos, a_r * sin],
                [zero, -rho * sin * b_s, rho * cos * b_s],
            ],
            ddxdu,
        }
    }
}
