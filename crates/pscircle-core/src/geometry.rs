//! Geometric primitives for the radial tree mapping.
//!
//! # Overview
//!
//! - [`Point`] - A 2D cartesian coordinate relative to the tree center
//! - [`PolarPoint`] - A point stored as a unit direction and a radius
//!
//! # Coordinate System
//!
//! The radial picture is centered at the origin. Angles are measured in
//! radians from the positive X axis towards positive Y, matching screen
//! coordinates where Y grows downward:
//!
//! ```text
//!            -Y
//!             │
//!   -X ───────┼───────► +X   (angle 0)
//!             │
//!             ▼
//!            +Y              (angle π/2)
//! ```
//!
//! Polar points keep the direction as a unit vector `(nx, ny)` rather than an
//! angle, so that offsetting along the radius or its normal needs no
//! trigonometry.

use crate::real::{EPS, Real};

/// A 2D point in cartesian coordinates.
///
/// # Examples
///
/// ```
/// # use pscircle_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: Real,
    y: Real,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: Real, y: Real) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> Real {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> Real {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: Real) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Calculates the Euclidean distance from the origin
    pub fn hypot(self) -> Real {
        self.x.hypot(self.y)
    }
}

/// A point in polar form: unit direction `(nx, ny)` and radius `r`.
///
/// The origin is represented with a zero direction and zero radius. Every
/// constructor preserves [`PolarPoint::is_valid`].
///
/// # Examples
///
/// ```
/// # use pscircle_core::geometry::PolarPoint;
/// # use pscircle_core::real::PI;
/// let p = PolarPoint::from_radial(PI / 2.0, 3.0);
/// let cartesian = p.to_point();
///
/// assert!(cartesian.x().abs() < 1e-5);
/// assert!((cartesian.y() - 3.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolarPoint {
    nx: Real,
    ny: Real,
    r: Real,
}

impl PolarPoint {
    /// Creates a polar point from an angle `phi` (radians) and a radius `rho`.
    ///
    /// A zero radius yields the origin with a zero direction.
    pub fn from_radial(phi: Real, rho: Real) -> Self {
        let mut point = Self {
            r: rho,
            ..Self::default()
        };

        if rho != 0.0 {
            let (sin, cos) = phi.sin_cos();
            point.nx = cos;
            point.ny = sin;
        }

        debug_assert!(point.is_valid(), "invalid polar point {point:?}");
        point
    }

    /// Returns the x component of the unit direction.
    pub fn nx(self) -> Real {
        self.nx
    }

    /// Returns the y component of the unit direction.
    pub fn ny(self) -> Real {
        self.ny
    }

    /// Returns the radius.
    pub fn r(self) -> Real {
        self.r
    }

    /// Returns a copy moved `delta` along its own direction.
    pub fn with_radius_offset(self, delta: Real) -> Self {
        Self {
            r: self.r + delta,
            ..self
        }
    }

    /// Returns a copy with the same direction and radius `r`.
    pub fn with_radius(self, r: Real) -> Self {
        Self { r, ..self }
    }

    /// Checks the representation invariant.
    ///
    /// The radius must not be negative. A zero radius requires a zero
    /// direction, any other radius requires a unit direction.
    pub fn is_valid(self) -> bool {
        if self.r < -EPS {
            return false;
        }

        if self.r.abs() < EPS {
            return self.nx.abs() < EPS && self.ny.abs() < EPS;
        }

        (self.nx.hypot(self.ny) - 1.0).abs() < EPS
    }

    /// Returns `true` if both points lie on the same ray from the origin.
    ///
    /// The origin is codirectional with every point.
    pub fn is_codirectional(self, other: Self) -> bool {
        if self.r.abs() < EPS || other.r.abs() < EPS {
            return true;
        }

        (self.nx - other.nx).abs() < EPS && (self.ny - other.ny).abs() < EPS
    }

    /// Returns the unit normal of this point's direction.
    ///
    /// `up` rotates the direction by +90°, otherwise by -90°. The origin has
    /// no direction and yields the origin.
    pub fn normal(self, up: bool) -> Self {
        if self.r.abs() < EPS {
            return Self::default();
        }

        let (nx, ny) = if up {
            (-self.ny, self.nx)
        } else {
            (self.ny, -self.nx)
        };

        Self { nx, ny, r: 1.0 }
    }

    /// Adds two points as vectors.
    pub fn add(self, other: Self) -> Self {
        let sum = self.to_point().add_point(other.to_point());
        let r = sum.hypot();

        if r > EPS {
            Self {
                nx: sum.x() / r,
                ny: sum.y() / r,
                r,
            }
        } else {
            Self::default()
        }
    }

    /// Converts to cartesian coordinates.
    pub fn to_point(self) -> Point {
        Point::new(self.nx, self.ny).scale(self.r)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::real::PI;

    #[test]
    fn test_point_operations() {
        let p = Point::new(3.0, 4.0);
        assert_approx_eq!(Real, p.hypot(), 5.0);

        let scaled = p.scale(2.0);
        assert_approx_eq!(Real, scaled.x(), 6.0);
        assert_approx_eq!(Real, scaled.y(), 8.0);
    }

    #[test]
    fn test_from_radial_zero_radius_is_origin() {
        let p = PolarPoint::from_radial(1.234, 0.0);
        assert_eq!(p, PolarPoint::default());
        assert!(p.is_valid());
    }

    #[test]
    fn test_from_radial_directions() {
        let p = PolarPoint::from_radial(0.0, 2.0);
        assert_approx_eq!(Real, p.nx(), 1.0, epsilon = EPS);
        assert_approx_eq!(Real, p.ny(), 0.0, epsilon = EPS);
        assert_approx_eq!(Real, p.r(), 2.0);

        let p = PolarPoint::from_radial(PI, 1.0);
        assert_approx_eq!(Real, p.nx(), -1.0, epsilon = EPS);
        assert_approx_eq!(Real, p.ny(), 0.0, epsilon = EPS);
    }

    #[test]
    fn test_is_valid_rejects_malformed_points() {
        let negative = PolarPoint {
            nx: 1.0,
            ny: 0.0,
            r: -1.0,
        };
        assert!(!negative.is_valid());

        let not_unit = PolarPoint {
            nx: 0.5,
            ny: 0.5,
            r: 1.0,
        };
        assert!(!not_unit.is_valid());

        let zero_with_direction = PolarPoint {
            nx: 1.0,
            ny: 0.0,
            r: 0.0,
        };
        assert!(!zero_with_direction.is_valid());
    }

    #[test]
    fn test_codirectional() {
        let a = PolarPoint::from_radial(0.3, 1.0);
        let b = PolarPoint::from_radial(0.3, 5.0);
        let c = PolarPoint::from_radial(0.4, 5.0);
        let origin = PolarPoint::default();

        assert!(a.is_codirectional(b));
        assert!(!a.is_codirectional(c));
        assert!(origin.is_codirectional(c));
        assert!(c.is_codirectional(origin));
    }

    #[test]
    fn test_normal() {
        let p = PolarPoint::from_radial(0.0, 3.0);

        let up = p.normal(true);
        assert_approx_eq!(Real, up.nx(), 0.0, epsilon = EPS);
        assert_approx_eq!(Real, up.ny(), 1.0, epsilon = EPS);
        assert_approx_eq!(Real, up.r(), 1.0);

        let down = p.normal(false);
        assert_approx_eq!(Real, down.ny(), -1.0, epsilon = EPS);

        assert_eq!(PolarPoint::default().normal(true), PolarPoint::default());
    }

    #[test]
    fn test_add() {
        let a = PolarPoint::from_radial(0.0, 1.0);
        let b = PolarPoint::from_radial(PI / 2.0, 1.0);

        let sum = a.add(b);
        assert_approx_eq!(Real, sum.r(), Real::sqrt(2.0), epsilon = EPS);
        assert_approx_eq!(Real, sum.nx(), sum.ny(), epsilon = EPS);

        let opposite = PolarPoint::from_radial(PI, 1.0);
        assert_eq!(a.add(opposite), PolarPoint::default());
    }

    #[test]
    fn test_with_radius_offset() {
        let p = PolarPoint::from_radial(0.5, 2.0).with_radius_offset(1.5);
        assert_approx_eq!(Real, p.r(), 3.5);
        assert!(p.is_valid());

        let q = p.with_radius(0.25);
        assert_approx_eq!(Real, q.r(), 0.25);
        assert_eq!((q.nx(), q.ny()), (p.nx(), p.ny()));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::real::PI;

    fn polar_strategy() -> impl Strategy<Value = PolarPoint> {
        (-2.0 * PI..2.0 * PI, 1.0..1000.0 as Real)
            .prop_map(|(phi, rho)| PolarPoint::from_radial(phi, rho))
    }

    /// Radial construction always produces a valid point.
    fn check_from_radial_is_valid(p: PolarPoint) -> Result<(), TestCaseError> {
        prop_assert!(p.is_valid(), "{p:?}");
        Ok(())
    }

    /// The normal is perpendicular to the direction.
    fn check_normal_is_perpendicular(p: PolarPoint) -> Result<(), TestCaseError> {
        let n = p.normal(true);
        prop_assert!(n.is_valid());
        prop_assert!((n.nx() * p.nx() + n.ny() * p.ny()).abs() < EPS);
        Ok(())
    }

    /// Polar addition agrees with cartesian addition.
    fn check_add_matches_cartesian(a: PolarPoint, b: PolarPoint) -> Result<(), TestCaseError> {
        let sum = a.add(b).to_point();
        let expected = a.to_point().add_point(b.to_point());
        let tolerance = 1e-3;

        prop_assert!((sum.x() - expected.x()).abs() < tolerance);
        prop_assert!((sum.y() - expected.y()).abs() < tolerance);
        Ok(())
    }

    proptest! {
        #[test]
        fn from_radial_is_valid(p in polar_strategy()) {
            check_from_radial_is_valid(p)?;
        }

        #[test]
        fn normal_is_perpendicular(p in polar_strategy()) {
            check_normal_is_perpendicular(p)?;
        }

        #[test]
        fn add_matches_cartesian(a in polar_strategy(), b in polar_strategy()) {
            check_add_matches_cartesian(a, b)?;
        }
    }
}
