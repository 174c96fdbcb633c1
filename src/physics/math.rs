use crate::error::{Error, Result};
use std::f64::consts::TAU;

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 2D vector type for positions, velocities, and forces
pub type Vector = bevy::math::DVec2;

/// Coulomb's constant `k` in N·m²/C².
pub const COULOMB_CONSTANT: Scalar = 8.987_551_787e9;

/// Per-component tolerance used by [`VectorExt::approx_eq`].
pub const VECTOR_EQUALITY_TOLERANCE: Scalar = 0.05;

/// Planar helpers the simulation needs beyond what `DVec2` provides.
///
/// Trigonometry and square roots go through `libm` so that results do not
/// depend on the platform's math library.
pub trait VectorExt {
    fn magnitude(self) -> Scalar;

    /// Direction of the vector in radians, normalized to `[0, 2π)`.
    fn angle(self) -> Scalar;

    /// Unit vector in the same direction.
    ///
    /// Fails with [`Error::DegenerateVector`] for zero-length or non-finite input.
    fn unit(self) -> Result<Vector>;

    /// Rotates counter-clockwise about the origin.
    fn rotated(self, angle: Scalar) -> Vector;

    fn rotated_around(self, pivot: Vector, angle: Scalar) -> Vector;

    /// Linear interpolation `self * (1 - t) + other * t`.
    fn interpolate(self, other: Vector, t: Scalar) -> Vector;

    fn distance_to(self, other: Vector) -> Scalar;

    fn distance_to_squared(self, other: Vector) -> Scalar;

    /// Mirror across the X axis, `(x, -y)`.
    fn flipped_x(self) -> Vector;

    /// Mirror across the Y axis, `(-x, y)`.
    fn flipped_y(self) -> Vector;

    /// Perpendicular rotated 90° counter-clockwise.
    fn normal(self) -> Vector;

    /// Perpendicular rotated 90° clockwise.
    fn tangent(self) -> Vector;

    /// Unsigned angle in `[0, π]` between two non-zero vectors.
    fn try_angle_between(self, other: Vector) -> Result<Scalar>;

    /// Component-wise comparison within [`VECTOR_EQUALITY_TOLERANCE`].
    fn approx_eq(self, other: Vector) -> bool;
}

impl VectorExt for Vector {
    fn magnitude(self) -> Scalar {
        libm::sqrt(self.x * self.x + self.y * self.y)
    }

    fn angle(self) -> Scalar {
        let angle = libm::atan2(self.y, self.x);
        let angle = if angle < 0.0 { angle + TAU } else { angle };
        // -ε + 2π rounds up to 2π
        if angle >= TAU { 0.0 } else { angle }
    }

    fn unit(self) -> Result<Vector> {
        let magnitude = self.magnitude();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Err(Error::DegenerateVector);
        }
        Ok(self / magnitude)
    }

    fn rotated(self, angle: Scalar) -> Vector {
        let (sin, cos) = (libm::sin(angle), libm::cos(angle));
        Vector::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    fn rotated_around(self, pivot: Vector, angle: Scalar) -> Vector {
        (self - pivot).rotated(angle) + pivot
    }

    fn interpolate(self, other: Vector, t: Scalar) -> Vector {
        self * (1.0 - t) + other * t
    }

    fn distance_to(self, other: Vector) -> Scalar {
        (other - self).magnitude()
    }

    fn distance_to_squared(self, other: Vector) -> Scalar {
        let delta = other - self;
        delta.x * delta.x + delta.y * delta.y
    }

    fn flipped_x(self) -> Vector {
        Vector::new(self.x, -self.y)
    }

    fn flipped_y(self) -> Vector {
        Vector::new(-self.x, self.y)
    }

    fn normal(self) -> Vector {
        Vector::new(-self.y, self.x)
    }

    fn tangent(self) -> Vector {
        Vector::new(self.y, -self.x)
    }

    fn try_angle_between(self, other: Vector) -> Result<Scalar> {
        let denominator = self.magnitude() * other.magnitude();
        if denominator == 0.0 || !denominator.is_finite() {
            return Err(Error::DegenerateVector);
        }
        Ok(libm::acos((self.dot(other) / denominator).clamp(-1.0, 1.0)))
    }

    fn approx_eq(self, other: Vector) -> bool {
        (self.x - other.x).abs() <= VECTOR_EQUALITY_TOLERANCE
            && (self.y - other.y).abs() <= VECTOR_EQUALITY_TOLERANCE
    }
}
