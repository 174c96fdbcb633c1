//! Kinematic state of a single body and the arithmetic RK stages need.

use crate::physics::math::{Scalar, Vector};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

/// Motion state of a body in the plane.
///
/// `acceleration` is a persistent base acceleration (for example a uniform
/// external field). Integrators add `force / mass` to it for each step but
/// never overwrite it. Momentum and the angular quantities are derived and
/// refreshed by [`KinematicState::resolve_derived`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KinematicState {
    pub position: Vector,
    pub velocity: Vector,
    pub momentum: Vector,
    pub acceleration: Vector,
    pub angular_velocity: Scalar,
    pub angular_momentum: Scalar,
}

impl KinematicState {
    pub fn new(position: Vector, velocity: Vector, acceleration: Vector, mass: Scalar) -> Self {
        let mut state = Self {
            position,
            velocity,
            acceleration,
            ..Self::default()
        };
        state.resolve_derived(mass);
        state
    }

    /// Recomputes momentum and angular quantities about the origin.
    pub fn resolve_derived(&mut self, mass: Scalar) {
        self.momentum = self.velocity * mass;

        // z component of r × v
        let moment = self.position.x * self.velocity.y - self.position.y * self.velocity.x;
        self.angular_momentum = mass * moment;

        let radius_squared = self.position.length_squared();
        self.angular_velocity = if radius_squared > 0.0 {
            moment / radius_squared
        } else {
            0.0
        };
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.momentum.is_finite()
            && self.acceleration.is_finite()
            && self.angular_velocity.is_finite()
            && self.angular_momentum.is_finite()
    }
}

impl Add for KinematicState {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            position: self.position + rhs.position,
            velocity: self.velocity + rhs.velocity,
            momentum: self.momentum + rhs.momentum,
            acceleration: self.acceleration + rhs.acceleration,
            angular_velocity: self.angular_velocity + rhs.angular_velocity,
            angular_momentum: self.angular_momentum + rhs.angular_momentum,
        }
    }
}

impl Sub for KinematicState {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + rhs * -1.0
    }
}

impl Mul<Scalar> for KinematicState {
    type Output = Self;

    fn mul(self, rhs: Scalar) -> Self {
        Self {
            position: self.position * rhs,
            velocity: self.velocity * rhs,
            momentum: self.momentum * rhs,
            acceleration: self.acceleration * rhs,
            angular_velocity: self.angular_velocity * rhs,
            angular_momentum: self.angular_momentum * rhs,
        }
    }
}

impl Div<Scalar> for KinematicState {
    type Output = Self;

    fn div(self, rhs: Scalar) -> Self {
        Self {
            position: self.position / rhs,
            velocity: self.velocity / rhs,
            momentum: self.momentum / rhs,
            acceleration: self.acceleration / rhs,
            angular_velocity: self.angular_velocity / rhs,
            angular_momentum: self.angular_momentum / rhs,
        }
    }
}

impl AddAssign for KinematicState {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for KinematicState {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<Scalar> for KinematicState {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = *self * rhs;
    }
}

impl DivAssign<Scalar> for KinematicState {
    fn div_assign(&mut self, rhs: Scalar) {
        *self = *self / rhs;
    }
}

/// Time derivative of position and velocity at one RK stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Derivative {
    pub position: Vector,
    pub velocity: Vector,
}

impl Add for Derivative {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            position: self.position + rhs.position,
            velocity: self.velocity + rhs.velocity,
        }
    }
}

impl Mul<Scalar> for Derivative {
    type Output = Self;

    fn mul(self, rhs: Scalar) -> Self {
        Self {
            position: self.position * rhs,
            velocity: self.velocity * rhs,
        }
    }
}
