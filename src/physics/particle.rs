//! Physical bodies: mass, radius, confining walls and contact response.

use crate::error::{Error, Result};
use crate::physics::integrators::Integrator;
use crate::physics::kinematics::KinematicState;
use crate::physics::math::{Scalar, Vector, VectorExt};

/// Axis-aligned walls confining a particle.
///
/// Screen convention: `top` is the smaller y value and `bottom` the larger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: Scalar,
    pub right: Scalar,
    pub top: Scalar,
    pub bottom: Scalar,
}

impl Bounds {
    pub fn new(left: Scalar, right: Scalar, top: Scalar, bottom: Scalar) -> Result<Self> {
        if [left, right, top, bottom].iter().any(|edge| edge.is_nan()) {
            return Err(Error::InvalidParameter("bounds must not be NaN".to_string()));
        }
        if left > right || top > bottom {
            return Err(Error::InvalidParameter(format!(
                "bounds are inverted: left {left}, right {right}, top {top}, bottom {bottom}"
            )));
        }
        Ok(Self {
            left,
            right,
            top,
            bottom,
        })
    }

    /// Walls of a `width` × `height` viewport with its origin at the top-left corner.
    pub fn from_size(width: Scalar, height: Scalar) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "viewport size must be positive and finite, got {width} × {height}"
            )));
        }
        Self::new(0.0, width, 0.0, height)
    }

    /// Walls at infinity; nothing is ever resolved against them.
    pub fn unbounded() -> Self {
        Self {
            left: Scalar::NEG_INFINITY,
            right: Scalar::INFINITY,
            top: Scalar::NEG_INFINITY,
            bottom: Scalar::INFINITY,
        }
    }

    pub fn width(&self) -> Scalar {
        self.right - self.left
    }

    pub fn height(&self) -> Scalar {
        self.bottom - self.top
    }

    /// Whether a disc of `radius` centred at `position` lies fully inside.
    pub fn contains(&self, position: Vector, radius: Scalar) -> bool {
        position.x - radius >= self.left
            && position.x + radius <= self.right
            && position.y - radius >= self.top
            && position.y + radius <= self.bottom
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            left: 0.0,
            right: 1200.0,
            top: 0.0,
            bottom: 900.0,
        }
    }
}

pub(crate) fn validate_mass(mass: Scalar) -> Result<()> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "mass must be positive and finite, got {mass}"
        )))
    }
}

pub(crate) fn validate_time_step(dt: Scalar) -> Result<()> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "time step must be finite and non-negative, got {dt}"
        )))
    }
}

pub(crate) fn validate_damping(damping: Option<Scalar>) -> Result<()> {
    match damping {
        Some(damping) if !(damping > 0.0 && damping <= 1.0) => Err(Error::InvalidParameter(
            format!("velocity damping must be in (0, 1], got {damping}"),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn validate_restitution(restitution: Scalar) -> Result<()> {
    if (0.0..=1.0).contains(&restitution) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "restitution must be in [0, 1], got {restitution}"
        )))
    }
}

/// A massive disc moving in the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    mass: Scalar,
    radius: Scalar,
    bounds: Bounds,
    kinematics: KinematicState,
    kinetic_energy: Scalar,
}

impl Particle {
    pub fn new(mass: Scalar, radius: Scalar, position: Vector, velocity: Vector) -> Result<Self> {
        validate_mass(mass)?;
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "radius must be finite and non-negative, got {radius}"
            )));
        }
        if !position.is_finite() || !velocity.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "initial position {position} and velocity {velocity} must be finite"
            )));
        }

        let mut particle = Self {
            mass,
            radius,
            bounds: Bounds::default(),
            kinematics: KinematicState::new(position, velocity, Vector::ZERO, mass),
            kinetic_energy: 0.0,
        };
        particle.refresh();
        Ok(particle)
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    #[inline]
    pub fn mass(&self) -> Scalar {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> Scalar {
        self.radius
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn kinematics(&self) -> &KinematicState {
        &self.kinematics
    }

    #[inline]
    pub fn position(&self) -> Vector {
        self.kinematics.position
    }

    #[inline]
    pub fn velocity(&self) -> Vector {
        self.kinematics.velocity
    }

    #[inline]
    pub fn momentum(&self) -> Vector {
        self.kinematics.momentum
    }

    #[inline]
    pub fn acceleration(&self) -> Vector {
        self.kinematics.acceleration
    }

    #[inline]
    pub fn angular_velocity(&self) -> Scalar {
        self.kinematics.angular_velocity
    }

    #[inline]
    pub fn angular_momentum(&self) -> Scalar {
        self.kinematics.angular_momentum
    }

    #[inline]
    pub fn kinetic_energy(&self) -> Scalar {
        self.kinetic_energy
    }

    /// `½·m·|v|²` for this particle's mass at an arbitrary velocity.
    pub fn resolve_kinetic_energy(&self, velocity: Vector) -> Scalar {
        0.5 * self.mass * velocity.length_squared()
    }

    pub fn set_bounds(
        &mut self,
        left: Scalar,
        right: Scalar,
        top: Scalar,
        bottom: Scalar,
    ) -> Result<()> {
        self.bounds = Bounds::new(left, right, top, bottom)?;
        Ok(())
    }

    pub fn move_to(&mut self, position: Vector) -> Result<()> {
        if !position.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "position must be finite, got {position}"
            )));
        }
        self.kinematics.position = position;
        self.refresh();
        Ok(())
    }

    pub fn set_velocity(&mut self, velocity: Vector) -> Result<()> {
        if !velocity.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "velocity must be finite, got {velocity}"
            )));
        }
        self.kinematics.velocity = velocity;
        self.refresh();
        Ok(())
    }

    /// Sets the persistent base acceleration added to every step.
    pub fn set_acceleration(&mut self, acceleration: Vector) -> Result<()> {
        if !acceleration.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "acceleration must be finite, got {acceleration}"
            )));
        }
        self.kinematics.acceleration = acceleration;
        Ok(())
    }

    pub fn distance_to(&self, other: &Particle) -> Scalar {
        self.position().distance_to(other.position())
    }

    pub fn overlapping_with(&self, other: &Particle) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }

    /// Direction from this particle's centre towards `other`'s.
    pub fn unit_vector_to(&self, other: &Particle) -> Result<Vector> {
        (other.position() - self.position()).unit()
    }

    /// Clamps the particle inside its walls and reflects the velocity
    /// component normal to each wall it penetrated, scaled by `restitution`.
    ///
    /// Walls are checked independently (bottom, top, left, right), so a
    /// corner can resolve two of them. Returns how many were resolved.
    pub fn resolve_boundary_collisions(&mut self, restitution: Scalar) -> usize {
        let Bounds {
            left,
            right,
            top,
            bottom,
        } = self.bounds;
        let radius = self.radius;
        let state = &mut self.kinematics;
        let mut resolved = 0;

        if state.position.y + radius > bottom {
            state.position.y = bottom - radius;
            state.velocity.y = -state.velocity.y * restitution;
            resolved += 1;
        }
        if state.position.y - radius < top {
            state.position.y = top + radius;
            state.velocity.y = -state.velocity.y * restitution;
            resolved += 1;
        }
        if state.position.x - radius < left {
            state.position.x = left + radius;
            state.velocity.x = -state.velocity.x * restitution;
            resolved += 1;
        }
        if state.position.x + radius > right {
            state.position.x = right - radius;
            state.velocity.x = -state.velocity.x * restitution;
            resolved += 1;
        }

        if resolved > 0 {
            self.refresh();
        }
        resolved
    }

    /// Elastic contact response between two overlapping, approaching discs.
    ///
    /// Velocities are rotated into the frame of the line of centres, the
    /// normal components exchanged with the 1D elastic formula, and rotated
    /// back; both results are then scaled by `restitution`. Returns whether
    /// a response was applied.
    pub fn resolve_collision_with(&mut self, other: &mut Particle, restitution: Scalar) -> bool {
        let separation = other.position() - self.position();
        let closing = self.velocity() - other.velocity();

        if !self.overlapping_with(other) || closing.dot(separation) <= 0.0 {
            return false;
        }

        let (m1, m2) = (self.mass, other.mass);
        let total = m1 + m2;
        let angle = -libm::atan2(separation.y, separation.x);

        let u1 = self.velocity().rotated(angle);
        let u2 = other.velocity().rotated(angle);
        let v1 = Vector::new(u1.x * (m1 - m2) / total + u2.x * 2.0 * m2 / total, u1.y);
        let v2 = Vector::new(u2.x * (m2 - m1) / total + u1.x * 2.0 * m1 / total, u2.y);

        self.kinematics.velocity = v1.rotated(-angle) * restitution;
        other.kinematics.velocity = v2.rotated(-angle) * restitution;
        self.refresh();
        other.refresh();
        true
    }

    /// Advances the particle one tick under a constant `force`.
    ///
    /// Integrates (damping applied once after the step), resolves walls with
    /// `restitution` (elastic when `None`), then refreshes momentum, angular
    /// quantities and kinetic energy. A step that produces a non-finite state
    /// is rolled back and reported as [`Error::NonFiniteState`].
    pub fn update(
        &mut self,
        integrator: &dyn Integrator,
        dt: Scalar,
        force: Vector,
        damping: Option<Scalar>,
        restitution: Option<Scalar>,
    ) -> Result<()> {
        validate_time_step(dt)?;
        validate_damping(damping)?;
        let restitution = restitution.unwrap_or(1.0);
        validate_restitution(restitution)?;

        let previous = self.kinematics;
        integrator.step_damped(&mut self.kinematics, force / self.mass, dt, damping);
        self.resolve_boundary_collisions(restitution);
        self.refresh();

        if !self.kinematics.is_finite() || !self.kinetic_energy.is_finite() {
            let rejected = self.kinematics;
            self.kinematics = previous;
            self.refresh();
            return Err(Error::NonFiniteState(format!(
                "update under force {force} produced position {} and velocity {}",
                rejected.position, rejected.velocity
            )));
        }

        Ok(())
    }

    fn refresh(&mut self) {
        self.kinematics.resolve_derived(self.mass);
        self.kinetic_energy = self.resolve_kinetic_energy(self.kinematics.velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::integrators::RungeKuttaFourthOrder;

    fn particle_at(x: Scalar, y: Scalar, vx: Scalar, vy: Scalar) -> Particle {
        Particle::new(1.0, 5.0, Vector::new(x, y), Vector::new(vx, vy)).unwrap()
    }

    #[test]
    fn test_construction_rejects_bad_parameters() {
        assert!(matches!(
            Particle::new(0.0, 5.0, Vector::ZERO, Vector::ZERO),
            Err(Error::InvalidParameter(_))
        ));
        assert!(Particle::new(Scalar::NAN, 5.0, Vector::ZERO, Vector::ZERO).is_err());
        assert!(Particle::new(1.0, -1.0, Vector::ZERO, Vector::ZERO).is_err());
        assert!(Particle::new(1.0, 1.0, Vector::new(Scalar::INFINITY, 0.0), Vector::ZERO).is_err());
    }

    #[test]
    fn test_kinetic_energy_and_momentum_follow_velocity() {
        let mut particle = Particle::new(2.0, 1.0, Vector::ZERO, Vector::new(3.0, 4.0)).unwrap();
        assert_eq!(particle.kinetic_energy(), 25.0);
        assert_eq!(particle.momentum(), Vector::new(6.0, 8.0));

        particle.set_velocity(Vector::new(1.0, 0.0)).unwrap();
        assert_eq!(particle.kinetic_energy(), 1.0);
        assert_eq!(particle.momentum(), Vector::new(2.0, 0.0));
    }

    #[test]
    fn test_bounds_validation() {
        assert!(Bounds::new(0.0, 10.0, 0.0, 10.0).is_ok());
        assert!(Bounds::new(10.0, 0.0, 0.0, 10.0).is_err());
        assert!(Bounds::new(0.0, 10.0, 10.0, 0.0).is_err());
        assert!(Bounds::from_size(0.0, 10.0).is_err());

        let bounds = Bounds::from_size(1200.0, 900.0).unwrap();
        assert_eq!(bounds, Bounds::default());
        assert_eq!(bounds.width(), 1200.0);
        assert_eq!(bounds.height(), 900.0);
        assert!(bounds.contains(Vector::new(600.0, 450.0), 5.0));
        assert!(!bounds.contains(Vector::new(2.0, 450.0), 5.0));
    }

    #[test]
    fn test_elastic_wall_negates_velocity_component() {
        let mut particle = particle_at(1197.0, 450.0, 30.0, -2.0);

        let resolved = particle.resolve_boundary_collisions(1.0);

        assert_eq!(resolved, 1);
        assert_eq!(particle.position().x, 1195.0);
        assert_eq!(particle.velocity(), Vector::new(-30.0, -2.0));
    }

    #[test]
    fn test_inelastic_wall_zeroes_velocity_component() {
        let mut particle = particle_at(600.0, 2.0, 4.0, -12.0);

        particle.resolve_boundary_collisions(0.0);

        assert_eq!(particle.position().y, 5.0);
        assert_eq!(particle.velocity().y, 0.0);
        assert_eq!(particle.velocity().x, 4.0);
        assert_eq!(particle.kinetic_energy(), 8.0);
    }

    #[test]
    fn test_corner_resolves_two_walls() {
        let mut particle = particle_at(-1.0, 903.0, -1.0, 1.0);

        let resolved = particle.resolve_boundary_collisions(0.5);

        assert_eq!(resolved, 2);
        assert_eq!(particle.position(), Vector::new(5.0, 895.0));
        assert_eq!(particle.velocity(), Vector::new(0.5, -0.5));
    }

    #[test]
    fn test_head_on_equal_mass_collision_swaps_velocities() {
        let mut a = particle_at(100.0, 100.0, 2.0, 0.0);
        let mut b = particle_at(108.0, 100.0, -1.0, 0.0);

        assert!(a.resolve_collision_with(&mut b, 1.0));

        assert!((a.velocity() - Vector::new(-1.0, 0.0)).length() < 1e-12);
        assert!((b.velocity() - Vector::new(2.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_separating_or_distant_particles_do_not_collide() {
        let mut a = particle_at(100.0, 100.0, -2.0, 0.0);
        let mut b = particle_at(108.0, 100.0, 1.0, 0.0);
        assert!(!a.resolve_collision_with(&mut b, 1.0));

        let mut c = particle_at(100.0, 100.0, 2.0, 0.0);
        let mut d = particle_at(200.0, 100.0, -1.0, 0.0);
        assert!(!c.resolve_collision_with(&mut d, 1.0));
        assert_eq!(c.velocity(), Vector::new(2.0, 0.0));
    }

    #[test]
    fn test_oblique_collision_keeps_tangential_components() {
        let mut a = particle_at(0.0, 0.0, 1.0, 1.0);
        let mut b = particle_at(6.0, 6.0, 0.0, 0.0);
        let before = a.kinetic_energy() + b.kinetic_energy();

        assert!(a.resolve_collision_with(&mut b, 1.0));

        // all of a's velocity lies along the line of centres
        assert!(a.velocity().length() < 1e-12);
        assert!((b.velocity() - Vector::new(1.0, 1.0)).length() < 1e-12);
        assert!((a.kinetic_energy() + b.kinetic_energy() - before).abs() < 1e-12);
    }

    #[test]
    fn test_update_advances_and_reflects() {
        let rk4 = RungeKuttaFourthOrder;
        let mut particle = particle_at(1190.0, 450.0, 600.0, 0.0);

        particle
            .update(&rk4, 1.0 / 60.0, Vector::ZERO, None, Some(1.0))
            .unwrap();

        assert_eq!(particle.position().x, 1195.0);
        assert_eq!(particle.velocity().x, -600.0);
        assert_eq!(particle.momentum(), Vector::new(-600.0, 0.0));
    }

    #[test]
    fn test_update_rejects_non_finite_result() {
        let rk4 = RungeKuttaFourthOrder;
        let mut particle = particle_at(600.0, 450.0, 1.0, 0.0);
        let before = particle.clone();

        let result = particle.update(
            &rk4,
            1.0,
            Vector::new(Scalar::INFINITY, 0.0),
            None,
            None,
        );

        assert!(matches!(result, Err(Error::NonFiniteState(_))));
        assert_eq!(particle, before);
    }

    #[test]
    fn test_update_validates_parameters() {
        let rk4 = RungeKuttaFourthOrder;
        let mut particle = particle_at(600.0, 450.0, 0.0, 0.0);

        assert!(particle.update(&rk4, -1.0, Vector::ZERO, None, None).is_err());
        assert!(particle.update(&rk4, 0.1, Vector::ZERO, Some(0.0), None).is_err());
        assert!(particle.update(&rk4, 0.1, Vector::ZERO, Some(1.5), None).is_err());
        assert!(particle.update(&rk4, 0.1, Vector::ZERO, None, Some(-0.1)).is_err());
    }
}
