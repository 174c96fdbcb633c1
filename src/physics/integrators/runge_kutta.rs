//! Runge-Kutta integration methods

use super::Integrator;
use crate::physics::kinematics::{Derivative, KinematicState};
use crate::physics::math::{Scalar, Vector};

/// Fourth-order Runge-Kutta integrator (RK4)
///
/// The force is sampled once per step, so every stage sees the same
/// acceleration and only the stage velocities differ:
///
/// 1. k1 = f(t, y)
/// 2. k2 = f(t + dt/2, y + k1*dt/2)
/// 3. k3 = f(t + dt/2, y + k2*dt/2)
/// 4. k4 = f(t + dt, y + k3*dt)
/// 5. y(t+dt) = y(t) + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
///
/// Under a constant force this reproduces `Δx = v·dt + ½a·dt²` and
/// `Δv = a·dt` exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFourthOrder;

impl RungeKuttaFourthOrder {
    fn evaluate(
        state: &KinematicState,
        acceleration: Vector,
        dt: Scalar,
        previous: Derivative,
    ) -> Derivative {
        Derivative {
            position: state.velocity + previous.velocity * dt,
            velocity: acceleration,
        }
    }
}

impl Integrator for RungeKuttaFourthOrder {
    fn step(&self, state: &mut KinematicState, applied_acceleration: Vector, dt: Scalar) {
        let acceleration = state.acceleration + applied_acceleration;

        let k1 = Self::evaluate(state, acceleration, 0.0, Derivative::default());
        let k2 = Self::evaluate(state, acceleration, dt * 0.5, k1);
        let k3 = Self::evaluate(state, acceleration, dt * 0.5, k2);
        let k4 = Self::evaluate(state, acceleration, dt, k3);

        let combined = (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0);
        state.position += combined.position;
        state.velocity += combined.velocity;
    }

    fn name(&self) -> &'static str {
        "runge_kutta_fourth_order"
    }

    fn convergence_order(&self) -> usize {
        4
    }

    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rk4_constant_acceleration_is_exact() {
        let rk4 = RungeKuttaFourthOrder;
        let mut state = KinematicState::new(
            Vector::new(1.0, 0.0),
            Vector::new(0.0, 1.0),
            Vector::ZERO,
            1.0,
        );
        let acceleration = Vector::new(0.0, -9.81);
        let dt = 0.01;

        rk4.step(&mut state, acceleration, dt);

        assert!((state.velocity - Vector::new(0.0, 1.0 - 0.0981)).length() < 1e-12);
        let expected_position = Vector::new(1.0, 0.01 - 0.5 * 9.81 * dt * dt);
        assert!(
            (state.position - expected_position).length() < 1e-12,
            "Position should match x + v·dt + ½a·dt², got {:?}",
            state.position
        );
    }

    #[test]
    fn test_rk4_adds_base_acceleration_without_overwriting_it() {
        let rk4 = RungeKuttaFourthOrder;
        let field = Vector::new(2.0, 0.0);
        let mut state = KinematicState::new(Vector::ZERO, Vector::ZERO, field, 1.0);

        rk4.step(&mut state, Vector::new(0.0, 4.0), 1.0);

        assert_eq!(state.acceleration, field);
        assert!((state.velocity - Vector::new(2.0, 4.0)).length() < 1e-12);
        assert!((state.position - Vector::new(1.0, 2.0)).length() < 1e-12);
    }

    #[test]
    fn test_rk4_zero_force_is_uniform_motion() {
        let rk4 = RungeKuttaFourthOrder;
        let mut state = KinematicState::new(
            Vector::new(-3.0, 7.0),
            Vector::new(1.5, -0.25),
            Vector::ZERO,
            1.0,
        );

        for _ in 0..120 {
            rk4.step(&mut state, Vector::ZERO, 1.0 / 120.0);
        }

        assert_eq!(state.velocity, Vector::new(1.5, -0.25));
        assert!((state.position - Vector::new(-1.5, 6.75)).length() < 1e-9);
    }

    #[test]
    fn test_rk4_zero_dt_is_identity() {
        let rk4 = RungeKuttaFourthOrder;
        let original = KinematicState::new(
            Vector::new(4.0, 4.0),
            Vector::new(1.0, 2.0),
            Vector::ZERO,
            1.0,
        );
        let mut state = original;

        rk4.step(&mut state, Vector::new(100.0, 100.0), 0.0);

        assert_eq!(state, original);
    }
}
