//! Numerical integration of a single body under a force that is held
//! constant for the duration of the step.

use crate::physics::kinematics::KinematicState;
use crate::physics::math::{Scalar, Vector};

pub mod runge_kutta;

pub use runge_kutta::RungeKuttaFourthOrder;

/// Base trait for all integrators
pub trait Integrator: Send + Sync {
    /// Advance position and velocity by one time step.
    ///
    /// # Arguments
    /// * `state` - Kinematic state to advance in place
    /// * `applied_acceleration` - `force / mass` for this step, added to the
    ///   state's own base acceleration
    /// * `dt` - Time step
    fn step(&self, state: &mut KinematicState, applied_acceleration: Vector, dt: Scalar);

    /// Advance one step, then scale the velocity once by `damping`.
    fn step_damped(
        &self,
        state: &mut KinematicState,
        applied_acceleration: Vector,
        dt: Scalar,
        damping: Option<Scalar>,
    ) {
        self.step(state, applied_acceleration, dt);
        if let Some(damping) = damping {
            state.velocity *= damping;
        }
    }

    /// Get the name of this integrator
    fn name(&self) -> &'static str;

    /// Get the order of this integrator
    fn convergence_order(&self) -> usize;

    fn clone_box(&self) -> Box<dyn Integrator>;
}

impl Clone for Box<dyn Integrator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Integrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integrator")
            .field("name", &self.name())
            .field("order", &self.convergence_order())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damping_applies_once_after_step() {
        let integrator = RungeKuttaFourthOrder;
        let mut damped =
            KinematicState::new(Vector::ZERO, Vector::new(10.0, 0.0), Vector::ZERO, 1.0);
        let mut undamped = damped;

        integrator.step_damped(&mut damped, Vector::ZERO, 0.5, Some(0.9));
        integrator.step_damped(&mut undamped, Vector::ZERO, 0.5, None);

        assert_eq!(undamped.velocity, Vector::new(10.0, 0.0));
        assert!((damped.velocity.x - 9.0).abs() < 1e-12);
        // position is integrated with the undamped velocity
        assert_eq!(damped.position, undamped.position);
    }

    #[test]
    fn test_boxed_integrator_clones() {
        let integrator: Box<dyn Integrator> = Box::new(RungeKuttaFourthOrder);
        let cloned = integrator.clone();
        assert_eq!(cloned.name(), "runge_kutta_fourth_order");
        assert_eq!(cloned.convergence_order(), 4);
        assert!(format!("{:?}", &*cloned).contains("runge_kutta_fourth_order"));
    }
}
