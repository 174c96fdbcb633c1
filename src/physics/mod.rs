//! Two-dimensional electrostatics core
//!
//! Everything in here is plain data and functions with no ECS dependency;
//! the Bevy plugins drive it one fixed tick at a time.

pub mod charged;
pub mod integrators;
pub mod kinematics;
pub mod math;
pub mod particle;
pub mod simulation;

pub use charged::{ChargeSign, ChargedParticle, SpawnDefaults, StepOptions};
pub use particle::{Bounds, Particle};
pub use simulation::{EnergySnapshot, PairwiseModel, ParticleHandle, Simulation, StepReport};
