//! Chargedrift prelude module
//!
//! This module re-exports the most commonly used types, traits, and functions
//! across the application to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;
pub use rand::Rng;

// Internal re-exports - Config
pub use crate::config::SimulationConfig;

// Internal re-exports - States
pub use crate::states::AppState;

// Internal re-exports - Events
pub use crate::events::SimulationCommand;

// Internal re-exports - Resources
pub use crate::resources::{
    ChargeSimulation, LastStepReport, PhysicsTime, SharedRng, TickLimit,
};

// Internal re-exports - Physics
pub use crate::physics::math::{Scalar, Vector, VectorExt};
pub use crate::physics::{
    Bounds, ChargeSign, ChargedParticle, PairwiseModel, Simulation, StepOptions,
};

// Internal re-exports - Plugins
pub use crate::plugins::simulation::ChargeSimulationPlugin;
pub use crate::plugins::simulation_diagnostics::SimulationDiagnosticsPlugin;

// Note: the crate's `Result` alias is not re-exported; it would shadow Bevy's.
