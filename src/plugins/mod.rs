//! Self-contained Bevy plugins

pub mod simulation;
pub mod simulation_diagnostics;
