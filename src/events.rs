//! Centralized event definitions
//!
//! Commands arrive from whatever drives the app (input handling, scripts,
//! tests) and are applied by the simulation plugin between ticks.

use crate::physics::charged::ChargeSign;
use crate::physics::math::{Scalar, Vector};
use bevy::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SimulationCommand {
    /// Rebuild the configured scenario from scratch.
    Restart,
    TogglePause,
    /// Add a particle at rest with the configured spawn defaults.
    SpawnCharge { sign: ChargeSign, position: Vector },
    /// Move every particle's walls to a `width` × `height` viewport.
    ResizeBounds { width: Scalar, height: Scalar },
    Quit,
}
