//! Chargedrift library
//!
//! A two-dimensional Coulomb simulation: charged particles attract and repel
//! each other inside rectangular walls. The physics core lives in
//! [`physics`]; [`plugins`] drive it from a Bevy app at a fixed tick rate.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod resources;
pub mod states;

// Test utilities are public for integration tests
pub mod test_utils;
