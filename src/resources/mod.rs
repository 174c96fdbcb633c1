use crate::physics::math::Scalar;
use crate::physics::simulation::{Simulation, StepReport};
use crate::prelude::*;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

/// The particle set driven by the fixed-tick systems.
#[derive(Resource, Deref, DerefMut, Debug, Clone, Default)]
pub struct ChargeSimulation(pub Simulation);

#[derive(Resource, Deref, DerefMut, Debug, Clone, PartialEq)]
pub struct SharedRng(pub ChaCha8Rng);

impl SharedRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::default(),
        }
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self(ChaCha8Rng::from_rng(&mut rand::rng()))
    }
}

/// Simulation clock, advanced by exactly `dt` per completed tick.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhysicsTime {
    /// Fixed tick length in simulated seconds
    pub dt: Scalar,
    /// Simulated time at the start of the next tick
    pub elapsed: Scalar,
    /// Completed ticks
    pub tick: u64,
    pub paused: bool,
}

impl Default for PhysicsTime {
    fn default() -> Self {
        Self::new(1.0 / 120.0)
    }
}

impl PhysicsTime {
    pub fn new(dt: Scalar) -> Self {
        Self {
            dt,
            elapsed: 0.0,
            tick: 0,
            paused: false,
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn advance(&mut self) {
        self.elapsed += self.dt;
        self.tick += 1;
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.tick = 0;
    }
}

/// Outcome of the most recent tick.
#[derive(Resource, Deref, DerefMut, Debug, Clone, Copy, Default, PartialEq)]
pub struct LastStepReport(pub StepReport);

/// Exit the app once this many ticks have completed.
#[derive(Resource, Deref, DerefMut, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickLimit(pub u64);
