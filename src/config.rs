use crate::error::{Error, Result};
use crate::physics::charged::{ChargeSign, SpawnDefaults, StepOptions};
use crate::physics::math::{Scalar, Vector};
use crate::physics::particle::Bounds;
use crate::physics::simulation::{PairwiseModel, Simulation};
use bevy::prelude::*;
use directories::ProjectDirs;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix of environment overrides, e.g. `CHARGEDRIFT_PHYSICS__MAX_FORCE=0.01`.
pub const ENVIRONMENT_PREFIX: &str = "CHARGEDRIFT";

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub bounds: BoundsConfig,
    pub spawn: SpawnConfig,
    pub scenario: ScenarioConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed ticks per second.
    pub tick_rate: Scalar,
    /// Simulated seconds per real second; `dt = time_scale / tick_rate`.
    pub time_scale: Scalar,
    pub velocity_damping: Scalar,
    pub max_force: Scalar,
    pub wall_restitution: Scalar,
    pub particle_collisions: bool,
    pub particle_restitution: Scalar,
    pub pairwise_model: PairwiseModel,
    pub initial_seed: Option<u64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tick_rate: 120.0,
            time_scale: 1.0,
            velocity_damping: 0.999,
            max_force: 0.001,
            wall_restitution: 1.0,
            particle_collisions: false,
            particle_restitution: 1.0,
            pairwise_model: PairwiseModel::default(),
            initial_seed: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BoundsConfig {
    pub width: Scalar,
    pub height: Scalar,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 900.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    pub mass: Scalar,
    pub radius: Scalar,
    pub unit_charge: Scalar,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        let defaults = SpawnDefaults::default();
        Self {
            mass: defaults.mass,
            radius: defaults.radius,
            unit_charge: defaults.unit_charge,
        }
    }
}

impl From<&SpawnConfig> for SpawnDefaults {
    fn from(config: &SpawnConfig) -> Self {
        Self {
            mass: config.mass,
            radius: config.radius,
            unit_charge: config.unit_charge,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub particles: Vec<ParticleConfig>,
    /// Extra particles at rest with random sign, placed uniformly inside the bounds.
    pub random_particles: usize,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let spawn = SpawnConfig::default();
        Self {
            particles: vec![
                ParticleConfig {
                    position: [500.0, 400.0],
                    ..ParticleConfig::default()
                },
                ParticleConfig {
                    charge: -spawn.unit_charge,
                    position: [700.0, 500.0],
                    ..ParticleConfig::default()
                },
            ],
            random_particles: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub mass: Scalar,
    pub radius: Scalar,
    pub charge: Scalar,
    pub position: [Scalar; 2],
    pub velocity: [Scalar; 2],
}

impl Default for ParticleConfig {
    fn default() -> Self {
        let spawn = SpawnConfig::default();
        Self {
            mass: spawn.mass,
            radius: spawn.radius,
            charge: spawn.unit_charge,
            position: [0.0, 0.0],
            velocity: [0.0, 0.0],
        }
    }
}

impl SimulationConfig {
    /// Fixed tick length in simulated seconds.
    pub fn dt(&self) -> Scalar {
        self.physics.time_scale / self.physics.tick_rate
    }

    pub fn step_options(&self) -> StepOptions {
        StepOptions::default()
            .with_damping(self.physics.velocity_damping)
            .with_restitution(self.physics.wall_restitution)
            .with_max_force(self.physics.max_force)
    }

    pub fn bounds(&self) -> Result<Bounds> {
        Bounds::from_size(self.bounds.width, self.bounds.height)
    }

    pub fn validate(&self) -> Result<()> {
        let physics = &self.physics;
        if !(physics.tick_rate.is_finite() && physics.tick_rate > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "tick rate must be positive, got {}",
                physics.tick_rate
            )));
        }
        if !(physics.time_scale.is_finite() && physics.time_scale > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "time scale must be positive, got {}",
                physics.time_scale
            )));
        }
        self.step_options().validate()?;
        if physics.particle_collisions && !(0.0..=1.0).contains(&physics.particle_restitution) {
            return Err(Error::InvalidParameter(format!(
                "particle restitution must be in [0, 1], got {}",
                physics.particle_restitution
            )));
        }
        self.bounds()?;
        if !(self.spawn.unit_charge.is_finite() && self.spawn.unit_charge != 0.0) {
            return Err(Error::InvalidParameter(format!(
                "spawn unit charge must be finite and non-zero, got {}",
                self.spawn.unit_charge
            )));
        }
        Ok(())
    }

    /// Builds a populated simulation: the listed particles first, then
    /// `random_particles` drawn from `rng`.
    pub fn build_simulation(&self, rng: &mut impl Rng) -> Result<Simulation> {
        self.validate()?;

        let bounds = self.bounds()?;
        let mut simulation = Simulation::new(bounds)
            .with_model(self.physics.pairwise_model)
            .with_spawn_defaults(SpawnDefaults::from(&self.spawn));
        if self.physics.particle_collisions {
            simulation = simulation.with_particle_collisions(self.physics.particle_restitution)?;
        }

        for particle in &self.scenario.particles {
            simulation.create_particle(
                particle.mass,
                particle.radius,
                particle.charge,
                Vector::from_array(particle.position),
                Vector::from_array(particle.velocity),
            )?;
        }

        let radius = self.spawn.radius;
        let (min_x, max_x) = (bounds.left + radius, bounds.right - radius);
        let (min_y, max_y) = (bounds.top + radius, bounds.bottom - radius);
        if self.scenario.random_particles > 0 && (min_x > max_x || min_y > max_y) {
            return Err(Error::InvalidParameter(format!(
                "bounds {} × {} cannot hold particles of radius {radius}",
                bounds.width(),
                bounds.height()
            )));
        }

        for _ in 0..self.scenario.random_particles {
            let position = Vector::new(
                rng.random_range(min_x..=max_x),
                rng.random_range(min_y..=max_y),
            );
            let sign = if rng.random_bool(0.5) {
                ChargeSign::Positive
            } else {
                ChargeSign::Negative
            };
            simulation.spawn(sign, position)?;
        }

        Ok(simulation)
    }

    /// Layers defaults, the TOML file at `path` (if present) and
    /// `CHARGEDRIFT_*` environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        Self::load_layered(path, ENVIRONMENT_PREFIX)
    }

    fn load_layered(path: &Path, environment_prefix: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(environment_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load configuration from a file and the environment, falling back to
    /// defaults if either fails to parse. A missing file is not an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load_or_default_with_prefix(path.as_ref(), ENVIRONMENT_PREFIX)
    }

    fn load_or_default_with_prefix(path: &Path, environment_prefix: &str) -> Self {
        if !path.exists() {
            info!(
                "Config file {} not found. Using defaults and environment overrides.",
                path.display()
            );
        }

        match Self::load_layered(path, environment_prefix) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config file {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Platform configuration file, e.g. `~/.config/chargedrift/config.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "chargedrift")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn load_from_user_config() -> Self {
        match Self::user_config_path() {
            Some(path) => Self::load_or_default(path),
            None => {
                warn!("No home directory found. Using default configuration.");
                Self::default()
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}
