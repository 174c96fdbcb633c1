//! Command line interface for Chargedrift

use clap::Parser;
use std::fmt;
use std::path::Path;

use crate::config::SimulationConfig;
use crate::physics::math::Scalar;
use crate::physics::simulation::PairwiseModel;

/// CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// An explicitly requested configuration file does not exist
    ConfigNotFound(String),
    /// Configuration file could not be loaded
    ConfigLoad(String),
    /// The configuration after overrides is unusable
    InvalidConfig(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::ConfigNotFound(path) => write!(f, "Configuration file not found: {path}"),
            CliError::ConfigLoad(msg) => write!(f, "Failed to load configuration: {msg}"),
            CliError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Chargedrift - 2D electrostatic particle simulation
#[derive(Parser, Debug)]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about,
    long_about = None
)]
pub struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Stop after this many fixed ticks (runs until interrupted otherwise)
    #[arg(short = 't', long, value_name = "COUNT")]
    pub ticks: Option<u64>,

    /// Fixed ticks per second (overrides config file)
    #[arg(long, value_name = "HZ")]
    pub tick_rate: Option<Scalar>,

    /// Per-tick velocity damping factor in (0, 1] (overrides config file)
    #[arg(short = 'd', long, value_name = "FACTOR")]
    pub damping: Option<Scalar>,

    /// Per-pair force magnitude clamp in newtons (overrides config file)
    #[arg(long, value_name = "NEWTONS")]
    pub max_force: Option<Scalar>,

    /// Wall coefficient of restitution in [0, 1] (overrides config file)
    #[arg(short = 'r', long, value_name = "COEFFICIENT")]
    pub restitution: Option<Scalar>,

    /// How pairwise forces are applied each tick
    #[arg(short = 'm', long, value_enum, value_name = "MODEL")]
    pub model: Option<PairwiseModel>,

    /// Enable elastic particle-particle collisions
    #[arg(long)]
    pub collisions: bool,

    /// Number of randomly placed charges to add to the scenario
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub random: Option<usize>,

    /// Random seed for particle placement
    #[arg(short = 's', long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Viewport width in pixels (overrides config file)
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<Scalar>,

    /// Viewport height in pixels (overrides config file)
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<Scalar>,

    /// Start paused
    #[arg(short = 'p', long)]
    pub paused: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Loads configuration from file or defaults, then applies command-line overrides
pub fn load_and_apply_config(args: &Args) -> Result<SimulationConfig, CliError> {
    let mut config = match &args.config {
        Some(config_path) => {
            if !Path::new(config_path).exists() {
                return Err(CliError::ConfigNotFound(config_path.clone()));
            }
            println!("Loading configuration from: {config_path}");
            SimulationConfig::load_from_path(Path::new(config_path))
                .map_err(|err| CliError::ConfigLoad(err.to_string()))?
        }
        None => SimulationConfig::load_from_user_config(),
    };

    apply_overrides(args, &mut config);

    config
        .validate()
        .map_err(|err| CliError::InvalidConfig(err.to_string()))?;

    Ok(config)
}

fn apply_overrides(args: &Args, config: &mut SimulationConfig) {
    if let Some(tick_rate) = args.tick_rate {
        println!("Overriding tick rate to: {tick_rate} Hz");
        config.physics.tick_rate = tick_rate;
    }

    if let Some(damping) = args.damping {
        println!("Overriding velocity damping to: {damping}");
        config.physics.velocity_damping = damping;
    }

    if let Some(max_force) = args.max_force {
        println!("Overriding max force to: {max_force} N");
        config.physics.max_force = max_force;
    }

    if let Some(restitution) = args.restitution {
        println!("Overriding wall restitution to: {restitution}");
        config.physics.wall_restitution = restitution;
    }

    if let Some(model) = args.model {
        println!("Using pairwise model: {model:?}");
        config.physics.pairwise_model = model;
    }

    if args.collisions {
        println!("Enabling particle collisions");
        config.physics.particle_collisions = true;
    }

    if let Some(random) = args.random {
        println!("Adding {random} random charges");
        config.scenario.random_particles = random;
    }

    if let Some(seed) = args.seed {
        println!("Using random seed: {seed}");
        config.physics.initial_seed = Some(seed);
    }

    if let Some(width) = args.width {
        config.bounds.width = width;
    }

    if let Some(height) = args.height {
        config.bounds.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chargedrift").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_overrides_applied() {
        let args = parse(&[
            "--damping",
            "1.0",
            "--max-force",
            "0.5",
            "--model",
            "serial",
            "--collisions",
            "-n",
            "4",
            "--seed",
            "7",
            "--width",
            "640",
        ]);
        let mut config = SimulationConfig::default();

        apply_overrides(&args, &mut config);

        assert_eq!(config.physics.velocity_damping, 1.0);
        assert_eq!(config.physics.max_force, 0.5);
        assert_eq!(config.physics.pairwise_model, PairwiseModel::Serial);
        assert!(config.physics.particle_collisions);
        assert_eq!(config.scenario.random_particles, 4);
        assert_eq!(config.physics.initial_seed, Some(7));
        assert_eq!(config.bounds.width, 640.0);
        assert_eq!(config.bounds.height, 900.0);
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let args = parse(&[]);
        let mut config = SimulationConfig::default();

        apply_overrides(&args, &mut config);

        assert_eq!(config, SimulationConfig::default());
        assert!(!args.paused);
        assert_eq!(args.ticks, None);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = parse(&["--config", "/nonexistent/chargedrift/config.toml"]);

        let result = load_and_apply_config(&args);

        assert!(matches!(result, Err(CliError::ConfigNotFound(_))));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let dir = std::env::temp_dir().join("chargedrift_cli_invalid_override");
        let path = dir.join("config.toml");
        SimulationConfig::default().save(&path).unwrap();
        let path_arg = path.to_string_lossy().into_owned();
        let args = parse(&["--config", &path_arg, "--damping", "1.5"]);

        let result = load_and_apply_config(&args);

        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
        let _ = std::fs::remove_dir_all(dir);
    }
}
