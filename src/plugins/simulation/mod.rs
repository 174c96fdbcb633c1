//! Simulation plugin - Self-contained plugin pattern
//!
//! Owns the [`ChargeSimulation`] resource, builds the configured scenario on
//! startup, advances it once per fixed tick and applies [`SimulationCommand`]s
//! between ticks.

use crate::prelude::*;
use bevy::ecs::schedule::{LogLevel, ScheduleBuildSettings};
use bevy::state::app::StatesPlugin;

mod actions;
mod physics;

use actions::{
    exit_after_tick_limit, handle_quit_event, handle_resize_bounds_event,
    handle_restart_simulation_event, handle_spawn_charge_event,
    handle_toggle_pause_simulation_event,
};
use physics::{PhysicsSet, advance_clock, setup_simulation, step_simulation};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Commands,
}

#[derive(Default)]
pub struct ChargeSimulationPlugin {
    config: Option<SimulationConfig>,
    start_paused: bool,
}

impl ChargeSimulationPlugin {
    /// Uses the user's configuration file, or defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
            ..Self::default()
        }
    }

    pub fn paused(mut self, start_paused: bool) -> Self {
        self.start_paused = start_paused;
        self
    }
}

impl Plugin for ChargeSimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        match config.to_toml() {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }

        let mut physics_time = PhysicsTime::new(config.dt());
        if self.start_paused {
            physics_time.pause();
            app.insert_state(AppState::Paused);
        } else {
            app.init_state::<AppState>();
        }

        app.insert_resource(Time::<Fixed>::from_hz(config.physics.tick_rate));
        app.insert_resource(SharedRng::from_optional_seed(config.physics.initial_seed));
        app.insert_resource(physics_time);
        app.init_resource::<ChargeSimulation>();
        app.init_resource::<LastStepReport>();
        app.insert_resource(config);

        app.add_event::<SimulationCommand>();

        app.edit_schedule(FixedUpdate, |schedule| {
            schedule.set_build_settings(ScheduleBuildSettings {
                ambiguity_detection: LogLevel::Warn,
                ..default()
            });
        });

        app.configure_sets(FixedUpdate, (PhysicsSet::Step, PhysicsSet::Clock).chain());

        app.add_systems(Startup, setup_simulation);
        app.add_systems(
            FixedUpdate,
            (
                step_simulation.in_set(PhysicsSet::Step),
                advance_clock.in_set(PhysicsSet::Clock),
            )
                .run_if(in_state(AppState::Running)),
        );
        app.add_systems(
            FixedPostUpdate,
            exit_after_tick_limit.run_if(resource_exists::<TickLimit>),
        );
        app.add_systems(
            Update,
            (
                handle_restart_simulation_event,
                handle_toggle_pause_simulation_event,
                handle_spawn_charge_event,
                handle_resize_bounds_event,
                handle_quit_event,
            )
                .chain()
                .in_set(SimulationSet::Commands),
        );
    }
}
