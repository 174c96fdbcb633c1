//! Test utilities for plugin testing

use bevy::app::FixedMain;
use bevy::time::TimeUpdateStrategy;
use core::time::Duration;

use crate::prelude::*;

/// Creates a minimal test app with core Bevy plugins needed for testing
///
/// Real time never advances, so `app.update()` runs the Startup and Update
/// schedules without ever triggering a fixed tick. Use [`run_fixed_ticks`]
/// to advance the simulation deterministically.
pub fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins,
        bevy::state::app::StatesPlugin,
        bevy::diagnostic::DiagnosticsPlugin,
    ));

    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::ZERO));

    app
}

/// Runs the whole fixed-timestep pipeline `ticks` times.
pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.world_mut().run_schedule(FixedMain);
    }
}

pub fn send_command(app: &mut App, command: SimulationCommand) {
    app.world_mut().send_event(command);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let mut app = create_test_app();
        app.update();
        assert!(app.world().contains_resource::<Time>());
        assert!(!app.world().contains_resource::<State<AppState>>());
    }

    #[test]
    fn test_fixed_ticks_without_plugins() {
        let mut app = create_test_app();
        app.init_resource::<PhysicsTime>();
        app.add_systems(FixedUpdate, |mut time: ResMut<PhysicsTime>| time.advance());
        app.update();

        run_fixed_ticks(&mut app, 4);

        assert_eq!(app.world().resource::<PhysicsTime>().tick, 4);
    }
}
