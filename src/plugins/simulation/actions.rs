//! Action handlers for simulation commands

use super::physics::rebuild_simulation;
use crate::physics::particle::Bounds;
use crate::prelude::*;

pub fn handle_restart_simulation_event(
    mut commands_reader: EventReader<SimulationCommand>,
    config: Res<SimulationConfig>,
    mut rng: ResMut<SharedRng>,
    mut simulation: ResMut<ChargeSimulation>,
    mut physics_time: ResMut<PhysicsTime>,
    mut last_report: ResMut<LastStepReport>,
) {
    for command in commands_reader.read() {
        if !matches!(command, SimulationCommand::Restart) {
            continue;
        }

        info!("Restarting simulation");
        *rng = SharedRng::from_optional_seed(config.physics.initial_seed);
        rebuild_simulation(&config, &mut rng, &mut simulation, &mut physics_time);
        *last_report = LastStepReport::default();
    }
}

pub fn handle_toggle_pause_simulation_event(
    mut commands_reader: EventReader<SimulationCommand>,
    current_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut physics_time: ResMut<PhysicsTime>,
) {
    for command in commands_reader.read() {
        if !matches!(command, SimulationCommand::TogglePause) {
            continue;
        }

        let next = current_state.get().toggled();
        match next {
            AppState::Paused => physics_time.pause(),
            AppState::Running => physics_time.unpause(),
        }
        info!("Simulation {:?}", next);
        next_state.set(next);
    }
}

pub fn handle_spawn_charge_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut simulation: ResMut<ChargeSimulation>,
) {
    for command in commands_reader.read() {
        let SimulationCommand::SpawnCharge { sign, position } = *command else {
            continue;
        };

        match simulation.spawn(sign, position) {
            Ok(handle) => info!(
                "Spawned {} charge {} at {}",
                sign,
                handle.index(),
                position
            ),
            Err(e) => warn!("Rejected spawn of {} charge at {}: {}", sign, position, e),
        }
    }
}

pub fn handle_resize_bounds_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut simulation: ResMut<ChargeSimulation>,
) {
    for command in commands_reader.read() {
        let SimulationCommand::ResizeBounds { width, height } = *command else {
            continue;
        };

        match Bounds::from_size(width, height) {
            Ok(bounds) => {
                debug!("Resizing bounds to {} × {}", width, height);
                simulation.set_all_bounds(bounds);
            }
            Err(e) => warn!("Ignoring resize: {}", e),
        }
    }
}

pub fn handle_quit_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut exit: EventWriter<AppExit>,
) {
    if commands_reader
        .read()
        .any(|command| matches!(command, SimulationCommand::Quit))
    {
        exit.write(AppExit::Success);
    }
}

/// Logs a final energy summary and exits once the tick limit is reached.
pub fn exit_after_tick_limit(
    limit: Res<TickLimit>,
    physics_time: Res<PhysicsTime>,
    simulation: Res<ChargeSimulation>,
    mut exit: EventWriter<AppExit>,
) {
    if physics_time.tick < **limit {
        return;
    }

    let energy = simulation.energy();
    info!(
        "Finished {} ticks ({:.3} s simulated): \
         kinetic {:.6e} J, potential {:.6e} J, total {:.6e} J",
        physics_time.tick,
        physics_time.elapsed,
        energy.kinetic,
        energy.potential,
        energy.total
    );
    exit.write(AppExit::Success);
}
