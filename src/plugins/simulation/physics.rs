//! Fixed-tick systems that build and advance the particle set.

use crate::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhysicsSet {
    Step,
    Clock,
}

/// Replaces the simulation with a freshly built copy of the configured scenario.
pub fn rebuild_simulation(
    config: &SimulationConfig,
    rng: &mut SharedRng,
    simulation: &mut ChargeSimulation,
    physics_time: &mut PhysicsTime,
) {
    match config.build_simulation(&mut **rng) {
        Ok(built) => {
            let (positive, negative) = built.charge_counts();
            info!(
                "Built scenario with {} particles ({} positive, {} negative), {:?} pairwise model",
                built.len(),
                positive,
                negative,
                built.model()
            );
            **simulation = built;
        }
        Err(e) => {
            error!("Failed to build scenario: {}. Starting empty.", e);
            **simulation = Simulation::new(config.bounds().unwrap_or_default());
        }
    }
    physics_time.reset();
}

pub fn setup_simulation(
    config: Res<SimulationConfig>,
    mut rng: ResMut<SharedRng>,
    mut simulation: ResMut<ChargeSimulation>,
    mut physics_time: ResMut<PhysicsTime>,
) {
    rebuild_simulation(&config, &mut rng, &mut simulation, &mut physics_time);
}

pub fn step_simulation(
    config: Res<SimulationConfig>,
    physics_time: Res<PhysicsTime>,
    mut simulation: ResMut<ChargeSimulation>,
    mut last_report: ResMut<LastStepReport>,
) {
    if physics_time.is_paused() {
        return;
    }

    match simulation.step(physics_time.elapsed, physics_time.dt, &config.step_options()) {
        Ok(report) => {
            if !report.is_clean() {
                warn!(
                    "Tick {}: skipped {} degenerate interactions, rejected {} updates",
                    report.tick, report.degenerate_pairs, report.rejected_updates
                );
            }
            **last_report = report;
        }
        Err(e) => error!("Simulation step failed: {}", e),
    }
}

/// Keeps [`PhysicsTime`] in lockstep with the simulation's own tick count.
pub fn advance_clock(simulation: Res<ChargeSimulation>, mut physics_time: ResMut<PhysicsTime>) {
    if simulation.tick() > physics_time.tick {
        physics_time.advance();
    }
}
