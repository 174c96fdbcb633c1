//! Simulation diagnostics module.
//!
//! Records per-tick measurements of the charge simulation into Bevy's
//! diagnostic store:
//!
//! - **Energy**: kinetic, electrostatic potential and their sum
//! - **Particle count**
//! - **Degenerate pairs**: interactions skipped because two particles coincided
//!
//! A periodic summary of the same numbers is logged every `log_interval` of
//! simulated time.
//!
//! ```rust,ignore
//! app.add_plugins(SimulationDiagnosticsPlugin::default());
//! ```

use crate::prelude::*;
use bevy::diagnostic::{
    DEFAULT_MAX_HISTORY_LENGTH, Diagnostic, DiagnosticPath, Diagnostics, RegisterDiagnostic,
};
use core::time::Duration;

#[derive(Resource)]
pub struct SimulationDiagnosticsState {
    log_timer: Timer,
}

pub struct SimulationDiagnosticsPlugin {
    max_history_length: usize,
    smoothing_factor: f64,
    log_interval: Duration,
}

impl Default for SimulationDiagnosticsPlugin {
    fn default() -> Self {
        Self {
            max_history_length: DEFAULT_MAX_HISTORY_LENGTH,
            smoothing_factor: 0.0,
            log_interval: Duration::from_secs(1),
        }
    }
}

impl SimulationDiagnosticsPlugin {
    pub const KINETIC_ENERGY: DiagnosticPath = DiagnosticPath::const_new("energy/kinetic");
    pub const POTENTIAL_ENERGY: DiagnosticPath = DiagnosticPath::const_new("energy/potential");
    pub const TOTAL_ENERGY: DiagnosticPath = DiagnosticPath::const_new("energy/total");
    pub const PARTICLE_COUNT: DiagnosticPath = DiagnosticPath::const_new("particles/count");
    pub const DEGENERATE_PAIRS: DiagnosticPath =
        DiagnosticPath::const_new("step/degenerate_pairs");

    const DIAGNOSTIC_PATHS: &'static [DiagnosticPath] = &[
        Self::KINETIC_ENERGY,
        Self::POTENTIAL_ENERGY,
        Self::TOTAL_ENERGY,
        Self::PARTICLE_COUNT,
        Self::DEGENERATE_PAIRS,
    ];

    pub fn with_log_interval(mut self, log_interval: Duration) -> Self {
        self.log_interval = log_interval;
        self
    }

    fn register_diagnostics(&self, app: &mut App) {
        for path in Self::DIAGNOSTIC_PATHS {
            app.register_diagnostic(
                Diagnostic::new(path.clone())
                    .with_max_history_length(self.max_history_length)
                    .with_smoothing_factor(self.smoothing_factor),
            );
        }
    }

    fn record_measurements(
        mut diagnostics: Diagnostics,
        simulation: Res<ChargeSimulation>,
        last_report: Res<LastStepReport>,
    ) {
        let energy = simulation.energy();
        diagnostics.add_measurement(&Self::KINETIC_ENERGY, || energy.kinetic);
        diagnostics.add_measurement(&Self::POTENTIAL_ENERGY, || energy.potential);
        diagnostics.add_measurement(&Self::TOTAL_ENERGY, || energy.total);
        diagnostics.add_measurement(&Self::PARTICLE_COUNT, || simulation.len() as f64);
        diagnostics.add_measurement(&Self::DEGENERATE_PAIRS, || {
            last_report.degenerate_pairs as f64
        });
    }

    fn log_summary(
        mut state: ResMut<SimulationDiagnosticsState>,
        physics_time: Res<PhysicsTime>,
        simulation: Res<ChargeSimulation>,
    ) {
        state
            .log_timer
            .tick(Duration::from_secs_f64(physics_time.dt));
        if !state.log_timer.just_finished() {
            return;
        }

        let energy = simulation.energy();
        let (positive, negative) = simulation.charge_counts();
        info!(
            "t = {:.2} s, {} particles (+{} / -{}), \
             energy: kinetic {:.4e} J, potential {:.4e} J, total {:.4e} J",
            physics_time.elapsed,
            simulation.len(),
            positive,
            negative,
            energy.kinetic,
            energy.potential,
            energy.total
        );
    }
}

impl Plugin for SimulationDiagnosticsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationDiagnosticsState {
            log_timer: Timer::new(self.log_interval, TimerMode::Repeating),
        });

        self.register_diagnostics(app);

        app.add_systems(
            FixedPostUpdate,
            (Self::record_measurements, Self::log_summary)
                .run_if(in_state(AppState::Running).and(resource_exists::<ChargeSimulation>)),
        );
    }
}
