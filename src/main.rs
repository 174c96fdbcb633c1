use bevy::app::ScheduleRunnerPlugin;
use bevy::diagnostic::{DiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::log::{Level, LogPlugin};
use bevy::state::app::StatesPlugin;
use chargedrift::cli::{Args, load_and_apply_config};
use chargedrift::prelude::*;
use clap::Parser;
use core::time::Duration;

fn main() -> AppExit {
    let args = Args::parse();

    let config = match load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return AppExit::error();
        }
    };

    if args.print_config {
        return match config.to_toml() {
            Ok(toml_string) => {
                println!("{toml_string}");
                AppExit::Success
            }
            Err(e) => {
                eprintln!("Error: {e}");
                AppExit::error()
            }
        };
    }

    let tick_interval = Duration::from_secs_f64(1.0 / config.physics.tick_rate);
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let mut app = App::new();

    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick_interval)),
        LogPlugin {
            level: log_level,
            ..default()
        },
        StatesPlugin,
        DiagnosticsPlugin,
        ChargeSimulationPlugin::with_config(config).paused(args.paused),
        SimulationDiagnosticsPlugin::default(),
    ));

    if args.verbose {
        app.add_plugins(LogDiagnosticsPlugin::default());
    }

    if let Some(ticks) = args.ticks {
        app.insert_resource(TickLimit(ticks));
    }

    app.run()
}
