use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use citygen::ascii_map::build_overview_map;
use citygen::config::CityConfig;
use citygen::events::{CityRegenerated, RegenerateRequested};
use citygen::lifecycle::{FadeLifecycle, FadeState};
use citygen::regenerate::CityState;
use citygen::CityGenPlugin;

mod collaborators;
mod options;

use options::RunOptions;

fn main() {
    let options = match RunOptions::from_env() {
        Ok(options) => options,
        Err(message) => {
            eprintln!("skyline: {message}");
            eprintln!("usage: skyline [--config <path>] [--cycles <n>] [--ascii] [--frame-ms <ms>]");
            std::process::exit(2);
        }
    };

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(
            options.frame_ms,
        ))),
        LogPlugin::default(),
    ));

    // Logging is only up once LogPlugin is built.
    app.insert_resource(load_config(&options))
        .add_plugins((CityGenPlugin, collaborators::StandInCollaboratorsPlugin));

    if options.ascii {
        app.add_systems(Update, print_overview.after(citygen::CityGenSet::Publish));
    }

    if let Some(cycles) = options.cycles {
        app.insert_resource(CycleLimit(cycles))
            .add_systems(Update, run_cycles.before(citygen::CityGenSet::Lifecycle));
    }

    app.run();
}

fn load_config(options: &RunOptions) -> CityConfig {
    let Some(path) = &options.config_path else {
        return CityConfig::default();
    };
    match CityConfig::load(path) {
        Ok(config) => {
            info!("loaded city config from {}", path.display());
            config
        }
        Err(e) => {
            warn!(
                "failed to load city config from {}: {}; using defaults",
                path.display(),
                e
            );
            CityConfig::default()
        }
    }
}

/// Stop after this many cities have been shown.
#[derive(Resource)]
struct CycleLimit(u64);

/// Rebuild as soon as each city is fully shown; exit once enough were.
fn run_cycles(
    limit: Res<CycleLimit>,
    lifecycle: Res<FadeLifecycle>,
    state: Res<CityState>,
    mut requests: EventWriter<RegenerateRequested>,
    mut exit: EventWriter<AppExit>,
) {
    if lifecycle.state() != FadeState::Idle {
        return;
    }
    if state.generation >= limit.0 {
        info!("shown {} cities, exiting", state.generation);
        exit.send(AppExit::Success);
    } else {
        requests.send(RegenerateRequested);
    }
}

fn print_overview(mut regenerated: EventReader<CityRegenerated>, state: Res<CityState>) {
    for event in regenerated.read() {
        println!("== generation {} (seed {}) ==", event.generation, event.seed);
        println!("{}", build_overview_map(&state.grid));
    }
}
