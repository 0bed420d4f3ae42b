use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::tasks::{ComputeTaskPool, TaskPoolBuilder};
use micromegas_telemetry_sink::TelemetryGuardBuilder;
use micromegas_telemetry_sink::tracing_interop::TracingCaptureLayer;
use micromegas_tracing::dispatch::{
    flush_thread_buffer, init_thread_stream, unregister_thread_stream,
};
use micromegas_tracing::levels::LevelFilter;
use micromegas_tracing::prelude::{info, warn};
use oohoos::app_state::AppState;
use oohoos::components::{Player, PlayerIntent, Stamina};
use oohoos::plugins::telemetry::GameSet;
use oohoos::resources::{SessionConfig, SimulationTick};
use oohoos::tracing_bridge::MicromegasBridgeLayer;
use rand::Rng;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

/// Hunt length cap for the headless demo, at 60 ticks per second.
const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 5;

fn main() {
    // 1. Telemetry. Spans need MICROMEGAS_ENABLE_CPU_TRACING=true; logs and
    //    metrics are always on.
    let _telemetry_guard = TelemetryGuardBuilder::default()
        .with_install_tracing_capture(false)
        .build()
        .expect("failed to initialize telemetry");

    // 2. Bridge Bevy's schedule spans into Micromegas. Must be installed
    //    before the app starts emitting spans.
    let log_layer = TracingCaptureLayer {
        max_level: LevelFilter::Info,
    };
    let subscriber = Registry::default()
        .with(MicromegasBridgeLayer::default())
        .with(log_layer);
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    // 3. Register worker threads with Micromegas before TaskPoolPlugin
    //    creates the pool itself.
    ComputeTaskPool::get_or_init(|| {
        TaskPoolBuilder::new()
            .on_thread_spawn(|| {
                init_thread_stream();
            })
            .on_thread_destroy(|| {
                flush_thread_buffer();
                unregister_thread_stream();
            })
            .build()
    });

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            warn!("{e}; using default session config");
            SessionConfig::default()
        }
    };
    let max_ticks = std::env::var("OOHOOS_MAX_TICKS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);
    info!(
        "OoHoos starting: {}x{} maze, {} pursuers, seed {:?}",
        config.maze.width,
        config.maze.depth,
        config.pursuers.roster.len(),
        config.seed
    );

    // 4. Headless hunt with a wandering stand-in for the player.
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        )
        .add_plugins(StatesPlugin)
        .insert_resource(config)
        .insert_resource(TickLimit(max_ticks))
        .add_plugins(oohoos::OoHoosPlugin)
        .add_systems(Startup, start_hunt)
        .add_systems(
            Update,
            wander_player
                .before(GameSet::Player)
                .run_if(in_state(AppState::Hunting)),
        )
        .add_systems(Update, end_at_tick_limit.run_if(in_state(AppState::Hunting)))
        .add_systems(OnEnter(AppState::GameOver), exit_app)
        .run();
}

/// Config from the file named by `OOHOOS_CONFIG`, with `OOHOOS_SEED`
/// overriding its seed.
fn load_config() -> Result<SessionConfig, oohoos::resources::ConfigError> {
    let mut config = match std::env::var_os("OOHOOS_CONFIG") {
        Some(path) => SessionConfig::load(&PathBuf::from(path))?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = std::env::var("OOHOOS_SEED").ok().and_then(|v| v.parse().ok()) {
        config.seed = Some(seed);
    }
    Ok(config)
}

#[derive(Resource)]
struct TickLimit(u64);

fn start_hunt(mut next_state: ResMut<NextState<AppState>>) {
    next_state.set(AppState::Hunting);
}

/// Walk forward, turning now and then, and sprint while stamina is high.
fn wander_player(mut query: Query<(&mut PlayerIntent, &Stamina), With<Player>>) {
    let mut rng = rand::thread_rng();
    for (mut intent, stamina) in &mut query {
        intent.forward = 1.0;
        intent.sprint = stamina.current > stamina.max * 0.5;
        if rng.gen_bool(0.02) {
            intent.yaw += rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
        }
    }
}

fn end_at_tick_limit(
    tick: Option<Res<SimulationTick>>,
    limit: Res<TickLimit>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if tick.is_some_and(|t| t.0 >= limit.0) {
        info!("tick limit {} reached", limit.0);
        next_state.set(AppState::GameOver);
    }
}

fn exit_app(mut exit: MessageWriter<AppExit>) {
    exit.write(AppExit::Success);
}
