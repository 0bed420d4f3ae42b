pub mod ai;
pub mod app_state;
pub mod components;
pub mod events;
pub mod maze;
pub mod plugins;
pub mod resources;
pub mod tracing_bridge;

use bevy::prelude::*;
use micromegas_tracing::prelude::{span_fn, span_scope, warn};

use app_state::AppState;
use plugins::clock::ClockPlugin;
use plugins::game_over::GameOverPlugin;
use plugins::maze::MazePlugin;
use plugins::player::PlayerPlugin;
use plugins::pursuers::PursuerPlugin;
use plugins::telemetry::TelemetryPlugin;
use resources::{CaptureLatch, MazeRng, SessionConfig, SimulationTick, SurvivalClock};

/// The hunt: maze, player, pursuers and their bookkeeping.
///
/// Expects `StatesPlugin` and a `Time` source (e.g. `MinimalPlugins`).
/// A [`SessionConfig`] inserted before this plugin is kept if it validates;
/// otherwise the defaults are used.
pub struct OoHoosPlugin;

impl Plugin for OoHoosPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>();
        app.init_resource::<SessionConfig>();
        let mut config = app.world_mut().resource_mut::<SessionConfig>();
        if let Err(err) = config.sanitize() {
            warn!("invalid session config, using defaults: {err}");
        }

        app.add_plugins(TelemetryPlugin);
        app.add_plugins(MazePlugin);
        app.add_plugins(PlayerPlugin);
        app.add_plugins(PursuerPlugin);
        app.add_plugins(ClockPlugin);
        app.add_plugins(GameOverPlugin);

        // Per-hunt resources: inserted fresh on each OnEnter(Hunting),
        // kept through GameOver for the summary, removed on leaving it.
        app.add_systems(OnEnter(AppState::Hunting), init_game_session);
        app.add_systems(OnExit(AppState::GameOver), cleanup_game_session);
    }
}

/// Insert per-hunt resources with fresh defaults.
#[span_fn]
pub fn init_game_session(mut commands: Commands, mut config: ResMut<SessionConfig>) {
    if let Err(err) = config.sanitize() {
        warn!("invalid session config, using defaults: {err}");
    }
    commands.insert_resource(SimulationTick::default());
    commands.insert_resource(SurvivalClock::default());
    commands.insert_resource(CaptureLatch::default());
    commands.insert_resource(MazeRng(config.rng()));
}

/// Remove per-hunt resources when leaving GameOver.
#[span_fn]
fn cleanup_game_session(mut commands: Commands) {
    commands.remove_resource::<SimulationTick>();
    commands.remove_resource::<SurvivalClock>();
    commands.remove_resource::<CaptureLatch>();
    commands.remove_resource::<MazeRng>();
}
