//! Player spawning, collision-checked motion and sprint stamina.
//!
//! Motion is driven by [`PlayerIntent`]. Forward and strafe are applied as
//! two separate tentative moves; each one is undone if the player's rounded
//! position would leave the grid or land in a wall, so the player slides
//! along walls instead of sticking to them.

use bevy::prelude::*;
use micromegas_tracing::prelude::{imetric, info, span_fn, span_scope, warn};

use crate::app_state::AppState;
use crate::components::*;
use crate::maze::MazeWorld;
use crate::plugins::maze::generate_maze;
use crate::plugins::telemetry::GameSet;
use crate::resources::{MazeRng, PlayerSettings, SessionConfig};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(AppState::Hunting),
            spawn_player.after(generate_maze),
        );
        app.add_systems(
            Update,
            (apply_player_intent, regenerate_stamina).in_set(GameSet::Player),
        );
        app.add_systems(OnExit(AppState::GameOver), remove_stamina_timer);
    }
}

/// Fires once per second to top up stamina.
#[derive(Resource)]
pub struct StaminaRegenTimer(pub Timer);

/// Spawn the player on a random open cell.
#[span_fn]
pub fn spawn_player(
    mut commands: Commands,
    maze: Res<MazeWorld>,
    config: Res<SessionConfig>,
    mut rng: ResMut<MazeRng>,
) {
    let Some(cell) = maze.random_open_cell(&mut rng.0) else {
        warn!("no open cell to spawn the player");
        return;
    };

    let settings = &config.player;
    commands.spawn((
        Player,
        SessionEntity,
        PlayerIntent::default(),
        Stamina::full(settings.max_stamina),
        Transform::from_translation(cell.to_position(settings.eye_height)),
    ));
    commands.insert_resource(StaminaRegenTimer(Timer::from_seconds(
        1.0,
        TimerMode::Repeating,
    )));

    let reachable = maze.reachable_from(cell);
    info!("player spawned at {cell}, {reachable} cells reachable");
    imetric!("player_reachable_cells", "count", reachable as u64);
}

/// Move `transform` by `delta`, undoing the move if it ends off the grid or
/// inside a wall. Returns whether the move stuck.
pub fn try_move(transform: &mut Transform, delta: Vec3, maze: &MazeWorld) -> bool {
    let before = transform.translation;
    transform.translation += delta;
    if maze.blocks(transform.translation) {
        transform.translation = before;
        return false;
    }
    true
}

/// Speed for this tick. Sprinting draws stamina and falls back to walking
/// once stamina runs out.
pub fn movement_speed(
    intent: &PlayerIntent,
    stamina: &mut Stamina,
    settings: &PlayerSettings,
) -> f32 {
    let moving = intent.forward != 0.0 || intent.strafe != 0.0;
    if intent.sprint && moving && stamina.current > 0.0 {
        stamina.current = (stamina.current - settings.sprint_cost).max(0.0);
        settings.sprint_speed
    } else {
        settings.walk_speed
    }
}

#[span_fn]
fn apply_player_intent(
    maze: Res<MazeWorld>,
    config: Res<SessionConfig>,
    mut query: Query<(&PlayerIntent, &mut Stamina, &mut Transform), With<Player>>,
) {
    for (intent, mut stamina, mut transform) in &mut query {
        transform.rotation = Quat::from_rotation_y(intent.yaw);
        let speed = movement_speed(intent, &mut stamina, &config.player);

        if intent.forward != 0.0 {
            let delta = *transform.forward() * intent.forward.clamp(-1.0, 1.0) * speed;
            try_move(&mut transform, delta, &maze);
        }
        if intent.strafe != 0.0 {
            let delta = *transform.right() * intent.strafe.clamp(-1.0, 1.0) * speed;
            try_move(&mut transform, delta, &maze);
        }
    }
}

fn regenerate_stamina(
    time: Res<Time>,
    config: Res<SessionConfig>,
    timer: Option<ResMut<StaminaRegenTimer>>,
    mut query: Query<&mut Stamina, With<Player>>,
) {
    let Some(mut timer) = timer else {
        return;
    };
    timer.0.tick(time.delta());
    let seconds = timer.0.times_finished_this_tick();
    if seconds == 0 {
        return;
    }
    let gain = config.player.stamina_regen * seconds as f32;
    for mut stamina in &mut query {
        stamina.current = (stamina.current + gain).min(stamina.max);
    }
}

fn remove_stamina_timer(mut commands: Commands) {
    commands.remove_resource::<StaminaRegenTimer>();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
