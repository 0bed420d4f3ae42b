//! Pursuer spawning and the per-tick chase: move, refresh routes, capture.

use bevy::prelude::*;
use micromegas_tracing::prelude::{debug, imetric, info, span_fn, span_scope, warn};

use crate::ai::{self, steering};
use crate::app_state::AppState;
use crate::components::*;
use crate::events::PursuerCaptured;
use crate::maze::{Cell, MazeWorld, PathFinder};
use crate::plugins::player::spawn_player;
use crate::plugins::telemetry::GameSet;
use crate::resources::{
    CaptureLatch, CaptureReport, MazeRng, SessionConfig, SimulationTick, SurvivalClock,
};

/// Spawn attempts per pursuer before giving up on keeping distance.
const SPAWN_ATTEMPTS: usize = 64;

pub struct PursuerPlugin;

impl Plugin for PursuerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(AppState::Hunting),
            spawn_pursuers.after(spawn_player),
        );
        app.add_systems(
            Update,
            (move_pursuers, refresh_routes.after(move_pursuers)).in_set(GameSet::Pursuers),
        );
        app.add_systems(Update, detect_capture.in_set(GameSet::Capture));
    }
}

/// Spawn one pursuer per roster name on open cells away from the player.
#[span_fn]
pub fn spawn_pursuers(
    mut commands: Commands,
    maze: Res<MazeWorld>,
    config: Res<SessionConfig>,
    mut rng: ResMut<MazeRng>,
    player: Query<&Transform, With<Player>>,
) {
    let Ok(player) = player.single() else {
        warn!("no player; pursuers not spawned");
        return;
    };
    let settings = &config.pursuers;

    for (i, name) in settings.roster.iter().enumerate() {
        let Some(cell) = maze.random_open_cell_away_from(
            &mut rng.0,
            player.translation,
            settings.min_spawn_distance,
            SPAWN_ATTEMPTS,
        ) else {
            warn!("no open cell for pursuer {name}");
            return;
        };
        commands.spawn((
            Pursuer {
                id: PursuerId(i as u32),
                name: name.clone(),
            },
            Pursuit::default(),
            SessionEntity,
            Transform::from_translation(cell.to_position(config.player.eye_height)),
        ));
        debug!("pursuer {name} spawned at {cell}");
    }
    info!("{} pursuers released", settings.roster.len());
}

/// Step every pursuer along its route and turn it toward the player.
#[allow(clippy::type_complexity)]
fn move_pursuers(
    config: Res<SessionConfig>,
    latch: Res<CaptureLatch>,
    player: Query<&Transform, (With<Player>, Without<Pursuer>)>,
    mut pursuers: Query<(&mut Transform, &mut Pursuit), With<Pursuer>>,
) {
    span_scope!("move_pursuers");
    if latch.is_set() {
        return;
    }
    let Ok(player) = player.single() else {
        return;
    };
    let settings = &config.pursuers;
    for (mut transform, mut pursuit) in &mut pursuers {
        steering::advance(
            &mut transform,
            &mut pursuit.path,
            settings.speed_divisor,
            settings.sub_steps,
        );
        steering::face(&mut transform, player.translation);
    }
}

/// Every `refresh_interval` ticks, re-run target selection and recompute
/// routes where it asks for one. One finder serves all pursuers.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
fn refresh_routes(
    tick: Res<SimulationTick>,
    config: Res<SessionConfig>,
    maze: Res<MazeWorld>,
    latch: Res<CaptureLatch>,
    mut rng: ResMut<MazeRng>,
    mut finder: Local<PathFinder>,
    player: Query<&Transform, (With<Player>, Without<Pursuer>)>,
    mut pursuers: Query<(&Pursuer, &Transform, &mut Pursuit)>,
) {
    let settings = &config.pursuers;
    if latch.is_set() || tick.0 % settings.refresh_interval != 0 {
        return;
    }
    span_scope!("refresh_routes");
    let Ok(player) = player.single() else {
        return;
    };

    for (pursuer, transform, mut pursuit) in &mut pursuers {
        let decision = ai::select_target(
            &pursuit,
            transform.translation,
            player.translation,
            settings.pursuit_radius,
            &maze,
            &mut rng.0,
        );
        let from = Cell::from_position(transform.translation);
        if let Some(len) = ai::apply_decision(&mut pursuit, decision, from, &maze, &mut finder) {
            debug!(
                "{} {:?} from {from}: {len} cells, {} expanded",
                pursuer.name,
                pursuit.mode,
                finder.last_expanded()
            );
            imetric!("route_length", "cells", len as u64);
        }
    }
}

/// Latch game over when any pursuer is within the capture radius. The
/// closest one is credited; ties go to the lowest id.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
fn detect_capture(
    mut commands: Commands,
    config: Res<SessionConfig>,
    tick: Res<SimulationTick>,
    clock: Res<SurvivalClock>,
    mut latch: ResMut<CaptureLatch>,
    mut next_state: ResMut<NextState<AppState>>,
    player: Query<&Transform, (With<Player>, Without<Pursuer>)>,
    pursuers: Query<(&Pursuer, &Transform)>,
) {
    if latch.is_set() {
        return;
    }
    let Ok(player) = player.single() else {
        return;
    };
    let radius = config.pursuers.capture_radius;

    let capturer = pursuers
        .iter()
        .map(|(p, t)| (p, t.translation.distance(player.translation)))
        .filter(|(_, d)| *d < radius)
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.id.cmp(&b.0.id)));
    let Some((pursuer, distance)) = capturer else {
        return;
    };

    latch.set(CaptureReport {
        pursuer: pursuer.id,
        name: pursuer.name.clone(),
        tick: tick.0,
        survived: clock.elapsed,
    });
    info!(
        "{} caught the player at distance {distance:.2} on tick {}",
        pursuer.name, tick.0
    );
    commands.trigger(PursuerCaptured {
        pursuer: pursuer.id,
        name: pursuer.name.clone(),
        tick: tick.0,
    });
    next_state.set(AppState::GameOver);
}
