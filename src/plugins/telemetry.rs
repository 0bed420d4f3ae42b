//! Frame-level telemetry and the per-tick system ordering of a hunt.

use bevy::prelude::*;
use micromegas_tracing::prelude::{fmetric, imetric, span_scope};

use crate::app_state::AppState;
use crate::components::{Pursuit, PursuitMode};
use crate::resources::{SimulationTick, hunt_active};

/// Per-tick phases of a hunt, run in this order. Every phase is gated on
/// `AppState::Hunting` and on the capture latch still being clear.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Player,
    Pursuers,
    Capture,
    Bookkeeping,
}

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                GameSet::Player,
                GameSet::Pursuers,
                GameSet::Capture,
                GameSet::Bookkeeping,
            )
                .chain()
                .run_if(in_state(AppState::Hunting).and(hunt_active)),
        );
        app.add_systems(Last, frame_telemetry);
        app.add_systems(
            Last,
            pursuit_telemetry.run_if(in_state(AppState::Hunting)),
        );
    }
}

fn frame_telemetry(time: Res<Time>) {
    span_scope!("frame");
    let dt_ms = time.delta_secs_f64() * 1000.0;
    fmetric!("frame_time_ms", "ms", dt_ms);
}

/// How many pursuers are chasing versus wandering, sampled once a second
/// at 60 ticks per second.
fn pursuit_telemetry(tick: Option<Res<SimulationTick>>, pursuers: Query<&Pursuit>) {
    let Some(tick) = tick else {
        return;
    };
    if tick.0 % 60 != 0 {
        return;
    }
    let pursuing = pursuers
        .iter()
        .filter(|p| p.mode == PursuitMode::Pursuing)
        .count();
    let wandering = pursuers
        .iter()
        .filter(|p| p.mode == PursuitMode::Wandering)
        .count();
    imetric!("pursuers_pursuing", "count", pursuing as u64);
    imetric!("pursuers_wandering", "count", wandering as u64);
}
