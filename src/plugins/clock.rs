//! Simulation tick counter and survival time.

use bevy::prelude::*;

use crate::plugins::telemetry::GameSet;
use crate::resources::{SimulationTick, SurvivalClock};

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, advance_clock.in_set(GameSet::Bookkeeping));
    }
}

/// Closes out a tick. Runs last, so every system in a tick sees the same
/// counter and the first tick of a hunt is tick 0.
fn advance_clock(
    time: Res<Time>,
    mut tick: ResMut<SimulationTick>,
    mut clock: ResMut<SurvivalClock>,
) {
    tick.0 += 1;
    clock.elapsed += time.delta();
}
