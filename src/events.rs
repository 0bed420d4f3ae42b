//! Gameplay events triggered by the hunt systems.

use bevy::prelude::*;

use crate::components::PursuerId;

/// A pursuer reached the player. Triggered once per hunt.
#[derive(Event, Debug, Clone)]
pub struct PursuerCaptured {
    pub pursuer: PursuerId,
    pub name: String,
    pub tick: u64,
}

/// Walls are placed and the navigation graph is built.
#[derive(Event, Debug, Clone, Copy)]
pub struct MazeReady {
    pub walls: usize,
    pub open_cells: usize,
}
