use std::collections::VecDeque;

use bevy::prelude::*;

use crate::maze::Cell;

// ---------------------------------------------------------------------------
// Entity markers
// ---------------------------------------------------------------------------

#[derive(Component, Debug)]
pub struct Player;

/// Tag for everything spawned for one hunt. Despawned when the hunt ends.
#[derive(Component, Debug)]
pub struct SessionEntity;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Movement request for the current tick, written by whatever drives the
/// player (keyboard layer, scripted walker, test).
///
/// `forward` and `strafe` are in `[-1, 1]`. `yaw` is the heading in radians
/// about +Y; zero looks down -Z.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    pub forward: f32,
    pub strafe: f32,
    pub sprint: bool,
    pub yaw: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
}

impl Stamina {
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }
}

// ---------------------------------------------------------------------------
// Pursuers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PursuerId(pub u32);

/// Identity of a hunter. The name selects its end-of-game message.
#[derive(Component, Debug, Clone)]
pub struct Pursuer {
    pub id: PursuerId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PursuitMode {
    /// No target chosen yet.
    #[default]
    Idle,
    /// Heading for a random open cell.
    Wandering,
    /// Heading for the player's cell.
    Pursuing,
}

/// Navigation state of a pursuer.
///
/// `path` holds the cells still to visit, excluding the cell the pursuer
/// stood on when the path was computed. It is empty once the target is
/// reached or when no route exists.
#[derive(Component, Debug, Clone, Default)]
pub struct Pursuit {
    pub mode: PursuitMode,
    pub target: Option<Cell>,
    pub path: VecDeque<Cell>,
}
