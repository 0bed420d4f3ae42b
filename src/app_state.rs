use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, States)]
pub enum AppState {
    /// Waiting for a hunt to start.
    #[default]
    Idle,
    Hunting,
    /// Terminal for the hunt. Leaving it tears the session down.
    GameOver,
}
