//! Maze generation at the start of a hunt, and teardown after it.
//!
//! The generated [`MazeWorld`] is inserted as a resource and stays read-only
//! until the session is cleaned up on leaving `GameOver`.

use bevy::prelude::*;
use micromegas_tracing::prelude::{imetric, info, span_fn, span_scope, warn};

use crate::app_state::AppState;
use crate::components::SessionEntity;
use crate::events::MazeReady;
use crate::maze::MazeWorld;
use crate::resources::{MazeRng, SessionConfig};

pub struct MazePlugin;

impl Plugin for MazePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(AppState::Hunting),
            generate_maze.after(crate::init_game_session),
        );
        app.add_systems(OnExit(AppState::GameOver), cleanup_on_exit_game);
    }
}

/// Place walls and build the navigation graph for a new hunt.
#[span_fn]
pub fn generate_maze(
    mut commands: Commands,
    config: Res<SessionConfig>,
    mut rng: ResMut<MazeRng>,
) {
    let settings = &config.maze;
    let maze = MazeWorld::generate(
        settings.width,
        settings.depth,
        &settings.wall_generator(),
        &mut rng.0,
    );

    let report = maze.report();
    let walls = maze.grid().wall_count();
    let open_cells = maze.open_cells().len();
    info!(
        "maze {}x{}: {} shapes, {} wall cells, {} open, {} shape cells clipped",
        settings.width,
        settings.depth,
        report.shapes,
        walls,
        open_cells,
        report.cells_skipped
    );
    imetric!("maze_wall_cells", "count", walls as u64);
    imetric!("maze_nav_edges", "count", maze.graph().edge_count() as u64);
    if open_cells == 0 {
        warn!("maze has no open cells; nothing can spawn");
    }

    commands.insert_resource(maze);
    commands.trigger(MazeReady { walls, open_cells });
}

/// Despawn every session entity and drop the maze when leaving `GameOver`.
fn cleanup_on_exit_game(mut commands: Commands, query: Query<Entity, With<SessionEntity>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<MazeWorld>();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[derive(Resource, Default)]
    struct Ready(Option<MazeReady>);

    fn record_ready(trigger: On<MazeReady>, mut ready: ResMut<Ready>) {
        ready.0 = Some(*trigger.event());
    }

    #[test]
    fn entering_hunt_generates_maze() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(StatesPlugin);
        app.init_state::<AppState>();
        let mut config = SessionConfig {
            seed: Some(3),
            ..Default::default()
        };
        config.maze.width = 30;
        config.maze.depth = 20;
        app.insert_resource(config.clone());
        app.insert_resource(MazeRng(config.rng()));
        app.init_resource::<Ready>();
        app.add_observer(record_ready);
        app.add_systems(OnEnter(AppState::Hunting), generate_maze);

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Hunting);
        for _ in 0..3 {
            app.update();
        }

        let maze = app.world().resource::<MazeWorld>();
        assert_eq!(maze.grid().width(), 30);
        assert_eq!(maze.grid().depth(), 20);
        assert!(maze.grid().wall_count() > 0);
        let ready = app.world().resource::<Ready>().0.expect("MazeReady not triggered");
        assert_eq!(ready.walls, maze.grid().wall_count());
        assert_eq!(ready.open_cells, maze.open_cells().len());
    }
}
