//! Pursuer decision making: when to chase the player, when to wander, and
//! when to leave the current route alone.

pub mod steering;

use bevy::math::Vec3;
use micromegas_tracing::prelude::*;
use rand::Rng;

use crate::components::{Pursuit, PursuitMode};
use crate::maze::{Cell, MazeWorld, PathFinder};

/// Outcome of target selection for one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetDecision {
    /// Player is close: route to its cell. Always recomputed.
    Pursue(Cell),
    /// Previous route is used up: route to a fresh random cell.
    Wander(Cell),
    /// Keep the current target and route.
    Keep,
}

impl TargetDecision {
    /// Mode and cell to route to, or `None` when the route is kept.
    pub fn route(&self) -> Option<(PursuitMode, Cell)> {
        match *self {
            TargetDecision::Pursue(cell) => Some((PursuitMode::Pursuing, cell)),
            TargetDecision::Wander(cell) => Some((PursuitMode::Wandering, cell)),
            TargetDecision::Keep => None,
        }
    }
}

/// Decide what a pursuer at `pursuer` should head for.
///
/// Within `pursuit_radius` of the player the player's cell wins. Otherwise a
/// random open cell is drawn only once the previous path is exhausted.
pub fn select_target<R: Rng + ?Sized>(
    pursuit: &Pursuit,
    pursuer: Vec3,
    player: Vec3,
    pursuit_radius: f32,
    maze: &MazeWorld,
    rng: &mut R,
) -> TargetDecision {
    if pursuer.distance(player) < pursuit_radius {
        return TargetDecision::Pursue(Cell::from_position(player));
    }
    if pursuit.path.is_empty() {
        if let Some(cell) = maze.random_open_cell(rng) {
            return TargetDecision::Wander(cell);
        }
    }
    TargetDecision::Keep
}

/// Apply a decision: set mode and target, and replace the route when the
/// decision calls for one. Returns the new route length, if recomputed.
pub fn apply_decision(
    pursuit: &mut Pursuit,
    decision: TargetDecision,
    from: Cell,
    maze: &MazeWorld,
    finder: &mut PathFinder,
) -> Option<usize> {
    let (mode, target) = decision.route()?;

    let path = finder.find_path(maze.graph(), from, target);
    if path.is_empty() {
        debug!("no route from {from} to {target}");
    }
    pursuit.mode = mode;
    pursuit.target = Some(target);
    pursuit.path = path.into_iter().skip(1).collect();
    Some(pursuit.path.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::OccupancyGrid;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn open_maze() -> MazeWorld {
        MazeWorld::from_grid(OccupancyGrid::new(50, 50))
    }

    fn at(x: f32, z: f32) -> Vec3 {
        Vec3::new(x, 1.5, z)
    }

    #[test]
    fn close_player_is_pursued() {
        let maze = open_maze();
        let mut rng = StdRng::seed_from_u64(0);
        let pursuit = Pursuit::default();
        let decision = select_target(&pursuit, at(0.0, 0.0), at(10.2, 3.7), 30.0, &maze, &mut rng);
        assert_eq!(decision, TargetDecision::Pursue(Cell::new(10, 4)));
    }

    #[test]
    fn pursuit_ignores_remaining_path() {
        let maze = open_maze();
        let mut rng = StdRng::seed_from_u64(0);
        let pursuit = Pursuit {
            mode: PursuitMode::Wandering,
            target: Some(Cell::new(40, 40)),
            path: [Cell::new(1, 0)].into_iter().collect(),
        };
        let decision = select_target(&pursuit, at(0.0, 0.0), at(2.0, 0.0), 30.0, &maze, &mut rng);
        assert_eq!(decision, TargetDecision::Pursue(Cell::new(2, 0)));
    }

    #[test]
    fn far_player_with_route_keeps_it() {
        let maze = open_maze();
        let mut rng = StdRng::seed_from_u64(0);
        let pursuit = Pursuit {
            mode: PursuitMode::Wandering,
            target: Some(Cell::new(5, 5)),
            path: [Cell::new(1, 0)].into_iter().collect(),
        };
        let decision = select_target(&pursuit, at(0.0, 0.0), at(45.0, 45.0), 30.0, &maze, &mut rng);
        assert_eq!(decision, TargetDecision::Keep);
        assert_eq!(decision.route(), None);
    }

    #[test]
    fn far_player_without_route_wanders() {
        let maze = open_maze();
        let mut rng = StdRng::seed_from_u64(4);
        let decision = select_target(
            &Pursuit::default(),
            at(0.0, 0.0),
            at(45.0, 45.0),
            30.0,
            &maze,
            &mut rng,
        );
        let TargetDecision::Wander(cell) = decision else {
            panic!("expected wander, got {decision:?}");
        };
        assert!(maze.grid().is_open(cell));
    }

    #[test]
    fn distance_exactly_at_radius_is_not_pursuit() {
        let maze = open_maze();
        let mut rng = StdRng::seed_from_u64(0);
        let pursuit = Pursuit {
            path: [Cell::new(1, 0)].into_iter().collect(),
            ..Pursuit::default()
        };
        let decision = select_target(&pursuit, at(0.0, 0.0), at(30.0, 0.0), 30.0, &maze, &mut rng);
        assert_eq!(decision, TargetDecision::Keep);
    }

    #[test]
    fn apply_stores_route_without_start() {
        let maze = open_maze();
        let mut finder = PathFinder::new();
        let mut pursuit = Pursuit::default();
        let len = apply_decision(
            &mut pursuit,
            TargetDecision::Pursue(Cell::new(3, 0)),
            Cell::new(0, 0),
            &maze,
            &mut finder,
        );
        assert_eq!(len, Some(3));
        assert_eq!(pursuit.mode, PursuitMode::Pursuing);
        assert_eq!(pursuit.target, Some(Cell::new(3, 0)));
        assert_eq!(
            pursuit.path,
            [Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)]
                .into_iter()
                .collect::<std::collections::VecDeque<_>>()
        );
    }

    #[test]
    fn keep_leaves_pursuit_untouched() {
        let maze = open_maze();
        let mut finder = PathFinder::new();
        let mut pursuit = Pursuit {
            mode: PursuitMode::Wandering,
            target: Some(Cell::new(9, 9)),
            path: [Cell::new(0, 1)].into_iter().collect(),
        };
        let before = pursuit.clone();
        assert_eq!(
            apply_decision(&mut pursuit, TargetDecision::Keep, Cell::new(0, 0), &maze, &mut finder),
            None
        );
        assert_eq!(pursuit.path, before.path);
        assert_eq!(pursuit.target, before.target);
    }

    #[test]
    fn unreachable_target_clears_route() {
        let maze = MazeWorld::from_grid(OccupancyGrid::parse("..#.\n..#.").unwrap());
        let mut finder = PathFinder::new();
        let mut pursuit = Pursuit {
            path: [Cell::new(1, 0)].into_iter().collect(),
            ..Pursuit::default()
        };
        let len = apply_decision(
            &mut pursuit,
            TargetDecision::Pursue(Cell::new(3, 0)),
            Cell::new(0, 0),
            &maze,
            &mut finder,
        );
        assert_eq!(len, Some(0));
        assert!(pursuit.path.is_empty());
    }
}
