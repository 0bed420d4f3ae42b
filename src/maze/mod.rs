//! Maze core: occupancy grid, wall generation, navigation graph and BFS.
//!
//! Nothing in here touches the ECS schedule. [`MazeWorld`] bundles the
//! finished grid and its graph so the plugins can share it read-only as a
//! resource for the length of a hunt.

pub mod error;
pub mod generator;
pub mod grid;
pub mod nav;
pub mod path;

use bevy::prelude::*;
use micromegas_tracing::prelude::span_scope;
use rand::Rng;
use rand::seq::SliceRandom;

pub use error::{MazeError, MazeResult};
pub use generator::{AnchorRange, GenerationReport, WallGenerator, WallShape};
pub use grid::{Cell, OccupancyGrid};
pub use nav::NavGraph;
pub use path::PathFinder;

/// A generated maze: immutable once built.
#[derive(Resource, Debug, Clone)]
pub struct MazeWorld {
    grid: OccupancyGrid,
    graph: NavGraph,
    open_cells: Vec<Cell>,
    report: GenerationReport,
}

impl MazeWorld {
    /// Populate a fresh `width` x `depth` grid and derive its graph.
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        depth: usize,
        generator: &WallGenerator,
        rng: &mut R,
    ) -> Self {
        let mut grid = OccupancyGrid::new(width, depth);
        let report = generator.populate(&mut grid, rng);
        Self {
            report,
            ..Self::from_grid(grid)
        }
    }

    /// Wrap a finished grid, e.g. one built with [`OccupancyGrid::parse`].
    pub fn from_grid(grid: OccupancyGrid) -> Self {
        span_scope!("build_nav_graph");
        let graph = NavGraph::build(&grid);
        let open_cells = grid.cells().filter(|c| grid.is_open(*c)).collect();
        Self {
            grid,
            graph,
            open_cells,
            report: GenerationReport::default(),
        }
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn open_cells(&self) -> &[Cell] {
        &self.open_cells
    }

    pub fn report(&self) -> GenerationReport {
        self.report
    }

    pub fn is_wall(&self, x: i32, z: i32) -> MazeResult<bool> {
        self.grid.is_wall(x, z)
    }

    /// Whether a continuous position is off the grid or inside a wall.
    pub fn blocks(&self, pos: Vec3) -> bool {
        !self.grid.is_open(Cell::from_position(pos))
    }

    /// Uniformly random open cell, `None` if the grid is solid wall.
    pub fn random_open_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        self.open_cells.choose(rng).copied()
    }

    /// Random open cell at least `min_distance` from `avoid`. Falls back to
    /// any open cell after `attempts` misses.
    pub fn random_open_cell_away_from<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        avoid: Vec3,
        min_distance: f32,
        attempts: usize,
    ) -> Option<Cell> {
        let flat = Vec2::new(avoid.x, avoid.z);
        for _ in 0..attempts {
            let cell = self.random_open_cell(rng)?;
            if Vec2::new(cell.x as f32, cell.z as f32).distance(flat) >= min_distance {
                return Some(cell);
            }
        }
        self.random_open_cell(rng)
    }

    /// Number of cells reachable from `start`, itself included.
    pub fn reachable_from(&self, start: Cell) -> usize {
        if !self.graph.is_open(start) {
            return 0;
        }
        pathfinding::prelude::bfs_reach(start, |c| self.graph.neighbors(*c).iter().copied()).count()
    }
}
