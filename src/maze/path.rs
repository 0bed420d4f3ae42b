//! Breadth-first shortest paths over a [`NavGraph`].

use std::collections::VecDeque;

use super::error::{MazeError, MazeResult};
use super::grid::Cell;
use super::nav::NavGraph;

/// Reusable BFS state. The visited flags, parent links and frontier are
/// owned by the finder and reset at the start of every search, so one finder
/// can serve any number of pursuers in sequence.
#[derive(Debug, Default)]
pub struct PathFinder {
    visited: Vec<bool>,
    parents: Vec<Option<Cell>>,
    frontier: VecDeque<Cell>,
    expanded: usize,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortest path from `start` to `target`, both ends included.
    ///
    /// Returns `[start]` when the two are equal, and an empty path when
    /// either end is a wall, out of bounds, or the target is unreachable.
    pub fn find_path(&mut self, graph: &NavGraph, start: Cell, target: Cell) -> Vec<Cell> {
        self.try_find_path(graph, start, target).unwrap_or_default()
    }

    /// Like [`find_path`](Self::find_path) but reports why no path exists.
    pub fn try_find_path(
        &mut self,
        graph: &NavGraph,
        start: Cell,
        target: Cell,
    ) -> MazeResult<Vec<Cell>> {
        for cell in [start, target] {
            if graph.index(cell).is_none() {
                return Err(MazeError::OutOfBounds {
                    x: cell.x,
                    z: cell.z,
                    width: graph.width(),
                    depth: graph.depth(),
                });
            }
            if !graph.is_open(cell) {
                return Err(MazeError::Blocked(cell));
            }
        }
        if start == target {
            self.expanded = 0;
            return Ok(vec![start]);
        }

        self.reset(graph.cell_count());
        if let Some(i) = graph.index(start) {
            self.visited[i] = true;
        }
        self.frontier.push_back(start);

        while let Some(cell) = self.frontier.pop_front() {
            self.expanded += 1;
            if cell == target {
                return Ok(self.walk_back(graph, target));
            }
            for &next in graph.neighbors(cell) {
                let Some(i) = graph.index(next) else {
                    continue;
                };
                // First discovery wins the parent link.
                if !self.visited[i] {
                    self.visited[i] = true;
                    self.parents[i] = Some(cell);
                    self.frontier.push_back(next);
                }
            }
        }

        Err(MazeError::Unreachable {
            from: start,
            to: target,
        })
    }

    /// Cells dequeued by the most recent search.
    pub fn last_expanded(&self) -> usize {
        self.expanded
    }

    fn reset(&mut self, cells: usize) {
        self.visited.clear();
        self.visited.resize(cells, false);
        self.parents.clear();
        self.parents.resize(cells, None);
        self.frontier.clear();
        self.expanded = 0;
    }

    fn walk_back(&self, graph: &NavGraph, target: Cell) -> Vec<Cell> {
        let mut path = vec![target];
        let mut cursor = target;
        while let Some(parent) = graph.index(cursor).and_then(|i| self.parents[i]) {
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
