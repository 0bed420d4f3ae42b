//! Navigation graph derived once from a finished occupancy grid.

use super::grid::{Cell, OccupancyGrid};

/// Neighbour probe order: +z, -z, +x, -x. Path tie-breaking depends on it.
pub const NEIGHBOR_ORDER: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Adjacency lists for every cell, indexed row-major like the grid.
/// Wall cells have no neighbours and never appear in any list.
#[derive(Debug, Clone)]
pub struct NavGraph {
    width: usize,
    depth: usize,
    open: Vec<bool>,
    adjacency: Vec<Vec<Cell>>,
}

impl NavGraph {
    pub fn build(grid: &OccupancyGrid) -> Self {
        let open = grid.cells().map(|cell| grid.is_open(cell)).collect();
        let adjacency = grid
            .cells()
            .map(|cell| {
                if !grid.is_open(cell) {
                    return Vec::new();
                }
                NEIGHBOR_ORDER
                    .iter()
                    .map(|&(dx, dz)| cell.offset(dx, dz))
                    .filter(|n| grid.is_open(*n))
                    .collect()
            })
            .collect();

        Self {
            width: grid.width(),
            depth: grid.depth(),
            open,
            adjacency,
        }
    }

    /// In bounds and not a wall. An open cell may still have no neighbours.
    pub fn is_open(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.open[i])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn cell_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Row-major index of an in-bounds cell.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let z = usize::try_from(cell.z).ok()?;
        (x < self.width && z < self.depth).then(|| z * self.width + x)
    }

    /// Neighbours of `cell`; empty for walls and out-of-bounds cells.
    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        self.index(cell)
            .map(|i| self.adjacency[i].as_slice())
            .unwrap_or(&[])
    }

    /// Number of directed edges. Twice the number of open adjacent pairs.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_neighbor_counts() {
        let graph = NavGraph::build(&OccupancyGrid::new(10, 10));
        assert_eq!(graph.neighbors(Cell::new(5, 5)).len(), 4);
        assert_eq!(graph.neighbors(Cell::new(0, 5)).len(), 3);
        assert_eq!(graph.neighbors(Cell::new(5, 9)).len(), 3);
        assert_eq!(graph.neighbors(Cell::new(0, 0)).len(), 2);
        assert_eq!(graph.neighbors(Cell::new(9, 9)).len(), 2);
    }

    #[test]
    fn neighbors_follow_probe_order() {
        let graph = NavGraph::build(&OccupancyGrid::new(3, 3));
        assert_eq!(
            graph.neighbors(Cell::new(1, 1)),
            &[Cell::new(1, 2), Cell::new(1, 0), Cell::new(2, 1), Cell::new(0, 1)]
        );
    }

    #[test]
    fn wall_cells_are_disconnected() {
        let mut grid = OccupancyGrid::new(10, 10);
        grid.set_wall(5, 5).unwrap();
        let graph = NavGraph::build(&grid);

        assert!(graph.neighbors(Cell::new(5, 5)).is_empty());
        for cell in [Cell::new(5, 6), Cell::new(5, 4), Cell::new(6, 5), Cell::new(4, 5)] {
            assert_eq!(graph.neighbors(cell).len(), 3, "{cell}");
            assert!(!graph.neighbors(cell).contains(&Cell::new(5, 5)));
        }
    }

    #[test]
    fn out_of_bounds_has_no_neighbors() {
        let graph = NavGraph::build(&OccupancyGrid::new(4, 4));
        assert!(graph.neighbors(Cell::new(-1, 0)).is_empty());
        assert!(graph.neighbors(Cell::new(4, 0)).is_empty());
    }

    #[test]
    fn edge_count_of_open_grid() {
        // 2 * (horizontal pairs + vertical pairs)
        let graph = NavGraph::build(&OccupancyGrid::new(4, 3));
        assert_eq!(graph.edge_count(), 2 * (3 * 3 + 4 * 2));
    }
}
