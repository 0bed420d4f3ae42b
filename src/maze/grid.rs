//! Occupancy grid: one wall flag per integer cell of the maze floor.

use std::fmt;

use bevy::math::Vec3;

use super::error::{MazeError, MazeResult};

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// An integer floor coordinate. `x` runs along world X, `z` along world Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell under a continuous world position. Rounds half up on each axis,
    /// so `-0.5` maps to `0` rather than `-1`.
    pub fn from_position(pos: Vec3) -> Self {
        Self {
            x: (pos.x + 0.5).floor() as i32,
            z: (pos.z + 0.5).floor() as i32,
        }
    }

    /// World position of the cell centre at the given height.
    pub fn to_position(self, height: f32) -> Vec3 {
        Vec3::new(self.x as f32, height, self.z as f32)
    }

    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.z - other.z).unsigned_abs()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

// ---------------------------------------------------------------------------
// Occupancy grid
// ---------------------------------------------------------------------------

/// Fixed-size wall map. Every in-bounds cell has exactly one flag, stored
/// row-major with `z` as the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    depth: usize,
    walls: Vec<bool>,
}

impl OccupancyGrid {
    /// An all-open grid.
    pub fn new(width: usize, depth: usize) -> Self {
        Self {
            width,
            depth,
            walls: vec![false; width * depth],
        }
    }

    /// Build a grid from ASCII rows: `#` is a wall, `.` or a space is open
    /// floor.
    /// Line `n` is row `z = n`; leading and trailing whitespace is ignored.
    pub fn parse(text: &str) -> MazeResult<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(MazeError::EmptyGrid);
        };

        let width = first.chars().count();
        let depth = rows.len();
        let mut grid = Self::new(width, depth);

        for (z, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MazeError::RaggedRow {
                    row: z,
                    found,
                    expected: width,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '#' => grid.walls[z * width + x] = true,
                    '.' | ' ' => {}
                    _ => return Err(MazeError::UnknownTile { ch, x, z }),
                }
            }
        }

        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether `(x, z)` lies inside the grid.
    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.index(x, z).is_some()
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let z = usize::try_from(z).ok()?;
        (x < self.width && z < self.depth).then(|| z * self.width + x)
    }

    fn out_of_bounds(&self, x: i32, z: i32) -> MazeError {
        MazeError::OutOfBounds {
            x,
            z,
            width: self.width,
            depth: self.depth,
        }
    }

    pub fn is_wall(&self, x: i32, z: i32) -> MazeResult<bool> {
        self.index(x, z)
            .map(|i| self.walls[i])
            .ok_or_else(|| self.out_of_bounds(x, z))
    }

    /// Mark `(x, z)` as a wall. Marking an existing wall is a no-op.
    pub fn set_wall(&mut self, x: i32, z: i32) -> MazeResult<()> {
        let i = self.index(x, z).ok_or_else(|| self.out_of_bounds(x, z))?;
        self.walls[i] = true;
        Ok(())
    }

    /// In bounds and not a wall.
    pub fn is_open(&self, cell: Cell) -> bool {
        self.index(cell.x, cell.z).is_some_and(|i| !self.walls[i])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.depth)
            .flat_map(move |z| (0..self.width).map(move |x| Cell::new(x as i32, z as i32)))
    }

    pub fn wall_count(&self) -> usize {
        self.walls.iter().filter(|w| **w).count()
    }

    pub fn cell_count(&self) -> usize {
        self.walls.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
