use thiserror::Error;

use super::grid::Cell;

/// Errors raised by grid lookups and path queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    /// A coordinate outside `[0, width) x [0, depth)`.
    #[error("cell ({x}, {z}) is outside the {width}x{depth} grid")]
    OutOfBounds {
        x: i32,
        z: i32,
        width: usize,
        depth: usize,
    },
    /// A path endpoint sits on a wall.
    #[error("cell {0} is a wall")]
    Blocked(Cell),
    /// The search exhausted the reachable region without meeting the target.
    #[error("no path from {from} to {to}")]
    Unreachable { from: Cell, to: Cell },
    #[error("grid text is empty")]
    EmptyGrid,
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown grid character '{ch}' at ({x}, {z})")]
    UnknownTile { ch: char, x: usize, z: usize },
}

pub type MazeResult<T> = Result<T, MazeError>;
