//! Stochastic wall placement.
//!
//! Each iteration picks one of four small shapes and an anchor cell, then
//! marks every in-bounds cell of the shape. Cells that fall off the grid are
//! skipped, so shapes anchored near an edge come out clipped. No attempt is
//! made to keep the open region connected.

use std::ops::RangeInclusive;

use micromegas_tracing::prelude::*;
use rand::Rng;
use serde::Deserialize;

use super::error::MazeError;
use super::grid::{Cell, OccupancyGrid};

/// The four wall shapes, each drawn with equal probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallShape {
    Single,
    /// Three cells along +x.
    Row,
    /// Three cells along +z.
    Column,
    /// 2x2 square.
    Block,
}

impl WallShape {
    pub const ALL: [WallShape; 4] = [
        WallShape::Single,
        WallShape::Row,
        WallShape::Column,
        WallShape::Block,
    ];

    /// Cell offsets relative to the anchor.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            WallShape::Single => &[(0, 0)],
            WallShape::Row => &[(0, 0), (1, 0), (2, 0)],
            WallShape::Column => &[(0, 0), (0, 1), (0, 2)],
            WallShape::Block => &[(0, 0), (1, 0), (0, 1), (1, 1)],
        }
    }
}

/// Range an anchor coordinate is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorRange {
    /// `[0, width]` and `[0, depth]`. Anchors on the far edge produce shapes
    /// that are entirely skipped.
    #[default]
    Inclusive,
    /// `[0, width)` and `[0, depth)`.
    Exclusive,
}

/// Outcome of one generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub shapes: u32,
    /// Cell writes performed, overlaps included.
    pub cells_marked: u32,
    /// Shape cells dropped for being out of bounds.
    pub cells_skipped: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallGenerator {
    pub shape_count: RangeInclusive<u32>,
    pub anchor: AnchorRange,
}

impl Default for WallGenerator {
    fn default() -> Self {
        Self {
            shape_count: 250..=750,
            anchor: AnchorRange::Inclusive,
        }
    }
}

impl WallGenerator {
    /// Mark walls on `grid`. Never writes outside the grid.
    pub fn populate<R: Rng + ?Sized>(
        &self,
        grid: &mut OccupancyGrid,
        rng: &mut R,
    ) -> GenerationReport {
        span_scope!("populate_walls");
        let mut report = GenerationReport::default();
        if grid.cell_count() == 0 || self.shape_count.is_empty() {
            return report;
        }

        let (max_x, max_z) = match self.anchor {
            AnchorRange::Inclusive => (grid.width() as i32, grid.depth() as i32),
            AnchorRange::Exclusive => (grid.width() as i32 - 1, grid.depth() as i32 - 1),
        };

        let shapes = rng.gen_range(self.shape_count.clone());
        for _ in 0..shapes {
            let shape = WallShape::ALL[rng.gen_range(0..WallShape::ALL.len())];
            let anchor = Cell::new(rng.gen_range(0..=max_x), rng.gen_range(0..=max_z));
            for &(dx, dz) in shape.offsets() {
                let cell = anchor.offset(dx, dz);
                match grid.set_wall(cell.x, cell.z) {
                    Ok(()) => report.cells_marked += 1,
                    Err(MazeError::OutOfBounds { .. }) => report.cells_skipped += 1,
                    Err(err) => warn!("wall at {cell} not placed: {err}"),
                }
            }
        }
        report.shapes = shapes;
        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn shape_count_within_range() {
        let generator = WallGenerator::default();
        for seed in 0..20 {
            let mut grid = OccupancyGrid::new(100, 100);
            let report = generator.populate(&mut grid, &mut StdRng::seed_from_u64(seed));
            assert!((250..=750).contains(&report.shapes), "seed {seed}: {report:?}");
            assert!(grid.wall_count() as u32 <= report.cells_marked);
            assert!(grid.wall_count() > 0);
        }
    }

    #[test]
    fn every_shape_cell_is_marked_or_skipped() {
        let generator = WallGenerator {
            shape_count: 40..=40,
            anchor: AnchorRange::Inclusive,
        };
        let mut grid = OccupancyGrid::new(6, 6);
        let report = generator.populate(&mut grid, &mut StdRng::seed_from_u64(9));
        assert_eq!(report.shapes, 40);
        // Shapes have 1, 3, 3 or 4 cells.
        let total = report.cells_marked + report.cells_skipped;
        assert!((40..=160).contains(&total), "{report:?}");
    }

    #[test]
    fn tiny_grid_clips_shapes_at_edges() {
        let generator = WallGenerator {
            shape_count: 200..=200,
            anchor: AnchorRange::Inclusive,
        };
        let mut grid = OccupancyGrid::new(2, 2);
        let report = generator.populate(&mut grid, &mut StdRng::seed_from_u64(3));
        assert!(report.cells_skipped > 0);
        assert!(grid.wall_count() <= 4);
    }

    #[test]
    fn exclusive_anchor_marks_each_anchor_once() {
        let generator = WallGenerator {
            shape_count: 500..=500,
            anchor: AnchorRange::Exclusive,
        };
        let mut grid = OccupancyGrid::new(1, 1);
        let report = generator.populate(&mut grid, &mut StdRng::seed_from_u64(1));
        // Only the anchor cell of each shape lands on the grid.
        assert_eq!(report.cells_marked, 500);
        assert!(report.cells_skipped > 0);
        assert_eq!(grid.is_wall(0, 0), Ok(true));
    }

    #[test]
    fn same_seed_same_walls() {
        let generator = WallGenerator::default();
        let mut a = OccupancyGrid::new(30, 30);
        let mut b = OccupancyGrid::new(30, 30);
        generator.populate(&mut a, &mut StdRng::seed_from_u64(77));
        generator.populate(&mut b, &mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_range_places_nothing() {
        #[allow(clippy::reversed_empty_ranges)]
        let generator = WallGenerator {
            shape_count: 5..=1,
            anchor: AnchorRange::Inclusive,
        };
        let mut grid = OccupancyGrid::new(10, 10);
        let report = generator.populate(&mut grid, &mut StdRng::seed_from_u64(0));
        assert_eq!(report, GenerationReport::default());
        assert_eq!(grid.wall_count(), 0);
    }
}
