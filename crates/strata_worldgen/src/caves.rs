//! # Cave Smoothing
//!
//! Cellular automaton that turns the seeded noise of the cave band into
//! connected caverns. Per cell, with out-of-grid neighbors counted as solid:
//!
//! - more than 4 solid neighbors: fill an empty foreground
//! - fewer than 4: clear the foreground
//! - exactly 4: leave it alone
//!
//! Updates are in place, columns left to right and rows bottom to top, so a
//! cell sees the already-updated cells below it and to its left.

use std::ops::Range;

use crate::grid::{BlockId, WorldGrid};
use crate::params::GenerationParameters;

/// Neighbor count at which a cell is left unchanged.
pub const WALL_THRESHOLD: u8 = 4;

/// Rows of column `x` the smoother visits.
///
/// `[caves_level - size/2, caves_level + size/2 + trunc(offset)/2)`
/// intersected with the grid. The offset is truncated to an integer before
/// the integer halving, so offsets in `(-2, 2)` add no rows.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn smoothing_rows(params: &GenerationParameters, surface_offset: f64, height: i32) -> Range<i32> {
    let half = params.caves_vertical_size / 2;
    let start = params.caves_level.saturating_sub(half).clamp(0, height);

    // Float-to-int casts saturate
    let extension = (surface_offset.trunc() as i32) / 2;
    let end = params
        .caves_level
        .saturating_add(half)
        .saturating_add(extension)
        .min(height)
        .max(start);
    start..end
}

/// Smooths `rows` of column `x` in place.
///
/// Returns the number of cells whose foreground changed. Rows outside the
/// grid are skipped.
pub fn smooth_column(grid: &mut WorldGrid, x: i32, rows: Range<i32>, wall: BlockId) -> usize {
    let mut changed = 0;

    for y in rows {
        if !grid.contains(x, y) {
            continue;
        }
        let neighbors = grid.surrounding_wall_count(x, y);
        let cell = grid.at_mut(x, y);

        if neighbors > WALL_THRESHOLD {
            if cell.foreground.is_none() {
                cell.foreground = Some(wall);
                changed += 1;
            }
        } else if neighbors < WALL_THRESHOLD && cell.foreground.take().is_some() {
            changed += 1;
        }
    }

    changed
}

/// Runs one full smoothing pass over every column.
///
/// Returns the number of cells changed.
pub fn smooth_pass(
    grid: &mut WorldGrid,
    params: &GenerationParameters,
    surface_offsets: &[f64],
    wall: BlockId,
) -> usize {
    let height = grid.height();
    let mut changed = 0;

    for (x, offset) in (0..grid.width()).zip(surface_offsets) {
        let rows = smoothing_rows(params, *offset, height);
        changed += smooth_column(grid, x, rows, wall);
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    const STONE: BlockId = BlockId::new(2);

    fn params(caves_level: i32, caves_vertical_size: i32) -> GenerationParameters {
        GenerationParameters {
            caves_level,
            caves_vertical_size,
            ..GenerationParameters::default()
        }
    }

    fn solid_grid(width: i32, height: i32) -> WorldGrid {
        let mut grid = WorldGrid::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                grid.set(x, y, Cell::filled(STONE, STONE)).unwrap();
            }
        }
        grid
    }

    #[test]
    fn test_rows_span_band() {
        let params = params(64, 40);
        assert_eq!(smoothing_rows(&params, 0.0, 256), 44..84);
        assert_eq!(smoothing_rows(&params, 2.0, 256), 44..85);
        assert_eq!(smoothing_rows(&params, 5.9, 256), 44..86);
        assert_eq!(smoothing_rows(&params, -4.0, 256), 44..82);
    }

    #[test]
    fn test_fractional_offset_adds_no_rows() {
        let params = params(64, 40);
        for offset in [0.25, 0.5, 1.0, 1.99, -1.5] {
            assert_eq!(smoothing_rows(&params, offset, 256), 44..84, "offset {offset}");
        }
    }

    #[test]
    fn test_rows_clipped_to_grid() {
        let low = params(4, 20);
        assert_eq!(smoothing_rows(&low, 0.0, 10), 0..10);

        // Band entirely above the grid collapses to an empty range
        let high = params(100, 10);
        assert!(smoothing_rows(&high, 0.0, 50).is_empty());
    }

    #[test]
    fn test_isolated_hole_fills() {
        let mut grid = solid_grid(5, 5);
        grid.get_mut(2, 2).unwrap().foreground = None;

        let changed = smooth_column(&mut grid, 2, 0..5, STONE);
        assert_eq!(changed, 1);
        assert!(grid.get(2, 2).unwrap().is_solid());
    }

    #[test]
    fn test_isolated_block_clears() {
        let mut grid = WorldGrid::new(5, 5).unwrap();
        grid.set(2, 2, Cell::filled(STONE, STONE)).unwrap();

        assert_eq!(smooth_column(&mut grid, 2, 2..3, STONE), 1);
        assert!(!grid.get(2, 2).unwrap().is_solid());
        // Background survives
        assert_eq!(grid.get(2, 2).unwrap().background, Some(STONE));
    }

    #[test]
    fn test_four_neighbors_unchanged() {
        let mut grid = WorldGrid::new(3, 3).unwrap();
        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1)] {
            grid.set(x, y, Cell::filled(STONE, STONE)).unwrap();
        }
        grid.set(1, 1, Cell::filled(STONE, STONE)).unwrap();

        assert_eq!(grid.surrounding_wall_count(1, 1), 4);
        assert_eq!(smooth_column(&mut grid, 1, 1..2, STONE), 0);
        assert!(grid.get(1, 1).unwrap().is_solid());
    }

    #[test]
    fn test_updates_are_in_place() {
        // Column of air in solid rock: bottom cell has 5 walls (fills),
        // then the cell above sees it and fills too
        let mut grid = solid_grid(3, 4);
        for y in 0..4 {
            grid.get_mut(1, y).unwrap().foreground = None;
        }

        let changed = smooth_column(&mut grid, 1, 0..4, STONE);
        assert_eq!(changed, 4);
        assert!((0..4).all(|y| grid.get(1, y).unwrap().is_solid()));
    }

    #[test]
    fn test_convergence_is_stable() {
        let params = params(10, 16);
        let mut grid = solid_grid(24, 24);
        for y in 6..14 {
            for x in 6..18 {
                grid.get_mut(x, y).unwrap().foreground = None;
            }
        }
        let offsets = vec![0.5; 24];

        let mut passes = 0;
        while smooth_pass(&mut grid, &params, &offsets, STONE) > 0 {
            passes += 1;
            assert!(passes < 100, "smoothing failed to converge");
        }

        let settled = grid.clone();
        assert_eq!(smooth_pass(&mut grid, &params, &offsets, STONE), 0);
        assert_eq!(grid, settled);
    }

    #[test]
    fn test_pass_stays_inside_rows() {
        let params = params(8, 6);
        let mut grid = WorldGrid::new(12, 20).unwrap();
        // Scattered blocks everywhere, inside and outside the band
        for y in 0..20 {
            for x in 0..12 {
                if (x * 7 + y * 3) % 5 < 2 {
                    grid.set(x, y, Cell::filled(STONE, STONE)).unwrap();
                }
            }
        }
        let offsets: Vec<f64> = (0..12).map(|x| f64::from(x) * 0.5).collect();
        let before = grid.clone();

        smooth_pass(&mut grid, &params, &offsets, STONE);

        for x in 0..12 {
            let rows = smoothing_rows(&params, offsets[x as usize], 20);
            for y in 0..20 {
                if !rows.contains(&y) {
                    assert_eq!(grid.get(x, y).unwrap(), before.get(x, y).unwrap());
                }
            }
        }
    }
}
