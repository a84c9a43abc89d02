//! # Preview Helpers
//!
//! Cheap views of a configuration or a finished world for tuning: raw noise
//! maps, the surface line, an ASCII dump and block statistics.

use std::collections::BTreeMap;

use strata_noise::{NoiseField, NoiseResult, WorldSeed};

use crate::grid::{BlockId, WorldGrid};
use crate::params::GenerationParameters;

/// A sampled noise field, row-major from the bottom row.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseMap {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl NoiseMap {
    /// Map width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Map height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Value at `(x, y)`, if inside the map.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            self.values.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    /// All values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Samples `field` over a `width x height` window centered on the origin.
///
/// Pixel `(x, y)` samples world position `(x - width/2, y - height/2)` and
/// stores `(v + 1) / 2`.
///
/// # Errors
///
/// Returns the first sampling error.
#[allow(clippy::cast_precision_loss)]
pub fn noise_map(
    field: &NoiseField<'_>,
    width: usize,
    height: usize,
    seed: WorldSeed,
    ignore_amplitude: bool,
) -> NoiseResult<NoiseMap> {
    let half_width = (width / 2) as f64;
    let half_height = (height / 2) as f64;
    let mut values = Vec::with_capacity(width * height);

    for y in 0..height {
        for x in 0..width {
            let value = field.sample(
                x as f64 - half_width,
                y as f64 - half_height,
                seed,
                ignore_amplitude,
            )?;
            values.push((value + 1.0) / 2.0);
        }
    }

    Ok(NoiseMap {
        width,
        height,
        values,
    })
}

/// Surface line points, one per column, centered like [`noise_map`]:
/// `(x - width/2, surface_level + offset - height/2)`.
#[must_use]
pub fn surface_line(params: &GenerationParameters, surface_offsets: &[f64]) -> Vec<(f64, f64)> {
    let half_width = params.width / 2;
    let half_height = params.height / 2;

    (0..params.width)
        .zip(surface_offsets)
        .map(|(x, &offset)| {
            (
                f64::from(x - half_width),
                f64::from(params.surface_level) + offset - f64::from(half_height),
            )
        })
        .collect()
}

/// Glyphs for foreground blocks by palette index.
const PALETTE_GLYPHS: &[char] = &['#', '%', '&', '*', '+', '='];

/// Renders the grid as text, top row first.
///
/// Foreground blocks use a glyph per palette index (`#` filler, `%`
/// secondary, `?` for blocks outside the palette). Background-only cells
/// are `.`, air is a space.
#[must_use]
pub fn render_ascii(grid: &WorldGrid, palette: &[BlockId]) -> String {
    let mut out = String::new();

    for y in (0..grid.height()).rev() {
        if let Ok(row) = grid.row(y) {
            for cell in row {
                let glyph = match (cell.foreground, cell.background) {
                    (Some(block), _) => palette
                        .iter()
                        .position(|&p| p == block)
                        .and_then(|i| PALETTE_GLYPHS.get(i))
                        .copied()
                        .unwrap_or('?'),
                    (None, Some(_)) => '.',
                    (None, None) => ' ',
                };
                out.push(glyph);
            }
        }
        out.push('\n');
    }

    out
}

/// Cell counts of a grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    /// Cells with both slots empty.
    pub air: usize,
    /// Cells with a background but no foreground (open caves).
    pub background_only: usize,
    /// Foreground cells per block.
    pub foreground: BTreeMap<BlockId, usize>,
}

impl GridStats {
    /// Collects statistics for `grid`.
    #[must_use]
    pub fn collect(grid: &WorldGrid) -> Self {
        let mut stats = Self::default();
        for cell in grid.cells() {
            match cell.foreground {
                Some(block) => *stats.foreground.entry(block).or_insert(0) += 1,
                None if cell.background.is_some() => stats.background_only += 1,
                None => stats.air += 1,
            }
        }
        stats
    }

    /// Foreground count of one block.
    #[must_use]
    pub fn count(&self, block: BlockId) -> usize {
        self.foreground.get(&block).copied().unwrap_or(0)
    }

    /// Total solid cells.
    #[must_use]
    pub fn solid(&self) -> usize {
        self.foreground.values().sum()
    }
}

impl std::fmt::Display for GridStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let blocks: Vec<String> = self
            .foreground
            .iter()
            .map(|(block, count)| format!("{}={count}", block.0))
            .collect();
        write!(
            f,
            "air={} open={} solid={} [{}]",
            self.air,
            self.background_only,
            self.solid(),
            blocks.join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use strata_noise::{NoiseFieldConfig, NoiseLibrary};

    const FILLER: BlockId = BlockId::new(1);
    const STONE: BlockId = BlockId::new(2);

    #[test]
    fn test_noise_map_layout() {
        let library = NoiseLibrary::new().with_field("n", NoiseFieldConfig::default());
        let field = library.field("n").unwrap();
        let seed = WorldSeed::new(5);

        let map = noise_map(&field, 8, 6, seed, true).unwrap();
        assert_eq!(map.values().len(), 48);

        // Pixel (0, 0) is world (-4, -3)
        let corner = (field.sample(-4.0, -3.0, seed, true).unwrap() + 1.0) / 2.0;
        assert_eq!(map.get(0, 0), Some(corner));
        assert_eq!(map.get(8, 0), None);
    }

    #[test]
    fn test_surface_line_centered() {
        let params = GenerationParameters {
            width: 4,
            height: 10,
            surface_level: 6,
            ..GenerationParameters::default()
        };
        let line = surface_line(&params, &[0.0, 0.5, 1.0, 0.25]);
        assert_eq!(line, vec![(-2.0, 1.0), (-1.0, 1.5), (0.0, 2.0), (1.0, 1.25)]);
    }

    #[test]
    fn test_ascii_top_row_first() {
        let mut grid = WorldGrid::new(3, 2).unwrap();
        grid.set(0, 0, Cell::filled(FILLER, FILLER)).unwrap();
        grid.set(1, 0, Cell::filled(STONE, STONE)).unwrap();
        grid.set(2, 0, Cell { foreground: None, background: Some(STONE) }).unwrap();
        grid.set(2, 1, Cell::filled(BlockId::new(9), FILLER)).unwrap();

        let ascii = render_ascii(&grid, &[FILLER, STONE]);
        assert_eq!(ascii, "  ?\n#%.\n");
    }

    #[test]
    fn test_stats() {
        let mut grid = WorldGrid::new(2, 2).unwrap();
        grid.set(0, 0, Cell::filled(FILLER, FILLER)).unwrap();
        grid.set(1, 0, Cell::filled(STONE, STONE)).unwrap();
        grid.set(0, 1, Cell { foreground: None, background: Some(STONE) }).unwrap();

        let stats = GridStats::collect(&grid);
        assert_eq!(stats.air, 1);
        assert_eq!(stats.background_only, 1);
        assert_eq!(stats.count(FILLER), 1);
        assert_eq!(stats.count(STONE), 1);
        assert_eq!(stats.solid(), 2);
        assert_eq!(stats.to_string(), "air=1 open=1 solid=2 [1=1 2=1]");
    }
}
