//! PNG export for worlds and noise maps.

use std::path::Path;

use anyhow::{Context, Result};
use image::{GrayImage, Luma, Rgb, RgbImage};
use strata_worldgen::preview::NoiseMap;
use strata_worldgen::{BlockId, Cell, WorldGrid};

const SKY: Rgb<u8> = Rgb([135, 190, 235]);
const CAVE: Rgb<u8> = Rgb([40, 32, 28]);
const UNKNOWN: Rgb<u8> = Rgb([255, 0, 255]);
const BLOCK_COLORS: &[Rgb<u8>] = &[
    Rgb([120, 84, 52]),
    Rgb([110, 110, 118]),
    Rgb([72, 140, 64]),
    Rgb([200, 180, 120]),
];

fn cell_color(cell: &Cell, palette: &[BlockId]) -> Rgb<u8> {
    match (cell.foreground, cell.background) {
        (Some(block), _) => palette
            .iter()
            .position(|&p| p == block)
            .and_then(|i| BLOCK_COLORS.get(i))
            .copied()
            .unwrap_or(UNKNOWN),
        (None, Some(_)) => CAVE,
        (None, None) => SKY,
    }
}

/// Writes the grid as an RGB PNG, top row first.
pub fn write_world_png(grid: &WorldGrid, palette: &[BlockId], path: &Path) -> Result<()> {
    let width = u32::try_from(grid.width()).context("grid width")?;
    let height = u32::try_from(grid.height()).context("grid height")?;

    let image = RgbImage::from_fn(width, height, |px, py| {
        // Image rows go down, grid rows go up
        let x = i32::try_from(px).unwrap_or(i32::MAX);
        let y = i32::try_from(height - 1 - py).unwrap_or(i32::MAX);
        grid.get(x, y)
            .map_or(UNKNOWN, |cell| cell_color(cell, palette))
    });

    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

const LINE: Rgb<u8> = Rgb([220, 40, 40]);

/// Image pixels of centered line points on a `width x height` map.
///
/// Inverts the centering of the noise map: point `(lx, ly)` lands on column
/// `lx + width/2` and map row `ly + height/2`, top row first in the image.
/// Points outside the image are dropped.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn line_pixels(line: &[(f64, f64)], width: u32, height: u32) -> Vec<(u32, u32)> {
    let half_width = f64::from(width / 2);
    let half_height = f64::from(height / 2);

    line.iter()
        .filter_map(|&(lx, ly)| {
            let px = (lx + half_width).round();
            let row = (ly + half_height).round();
            let inside = (0.0..f64::from(width)).contains(&px)
                && (0.0..f64::from(height)).contains(&row);
            inside.then(|| (px as u32, height - 1 - row as u32))
        })
        .collect()
}

/// Writes a normalized noise map as a PNG, top row first.
///
/// Without a line the image is grayscale. With one, the map is written as
/// RGB with the line drawn over it.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn write_noise_png(map: &NoiseMap, line: Option<&[(f64, f64)]>, path: &Path) -> Result<()> {
    let width = u32::try_from(map.width()).context("map width")?;
    let height = u32::try_from(map.height()).context("map height")?;

    let gray = GrayImage::from_fn(width, height, |px, py| {
        let value = map
            .get(px as usize, (height - 1 - py) as usize)
            .unwrap_or(0.0);
        Luma([(value.clamp(0.0, 1.0) * 255.0).round() as u8])
    });

    let result = match line {
        None => gray.save(path),
        Some(line) => {
            let mut image = RgbImage::from_fn(width, height, |px, py| {
                let Luma([v]) = *gray.get_pixel(px, py);
                Rgb([v, v, v])
            });
            for (px, py) in line_pixels(line, width, height) {
                image.put_pixel(px, py, LINE);
            }
            image.save(path)
        }
    };

    result.with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_pixels_invert_centering() {
        // 4x10 map: world (-2, 1) is column 0, map row 6, image row 3
        let pixels = line_pixels(&[(-2.0, 1.0), (-1.0, 1.4), (1.0, -5.0)], 4, 10);
        assert_eq!(pixels, vec![(0, 3), (1, 3), (3, 9)]);
    }

    #[test]
    fn test_line_pixels_drop_outside() {
        let pixels = line_pixels(&[(-3.0, 0.0), (2.0, 0.0), (0.0, 5.0), (0.0, -6.0)], 4, 10);
        assert!(pixels.is_empty());
    }
}
