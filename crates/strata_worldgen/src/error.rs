//! # World Generation Error Types
//!
//! All errors that can occur while loading parameters or generating a world.

use strata_noise::NoiseError;
use thiserror::Error;

/// Errors that can occur in world generation.
#[derive(Error, Debug)]
pub enum WorldGenError {
    /// Width or height is not positive.
    #[error("invalid world dimensions {width}x{height}: both must be positive")]
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },

    /// Cave fill percent outside [0, 100].
    #[error("caves fill percent must be within [0, 100], got {0}")]
    InvalidFillPercent(f64),

    /// Negative smoothing pass count.
    #[error("caves smoothing passes must be non-negative, got {0}")]
    NegativeSmoothingPasses(i32),

    /// Palette has fewer than two blocks.
    #[error("palette needs a filler and a secondary block, got {0} entries")]
    PaletteTooShort(usize),

    /// The surface field is not in the noise library.
    #[error("surface noise field not found: {0}")]
    UnknownSurfaceField(String),

    /// Noise configuration or sampling failure.
    #[error("noise error: {0}")]
    Noise(#[from] NoiseError),

    /// Cell access outside the grid.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: i32,
        /// Requested row.
        y: i32,
        /// Grid width.
        width: i32,
        /// Grid height.
        height: i32,
    },

    /// Malformed configuration file.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for world generation operations.
pub type WorldGenResult<T> = Result<T, WorldGenError>;
