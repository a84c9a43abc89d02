//! # Generation Parameters
//!
//! Everything a run needs, loadable from TOML. Every key has a default, so
//! a partial file works:
//!
//! ```toml
//! seed = 42
//! width = 512
//! height = 256
//! surface_level = 128
//! mountains_level = 156
//! caves_level = 64
//! caves_vertical_size = 40
//! caves_fill_percent = 50.0
//! caves_smoothing_passes = 5
//! palette = [1, 2]
//! surface_noise = "surface"
//!
//! [noise.fields.surface]
//! amplitude = 24.0
//! frequency = 8.0
//! octaves = 3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_noise::{NoiseFieldConfig, NoiseLibrary, WorldSeed};

use crate::error::{WorldGenError, WorldGenResult};
use crate::grid::BlockId;

/// Name of the surface field in the default library.
pub const DEFAULT_SURFACE_FIELD: &str = "surface";

/// Parameters of one generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// World seed for noise and cave seeding.
    pub seed: WorldSeed,
    /// World width in cells.
    pub width: i32,
    /// World height in cells.
    pub height: i32,
    /// Baseline surface height.
    pub surface_level: i32,
    /// Rows above this (minus half the surface offset) are mountain rock.
    pub mountains_level: i32,
    /// Center row of the cave band.
    pub caves_level: i32,
    /// Height of the cave band.
    pub caves_vertical_size: i32,
    /// Chance (percent) that a seeded cave cell stays solid.
    pub caves_fill_percent: f64,
    /// Number of smoothing passes.
    pub caves_smoothing_passes: i32,
    /// Name of the root surface field in `noise`.
    pub surface_noise: String,
    /// Blocks used by the generator: `[filler, secondary, ..]`.
    pub palette: Vec<BlockId>,
    /// Noise fields available to this run.
    pub noise: NoiseLibrary,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default(),
            width: 256,
            height: 256,
            surface_level: 128,
            mountains_level: 156,
            caves_level: 64,
            caves_vertical_size: 40,
            caves_fill_percent: 50.0,
            caves_smoothing_passes: 5,
            surface_noise: DEFAULT_SURFACE_FIELD.to_owned(),
            palette: vec![BlockId::new(1), BlockId::new(2)],
            noise: NoiseLibrary::new()
                .with_field(DEFAULT_SURFACE_FIELD, NoiseFieldConfig::default()),
        }
    }
}

impl GenerationParameters {
    /// Parses and validates parameters from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`WorldGenError::Config`] for malformed TOML, or any
    /// validation error.
    pub fn from_toml_str(source: &str) -> WorldGenResult<Self> {
        let params: Self = toml::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    /// Reads, parses and validates a parameter file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldGenError::Io`] if the file cannot be read, otherwise
    /// as [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> WorldGenResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        tracing::debug!("loading generation parameters from {}", path.display());
        Self::from_toml_str(&source)
    }

    /// Replaces the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: WorldSeed) -> Self {
        self.seed = seed;
        self
    }

    /// Filler and secondary blocks.
    ///
    /// # Errors
    ///
    /// Returns [`WorldGenError::PaletteTooShort`] with fewer than two blocks.
    pub fn blocks(&self) -> WorldGenResult<(BlockId, BlockId)> {
        match self.palette.as_slice() {
            [filler, secondary, ..] => Ok((*filler, *secondary)),
            short => Err(WorldGenError::PaletteTooShort(short.len())),
        }
    }

    /// Checks every parameter and the whole noise library.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found.
    pub fn validate(&self) -> WorldGenResult<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(WorldGenError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=100.0).contains(&self.caves_fill_percent) {
            return Err(WorldGenError::InvalidFillPercent(self.caves_fill_percent));
        }
        if self.caves_smoothing_passes < 0 {
            return Err(WorldGenError::NegativeSmoothingPasses(
                self.caves_smoothing_passes,
            ));
        }
        self.blocks()?;
        if !self.noise.contains(&self.surface_noise) {
            return Err(WorldGenError::UnknownSurfaceField(self.surface_noise.clone()));
        }
        self.noise.validate()?;

        if self.surface_level >= self.height {
            tracing::warn!(
                "surface level {} is at or above world height {}; no sky rows",
                self.surface_level,
                self.height
            );
        }
        if self.caves_level.saturating_sub(self.caves_vertical_size / 2) < 0 {
            tracing::warn!(
                "cave band starts below the world floor (level {}, size {})",
                self.caves_level,
                self.caves_vertical_size
            );
        }
        Ok(())
    }
}
