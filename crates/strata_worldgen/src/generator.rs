//! # World Generator
//!
//! Turns [`GenerationParameters`] into a [`WorldGrid`] in three phases:
//!
//! 1. **Surface profile**: one normalized sample of the surface field per
//!    column
//! 2. **Column fill**: rows bottom to top, columns left to right. Each
//!    cell gets filler or secondary blocks by height, and cells inside the
//!    cave band may lose their foreground to the seeded random stream
//! 3. **Cave smoothing**: `caves_smoothing_passes` cellular-automaton passes
//!
//! The fill order fixes the order of random draws, so the same seed and
//! parameters always produce the same grid.
//!
//! [`GenerationTask`] runs the same phases in bounded steps. The one-shot
//! [`WorldGenerator::generate`] is a task run to completion.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::caves;
use crate::error::WorldGenResult;
use crate::grid::{BlockId, Cell, WorldGrid};
use crate::params::GenerationParameters;

/// Rows below `surface - SECONDARY_DEPTH` (shifted by half the offset) are
/// secondary rock.
pub const SECONDARY_DEPTH: i32 = 6;

/// Lowest row the cave band may start at.
pub const CAVE_FLOOR: i32 = 8;

/// Columns `x <= CAVE_MARGIN` and `x >= width - CAVE_MARGIN - 1` are not
/// seeded (for widths where the margins do not overlap).
pub const CAVE_MARGIN: i32 = 3;

/// Rounds half to even and truncates to `i32`, saturating at the bounds.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_even(value: f64) -> i32 {
    value.round_ties_even() as i32
}

/// Clamps `value` into `[min, max]`, testing `min` first.
///
/// Unlike [`i32::clamp`] this never panics: when `min > max` a value below
/// `min` yields `min` and any other value above `max` yields `max`.
#[inline]
#[must_use]
pub const fn clamp_min_first(value: i32, min: i32, max: i32) -> i32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Rows eligible for cave seeding in one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaveBand {
    /// Lower bound after clamping.
    pub lower: i32,
    /// Upper bound after clamping.
    pub upper: i32,
}

impl CaveBand {
    /// Computes the band for a column.
    ///
    /// The band is centered on `caves_level + offset/4`, then the lower
    /// bound is kept at or above [`CAVE_FLOOR`] and the upper bound at or
    /// below `surface`.
    #[must_use]
    pub fn for_column(params: &GenerationParameters, surface_offset: f64, surface: i32) -> Self {
        let half = params.caves_vertical_size / 2;
        let center = round_half_even(f64::from(params.caves_level) + surface_offset / 4.0);
        let lower = center.saturating_sub(half);
        let upper = center.saturating_add(half);

        let lower = clamp_min_first(lower, CAVE_FLOOR, upper);
        let upper = clamp_min_first(upper, lower, surface);
        Self { lower, upper }
    }

    /// Returns true if row `y` is seeded.
    ///
    /// This is boolean equality, not a range test: when the bounds cross,
    /// rows between them are selected as well.
    #[inline]
    #[must_use]
    pub const fn selects(&self, y: i32) -> bool {
        (y >= self.lower) == (y < self.upper)
    }
}

/// Returns true if column `x` is seeded.
///
/// Boolean equality again, so on very narrow worlds where the margins
/// overlap the selected columns are the ones *inside* both margins.
#[inline]
#[must_use]
pub const fn cave_column(x: i32, width: i32) -> bool {
    (x > CAVE_MARGIN) == (x < width.saturating_sub(CAVE_MARGIN + 1))
}

/// Surface height of a column: `round(surface_level + offset)`.
#[inline]
#[must_use]
pub fn surface_height(surface_level: i32, surface_offset: f64) -> i32 {
    round_half_even(f64::from(surface_level) + surface_offset)
}

/// A finished world.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedWorld {
    /// The populated grid.
    pub grid: WorldGrid,
    /// Normalized surface sample per column.
    pub surface_offsets: Vec<f64>,
}

impl GeneratedWorld {
    /// Surface height of every column.
    #[must_use]
    pub fn surface_heights(&self, surface_level: i32) -> Vec<i32> {
        self.surface_offsets
            .iter()
            .map(|&offset| surface_height(surface_level, offset))
            .collect()
    }
}

/// Generates worlds from validated parameters.
#[derive(Clone, Debug)]
pub struct WorldGenerator {
    params: GenerationParameters,
    filler: BlockId,
    secondary: BlockId,
}

impl WorldGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error in `params`.
    pub fn new(params: GenerationParameters) -> WorldGenResult<Self> {
        params.validate()?;
        let (filler, secondary) = params.blocks()?;
        Ok(Self {
            params,
            filler,
            secondary,
        })
    }

    /// The parameters this generator runs with.
    #[must_use]
    pub const fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// Samples the surface field once per column.
    ///
    /// Column `x` samples world position `(x - width/2, 0)` and stores
    /// `(v + 1) / 2`.
    ///
    /// # Errors
    ///
    /// Returns a noise error if sampling fails.
    pub fn surface_profile(&self) -> WorldGenResult<Vec<f64>> {
        let field = self.params.noise.field(&self.params.surface_noise)?;
        let half_width = self.params.width / 2;

        (0..self.params.width)
            .map(|x| {
                let value = field.sample(f64::from(x - half_width), 0.0, self.params.seed, false)?;
                Ok((value + 1.0) / 2.0)
            })
            .collect()
    }

    /// Starts an incremental run.
    ///
    /// The surface profile is sampled up front, so every noise error is
    /// reported here and stepping itself cannot fail.
    ///
    /// # Errors
    ///
    /// Returns a noise error if the surface profile cannot be sampled.
    pub fn task(&self) -> WorldGenResult<GenerationTask<'_>> {
        let surface_offsets = self.surface_profile()?;
        let grid = WorldGrid::new(self.params.width, self.params.height)?;

        tracing::debug!(
            "generation started: {}x{} seed {}",
            self.params.width,
            self.params.height,
            self.params.seed.value()
        );

        Ok(GenerationTask {
            generator: self,
            grid,
            surface_offsets,
            rng: ChaCha8Rng::seed_from_u64(self.params.seed.rng_seed()),
            phase: Phase::Fill { next_row: 0 },
        })
    }

    /// Generates a complete world.
    ///
    /// # Errors
    ///
    /// Returns a noise error if the surface profile cannot be sampled.
    pub fn generate(&self) -> WorldGenResult<GeneratedWorld> {
        Ok(self.task()?.finish())
    }

    /// Computes one cell of the fill phase, drawing from `rng` if the cell
    /// is inside the cave band.
    fn fill_cell(&self, x: i32, y: i32, surface_offset: f64, rng: &mut ChaCha8Rng) -> Cell {
        let params = &self.params;
        let surface = surface_height(params.surface_level, surface_offset);
        let mut cell = Cell::EMPTY;

        if y < surface {
            cell = Cell::filled(self.filler, self.filler);

            if y < params.caves_level.saturating_add(params.caves_vertical_size / 2) {
                cell.background = Some(self.secondary);
            }
            if y > round_half_even(f64::from(params.mountains_level) - surface_offset / 2.0) {
                cell.foreground = Some(self.secondary);
            }
            if f64::from(y) < f64::from(surface.saturating_sub(SECONDARY_DEPTH)) + surface_offset / 2.0 {
                cell.foreground = Some(self.secondary);
            }
        }

        let band = CaveBand::for_column(params, surface_offset, surface);
        if band.selects(y)
            && cave_column(x, params.width)
            && rng.gen_range(0.0..100.0) > params.caves_fill_percent
        {
            cell.foreground = None;
        }

        cell
    }
}

/// Phase of a [`GenerationTask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationPhase {
    /// Filling rows.
    Fill,
    /// Running smoothing passes.
    Smooth,
    /// All work done.
    Done,
}

/// Progress report from [`GenerationTask::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Current phase.
    pub phase: GenerationPhase,
    /// Work units done (rows filled plus columns smoothed).
    pub completed: usize,
    /// Work units in the whole run.
    pub total: usize,
}

impl Progress {
    /// Returns true once the world is complete.
    #[inline]
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == GenerationPhase::Done
    }

    /// Completed share of the run in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 || self.is_done() {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Fill { next_row: i32 },
    Smooth { pass: i32, next_column: i32, changed: usize },
    Done,
}

/// An in-progress generation run.
///
/// Call [`step`](Self::step) until it reports done, then
/// [`finish`](Self::finish). Dropping the task or calling
/// [`cancel`](Self::cancel) discards the partial grid; it is never
/// observable from outside.
#[derive(Debug)]
pub struct GenerationTask<'a> {
    generator: &'a WorldGenerator,
    grid: WorldGrid,
    surface_offsets: Vec<f64>,
    rng: ChaCha8Rng,
    phase: Phase,
}

impl GenerationTask<'_> {
    /// Does up to `budget` units of work.
    ///
    /// A unit is one row during the fill phase and one column of one pass
    /// during smoothing. A zero budget does nothing.
    pub fn step(&mut self, budget: usize) -> Progress {
        let mut remaining = budget;

        while remaining > 0 {
            match self.phase {
                Phase::Fill { next_row } => {
                    self.fill_row(next_row);
                    remaining -= 1;
                    self.phase = if next_row + 1 < self.grid.height() {
                        Phase::Fill { next_row: next_row + 1 }
                    } else {
                        tracing::debug!("fill phase complete");
                        self.first_smoothing_phase()
                    };
                }
                Phase::Smooth {
                    pass,
                    next_column,
                    changed,
                } => {
                    let changed = changed + self.smooth_column(next_column);
                    remaining -= 1;
                    self.phase = if next_column + 1 < self.grid.width() {
                        Phase::Smooth {
                            pass,
                            next_column: next_column + 1,
                            changed,
                        }
                    } else {
                        self.end_pass(pass, changed)
                    };
                }
                Phase::Done => break,
            }
        }

        self.progress()
    }

    /// Reports progress without doing any work.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let params = self.generator.params();
        let rows = usize::try_from(params.height).unwrap_or(0);
        let columns = usize::try_from(params.width).unwrap_or(0);
        let passes = usize::try_from(params.caves_smoothing_passes).unwrap_or(0);
        let total = rows + passes * columns;

        let (phase, completed) = match self.phase {
            Phase::Fill { next_row } => (
                GenerationPhase::Fill,
                usize::try_from(next_row).unwrap_or(0),
            ),
            Phase::Smooth {
                pass, next_column, ..
            } => (
                GenerationPhase::Smooth,
                rows + usize::try_from(pass).unwrap_or(0) * columns
                    + usize::try_from(next_column).unwrap_or(0),
            ),
            Phase::Done => (GenerationPhase::Done, total),
        };

        Progress {
            phase,
            completed,
            total,
        }
    }

    /// Runs any remaining work and hands over the world.
    #[must_use]
    pub fn finish(mut self) -> GeneratedWorld {
        while !self.step(usize::MAX).is_done() {}

        tracing::info!(
            "world generated: {}x{} seed {}",
            self.grid.width(),
            self.grid.height(),
            self.generator.params().seed.value()
        );

        GeneratedWorld {
            grid: self.grid,
            surface_offsets: self.surface_offsets,
        }
    }

    /// Abandons the run, discarding the partial grid.
    pub fn cancel(self) {
        tracing::debug!("generation cancelled at {:?}", self.progress());
    }

    fn fill_row(&mut self, y: i32) {
        let generator = self.generator;
        for (x, &offset) in (0..self.grid.width()).zip(&self.surface_offsets) {
            *self.grid.at_mut(x, y) = generator.fill_cell(x, y, offset, &mut self.rng);
        }
    }

    fn smooth_column(&mut self, x: i32) -> usize {
        let params = self.generator.params();
        let Some(&offset) = usize::try_from(x).ok().and_then(|i| self.surface_offsets.get(i)) else {
            return 0;
        };
        let rows = caves::smoothing_rows(params, offset, self.grid.height());
        caves::smooth_column(&mut self.grid, x, rows, self.generator.secondary)
    }

    fn first_smoothing_phase(&self) -> Phase {
        if self.generator.params().caves_smoothing_passes > 0 {
            Phase::Smooth {
                pass: 0,
                next_column: 0,
                changed: 0,
            }
        } else {
            Phase::Done
        }
    }

    fn end_pass(&self, pass: i32, changed: usize) -> Phase {
        tracing::debug!("smoothing pass {} changed {} cells", pass + 1, changed);

        let passes = self.generator.params().caves_smoothing_passes;
        if pass + 1 >= passes {
            Phase::Done
        } else if changed == 0 {
            // An unchanged grid stays unchanged, remaining passes are no-ops
            tracing::debug!("caves converged after {} passes", pass + 1);
            Phase::Done
        } else {
            Phase::Smooth {
                pass: pass + 1,
                next_column: 0,
                changed: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_noise::{NoiseFieldConfig, NoiseLibrary, WorldSeed};

    fn small_params() -> GenerationParameters {
        GenerationParameters {
            seed: WorldSeed::new(77),
            width: 64,
            height: 48,
            surface_level: 30,
            mountains_level: 40,
            caves_level: 16,
            caves_vertical_size: 12,
            caves_fill_percent: 45.0,
            caves_smoothing_passes: 3,
            noise: NoiseLibrary::new().with_field(
                "surface",
                NoiseFieldConfig::default().with_amplitude(6.0).with_octaves(3),
            ),
            ..GenerationParameters::default()
        }
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(0.5), 0);
        assert_eq!(round_half_even(1.5), 2);
        assert_eq!(round_half_even(2.5), 2);
        assert_eq!(round_half_even(-0.5), 0);
        assert_eq!(round_half_even(-1.5), -2);
        assert_eq!(round_half_even(128.51), 129);
    }

    #[test]
    fn test_clamp_min_first() {
        assert_eq!(clamp_min_first(5, 0, 10), 5);
        assert_eq!(clamp_min_first(-3, 0, 10), 0);
        assert_eq!(clamp_min_first(12, 0, 10), 10);
        // min > max: never panics, min wins for low values
        assert_eq!(clamp_min_first(3, 8, 5), 8);
        assert_eq!(clamp_min_first(9, 8, 5), 5);
    }

    #[test]
    fn test_band_selects_its_rows() {
        let band = CaveBand { lower: 10, upper: 20 };
        assert!(!band.selects(9));
        assert!(band.selects(10));
        assert!(band.selects(19));
        assert!(!band.selects(20));
    }

    #[test]
    fn test_crossed_band_selects_gap() {
        // upper < lower: (y >= lower) == (y < upper) holds between them
        let band = CaveBand { lower: 20, upper: 10 };
        assert!(!band.selects(5));
        assert!(band.selects(10));
        assert!(band.selects(15));
        assert!(band.selects(19));
        assert!(!band.selects(20));
        assert!(!band.selects(25));
    }

    #[test]
    fn test_band_clamped_under_low_surface() {
        let params = GenerationParameters {
            caves_level: 25,
            caves_vertical_size: 10,
            ..GenerationParameters::default()
        };
        // lower = 20, upper = 30 clamped to surface 12 (below lower)
        let band = CaveBand::for_column(&params, 0.0, 12);
        assert_eq!(band, CaveBand { lower: 20, upper: 12 });

        let floor = CaveBand::for_column(
            &GenerationParameters {
                caves_level: 6,
                ..params
            },
            0.0,
            100,
        );
        assert_eq!(floor, CaveBand { lower: 8, upper: 11 });
    }

    #[test]
    fn test_cave_columns() {
        assert!(!cave_column(3, 256));
        assert!(cave_column(4, 256));
        assert!(cave_column(251, 256));
        assert!(!cave_column(252, 256));

        // Width 5: margins overlap, so columns 1..=3 are selected
        let selected: Vec<i32> = (0..5).filter(|&x| cave_column(x, 5)).collect();
        assert_eq!(selected, vec![1, 2, 3]);
    }

    #[test]
    fn test_surface_profile_normalized() {
        let params = GenerationParameters {
            noise: NoiseLibrary::new().with_field("surface", NoiseFieldConfig::default()),
            ..small_params()
        };
        let generator = WorldGenerator::new(params).unwrap();
        let profile = generator.surface_profile().unwrap();

        assert_eq!(profile.len(), 64);
        assert!(profile.iter().all(|v| (-0.25..=1.25).contains(v)));
    }

    #[test]
    fn test_determinism() {
        let generator = WorldGenerator::new(small_params()).unwrap();
        let a = generator.generate().unwrap();
        let b = WorldGenerator::new(small_params()).unwrap().generate().unwrap();
        assert_eq!(a, b, "Same seed and parameters must give the same world");
    }

    #[test]
    fn test_seed_changes_caves() {
        let a = WorldGenerator::new(small_params()).unwrap().generate().unwrap();
        let b = WorldGenerator::new(small_params().with_seed(WorldSeed::new(78)))
            .unwrap()
            .generate()
            .unwrap();
        assert_ne!(a.grid, b.grid);
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let generator = WorldGenerator::new(small_params()).unwrap();
        let expected = generator.generate().unwrap();

        for budget in [1, 7, 64] {
            let mut task = generator.task().unwrap();
            let mut last = 0;
            loop {
                let progress = task.step(budget);
                assert!(progress.completed >= last);
                last = progress.completed;
                if progress.is_done() {
                    break;
                }
            }
            assert_eq!(task.finish(), expected, "budget {budget}");
        }
    }

    #[test]
    fn test_zero_budget_does_nothing() {
        let generator = WorldGenerator::new(small_params()).unwrap();
        let mut task = generator.task().unwrap();
        let before = task.progress();
        assert_eq!(task.step(0), before);
        assert_eq!(before.completed, 0);
        assert_eq!(before.phase, GenerationPhase::Fill);
        task.cancel();
    }

    #[test]
    fn test_no_smoothing_passes() {
        let params = GenerationParameters {
            caves_smoothing_passes: 0,
            ..small_params()
        };
        let generator = WorldGenerator::new(params).unwrap();
        let mut task = generator.task().unwrap();
        let progress = task.step(48);
        assert!(progress.is_done());
        assert_eq!(progress.total, 48);
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = GenerationParameters {
            height: 0,
            ..small_params()
        };
        assert!(WorldGenerator::new(params).is_err());
    }
}
