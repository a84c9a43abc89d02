//! # STRATA World Generation
//!
//! Seeded 2D side-view terrain: a noise-driven surface, layered rock and
//! cellular-automaton caves.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed + parameters = bit-identical grid
//! 2. **Fail fast**: parameters and noise graphs are validated before any
//!    cell is written
//! 3. **All or nothing**: a partial world is never handed out
//!
//! ## Core Components
//!
//! - `GenerationParameters`: TOML-loadable run configuration
//! - `WorldGenerator`: surface profile, column fill, cave seeding
//! - `GenerationTask`: the same run in bounded steps
//! - `WorldGrid`: dense cell storage with checked access
//! - `caves`: in-place smoothing passes
//! - `preview`: noise maps, surface lines, ASCII, stats
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_worldgen::{GenerationParameters, WorldGenerator};
//!
//! let params = GenerationParameters::load("world.toml")?;
//! let world = WorldGenerator::new(params)?.generate()?;
//! println!("{}", strata_worldgen::preview::GridStats::collect(&world.grid));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod caves;
pub mod error;
pub mod generator;
pub mod grid;
pub mod params;
pub mod preview;

pub use error::{WorldGenError, WorldGenResult};
pub use generator::{
    GeneratedWorld, GenerationPhase, GenerationTask, Progress, WorldGenerator,
};
pub use grid::{BlockId, Cell, WorldGrid};
pub use params::GenerationParameters;
