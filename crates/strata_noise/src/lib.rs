//! # STRATA Noise
//!
//! Seeded, continuous scalar fields over 2D space whose fractal parameters
//! are themselves modulated by other fields.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: a sample depends only on field, position and seed
//! 2. **Stateless**: every sample builds its own generator
//! 3. **Validated**: unknown references and cycles are rejected before sampling
//!
//! ## Core Components
//!
//! - `NoiseFieldConfig`: fractal parameters, sign filter, modifier slots
//! - `NoiseLibrary`: named fields and graph validation
//! - `NoiseField`: sampling handle with recursive modifier resolution
//! - `WorldSeed`: the run's seed
//!
//! ## Example
//!
//! ```rust
//! use strata_noise::{
//!     FractalParameter, ModifierOp, ModifierSlot, NoiseFieldConfig, NoiseLibrary, WorldSeed,
//! };
//!
//! let library = NoiseLibrary::new()
//!     .with_field(
//!         "surface",
//!         NoiseFieldConfig::default().with_modifier(
//!             FractalParameter::Amplitude,
//!             ModifierSlot::new("hills", ModifierOp::Multiply),
//!         ),
//!     )
//!     .with_field("hills", NoiseFieldConfig::default().with_amplitude(8.0));
//!
//! let surface = library.field("surface").unwrap();
//! let value = surface.sample(12.0, 0.0, WorldSeed::new(42), false).unwrap();
//! assert!(value.is_finite());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod field;
pub mod library;
pub mod seed;

pub use config::{
    FractalParameter, FractalType, ModifierOp, ModifierSlot, ModifierSlots, NoiseFieldConfig,
    NoiseType, SignFilter,
};
pub use error::{NoiseError, NoiseResult};
pub use field::{FractalParams, NoiseField, FREQUENCY_SCALE, MAX_MODIFIER_DEPTH};
pub use library::NoiseLibrary;
pub use seed::WorldSeed;
