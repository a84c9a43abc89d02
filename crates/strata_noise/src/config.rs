//! # Noise Field Configuration
//!
//! Plain data describing one noise field: its fractal parameters, the
//! algorithm selectors, the output sign filter and one modifier slot per
//! parameter.
//!
//! ## Modifier Slots
//!
//! A slot points (by name) at another field in the same [`NoiseLibrary`].
//! When the slot is active, that field is sampled at the same position and
//! its value is folded into the base parameter with the slot's operator.
//!
//! ```toml
//! [fields.surface]
//! amplitude = 12.0
//! frequency = 6.0
//! octaves = 4
//!
//! [fields.surface.modifiers.amplitude]
//! field = "hills"
//! op = "Multiply"
//! gate = "Neither"
//! ```
//!
//! [`NoiseLibrary`]: crate::NoiseLibrary

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NoiseError, NoiseResult};

/// Noise algorithm (maps to `fastnoise_lite::NoiseType`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseType {
    /// OpenSimplex2.
    #[default]
    OpenSimplex2,
    /// OpenSimplex2 with smoother gradients.
    OpenSimplex2S,
    /// Cellular (Voronoi).
    Cellular,
    /// Classic Perlin.
    Perlin,
    /// Value noise with cubic interpolation.
    ValueCubic,
    /// Value noise.
    Value,
}

impl NoiseType {
    /// Converts to the backend selector.
    #[must_use]
    pub const fn to_fastnoise(self) -> fastnoise_lite::NoiseType {
        match self {
            Self::OpenSimplex2 => fastnoise_lite::NoiseType::OpenSimplex2,
            Self::OpenSimplex2S => fastnoise_lite::NoiseType::OpenSimplex2S,
            Self::Cellular => fastnoise_lite::NoiseType::Cellular,
            Self::Perlin => fastnoise_lite::NoiseType::Perlin,
            Self::ValueCubic => fastnoise_lite::NoiseType::ValueCubic,
            Self::Value => fastnoise_lite::NoiseType::Value,
        }
    }
}

/// Fractal combinator (maps to `fastnoise_lite::FractalType`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FractalType {
    /// Single octave, no fractal combination.
    None,
    /// Fractional Brownian motion.
    #[default]
    FBm,
    /// Ridged multifractal.
    Ridged,
    /// Ping-pong.
    PingPong,
    /// Progressive domain warp.
    DomainWarpProgressive,
    /// Independent domain warp.
    DomainWarpIndependent,
}

impl FractalType {
    /// Converts to the backend selector.
    #[must_use]
    pub const fn to_fastnoise(self) -> fastnoise_lite::FractalType {
        match self {
            Self::None => fastnoise_lite::FractalType::None,
            Self::FBm => fastnoise_lite::FractalType::FBm,
            Self::Ridged => fastnoise_lite::FractalType::Ridged,
            Self::PingPong => fastnoise_lite::FractalType::PingPong,
            Self::DomainWarpProgressive => fastnoise_lite::FractalType::DomainWarpProgressive,
            Self::DomainWarpIndependent => fastnoise_lite::FractalType::DomainWarpIndependent,
        }
    }
}

/// Sign-based filter, named for the values it *excludes*.
///
/// Used both as the output discard policy of a field and as the gate of a
/// modifier slot, with the same sign logic in both places.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignFilter {
    /// Excludes negative values.
    Negative,
    /// Excludes positive values.
    Positive,
    /// Excludes everything.
    Both,
    /// Excludes nothing.
    #[default]
    Neither,
}

impl SignFilter {
    /// Returns true if `value` passes the filter.
    ///
    /// Zero passes only [`SignFilter::Neither`].
    #[inline]
    #[must_use]
    pub fn admits(self, value: f64) -> bool {
        match self {
            Self::Negative => value > 0.0,
            Self::Positive => value < 0.0,
            Self::Both => false,
            Self::Neither => true,
        }
    }

    /// Zeroes `value` unless it passes the filter.
    #[inline]
    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        if self.admits(value) {
            value
        } else {
            0.0
        }
    }
}

/// Arithmetic used to fold a modifier value into a base parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierOp {
    /// `base + modifier`
    #[default]
    Add,
    /// `base - modifier`
    Subtract,
    /// `base * modifier`
    Multiply,
    /// `base / modifier`
    Divide,
}

impl ModifierOp {
    /// Combines floating-point parameters.
    ///
    /// Callers never pass a zero modifier (zero values are skipped before
    /// any operator runs).
    #[inline]
    #[must_use]
    pub fn combine(self, base: f64, modifier: f64) -> f64 {
        match self {
            Self::Add => base + modifier,
            Self::Subtract => base - modifier,
            Self::Multiply => base * modifier,
            Self::Divide => base / modifier,
        }
    }

    /// Combines integer parameters.
    ///
    /// Returns `None` for a zero divisor.
    #[inline]
    #[must_use]
    pub fn combine_int(self, base: i32, modifier: i32) -> Option<i32> {
        match self {
            Self::Add => Some(base.saturating_add(modifier)),
            Self::Subtract => Some(base.saturating_sub(modifier)),
            Self::Multiply => Some(base.saturating_mul(modifier)),
            Self::Divide => base.checked_div(modifier),
        }
    }
}

/// The fractal parameters a modifier slot can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalParameter {
    /// Output multiplier.
    Amplitude,
    /// Base frequency.
    Frequency,
    /// Octave count.
    Octaves,
    /// Frequency multiplier between octaves.
    Lacunarity,
    /// Amplitude multiplier between octaves (gain).
    Persistence,
    /// Octave weighting by previous octave value.
    WeightedStrength,
}

impl FractalParameter {
    /// All parameters, in slot order.
    pub const ALL: [Self; 6] = [
        Self::Amplitude,
        Self::Frequency,
        Self::Octaves,
        Self::Lacunarity,
        Self::Persistence,
        Self::WeightedStrength,
    ];

    /// Snake-case name, as used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Amplitude => "amplitude",
            Self::Frequency => "frequency",
            Self::Octaves => "octaves",
            Self::Lacunarity => "lacunarity",
            Self::Persistence => "persistence",
            Self::WeightedStrength => "weighted_strength",
        }
    }
}

impl fmt::Display for FractalParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One modifier slot.
///
/// A slot without a `field` is a no-op. The default gate is
/// [`SignFilter::Both`], so a slot only takes effect once its gate is
/// opened explicitly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierSlot {
    /// Name of the modifier field in the library.
    pub field: Option<String>,
    /// How the modifier value is folded into the base parameter.
    pub op: ModifierOp,
    /// Which modifier values are allowed through.
    pub gate: SignFilter,
    /// Sample the modifier field without its own amplitude scaling.
    pub ignore_amplitude: bool,
}

impl Default for ModifierSlot {
    fn default() -> Self {
        Self {
            field: None,
            op: ModifierOp::Add,
            gate: SignFilter::Both,
            ignore_amplitude: false,
        }
    }
}

impl ModifierSlot {
    /// Creates an always-applied slot targeting `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, op: ModifierOp) -> Self {
        Self {
            field: Some(field.into()),
            op,
            gate: SignFilter::Neither,
            ignore_amplitude: false,
        }
    }

    /// Sets the gate.
    #[must_use]
    pub fn with_gate(mut self, gate: SignFilter) -> Self {
        self.gate = gate;
        self
    }

    /// Samples the modifier field without its amplitude.
    #[must_use]
    pub fn ignoring_amplitude(mut self) -> Self {
        self.ignore_amplitude = true;
        self
    }

    /// Returns true if a sampled modifier value should be applied.
    #[inline]
    #[must_use]
    pub fn admits(&self, value: f64) -> bool {
        value != 0.0 && self.gate.admits(value)
    }
}

/// The six modifier slots of a field, one per [`FractalParameter`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierSlots {
    /// Amplitude modifier.
    pub amplitude: ModifierSlot,
    /// Frequency modifier.
    pub frequency: ModifierSlot,
    /// Octave modifier.
    pub octaves: ModifierSlot,
    /// Lacunarity modifier.
    pub lacunarity: ModifierSlot,
    /// Persistence modifier.
    pub persistence: ModifierSlot,
    /// Weighted strength modifier.
    pub weighted_strength: ModifierSlot,
}

impl ModifierSlots {
    /// Returns the slot for `parameter`.
    #[must_use]
    pub const fn get(&self, parameter: FractalParameter) -> &ModifierSlot {
        match parameter {
            FractalParameter::Amplitude => &self.amplitude,
            FractalParameter::Frequency => &self.frequency,
            FractalParameter::Octaves => &self.octaves,
            FractalParameter::Lacunarity => &self.lacunarity,
            FractalParameter::Persistence => &self.persistence,
            FractalParameter::WeightedStrength => &self.weighted_strength,
        }
    }

    /// Returns the slot for `parameter`, mutably.
    pub fn get_mut(&mut self, parameter: FractalParameter) -> &mut ModifierSlot {
        match parameter {
            FractalParameter::Amplitude => &mut self.amplitude,
            FractalParameter::Frequency => &mut self.frequency,
            FractalParameter::Octaves => &mut self.octaves,
            FractalParameter::Lacunarity => &mut self.lacunarity,
            FractalParameter::Persistence => &mut self.persistence,
            FractalParameter::WeightedStrength => &mut self.weighted_strength,
        }
    }

    /// Iterates over the slots that reference a field.
    pub fn references(&self) -> impl Iterator<Item = (FractalParameter, &str)> {
        FractalParameter::ALL
            .into_iter()
            .filter_map(|parameter| self.get(parameter).field.as_deref().map(|f| (parameter, f)))
    }
}

/// Configuration of a single noise field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseFieldConfig {
    /// Output multiplier.
    pub amplitude: f64,
    /// Frequency in cycles per 1000 world units.
    pub frequency: f64,
    /// Number of fractal octaves.
    pub octaves: i32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Octave weighting strength.
    pub weighted_strength: f64,
    /// Negate the raw sample.
    pub invert: bool,
    /// Noise algorithm.
    pub noise_type: NoiseType,
    /// Fractal combinator.
    pub fractal_type: FractalType,
    /// Output sign filter.
    pub discard: SignFilter,
    /// Per-parameter modifier slots.
    pub modifiers: ModifierSlots,
}

impl Default for NoiseFieldConfig {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            frequency: 10.0,
            octaves: 1,
            lacunarity: 1.0,
            persistence: 1.0,
            weighted_strength: 1.0,
            invert: false,
            noise_type: NoiseType::OpenSimplex2,
            fractal_type: FractalType::FBm,
            discard: SignFilter::Neither,
            modifiers: ModifierSlots::default(),
        }
    }
}

impl NoiseFieldConfig {
    /// Sets the amplitude.
    #[must_use]
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Sets the frequency (cycles per 1000 units).
    #[must_use]
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the octave count.
    #[must_use]
    pub fn with_octaves(mut self, octaves: i32) -> Self {
        self.octaves = octaves;
        self
    }

    /// Sets the noise algorithm.
    #[must_use]
    pub fn with_noise_type(mut self, noise_type: NoiseType) -> Self {
        self.noise_type = noise_type;
        self
    }

    /// Sets the output sign filter.
    #[must_use]
    pub fn with_discard(mut self, discard: SignFilter) -> Self {
        self.discard = discard;
        self
    }

    /// Negates the raw sample.
    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Installs a modifier slot.
    #[must_use]
    pub fn with_modifier(mut self, parameter: FractalParameter, slot: ModifierSlot) -> Self {
        *self.modifiers.get_mut(parameter) = slot;
        self
    }

    /// Base value of a floating-point parameter.
    ///
    /// Octaves are reported as a float for uniform handling.
    #[must_use]
    pub fn base(&self, parameter: FractalParameter) -> f64 {
        match parameter {
            FractalParameter::Amplitude => self.amplitude,
            FractalParameter::Frequency => self.frequency,
            FractalParameter::Octaves => f64::from(self.octaves),
            FractalParameter::Lacunarity => self.lacunarity,
            FractalParameter::Persistence => self.persistence,
            FractalParameter::WeightedStrength => self.weighted_strength,
        }
    }

    /// Checks the base parameters of this field.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::InvalidParameter`] if frequency is not
    /// positive, octaves is below one, or any float is not finite.
    pub fn validate(&self, name: &str) -> NoiseResult<()> {
        let invalid = |parameter, reason: String| NoiseError::InvalidParameter {
            field: name.to_owned(),
            parameter,
            reason,
        };

        for parameter in FractalParameter::ALL {
            let value = self.base(parameter);
            if !value.is_finite() {
                return Err(invalid(parameter, format!("{value} is not finite")));
            }
        }
        if self.frequency <= 0.0 {
            return Err(invalid(
                FractalParameter::Frequency,
                format!("must be positive, got {}", self.frequency),
            ));
        }
        if self.octaves < 1 {
            return Err(invalid(
                FractalParameter::Octaves,
                format!("must be at least 1, got {}", self.octaves),
            ));
        }
        Ok(())
    }
}
