//! # Noise Field Sampling
//!
//! Evaluates a field at a 2D position. Each sample:
//!
//! 1. Resolves the effective fractal parameters, sampling modifier fields
//!    recursively at the same position and seed
//! 2. Builds a fresh FastNoise Lite generator from those parameters
//! 3. Samples it, applies `invert` and the output sign filter
//! 4. Scales by the effective amplitude unless asked not to
//!
//! Nothing is cached and no generator state survives between samples, so a
//! sample is a pure function of `(field, position, seed, ignore_amplitude)`.

use fastnoise_lite::FastNoiseLite;

use crate::config::{FractalParameter, NoiseFieldConfig};
use crate::error::{NoiseError, NoiseResult};
use crate::library::NoiseLibrary;
use crate::seed::WorldSeed;

/// Maximum modifier nesting depth during evaluation.
///
/// Validated libraries are acyclic, so this only trips on absurdly deep
/// chains or on handles built without validation.
pub const MAX_MODIFIER_DEPTH: usize = 64;

/// Base `frequency` is given in cycles per this many world units.
pub const FREQUENCY_SCALE: f64 = 1000.0;

/// Effective fractal parameters at one sample position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalParams {
    /// Output multiplier.
    pub amplitude: f64,
    /// Frequency in cycles per [`FREQUENCY_SCALE`] units.
    pub frequency: f64,
    /// Octave count.
    pub octaves: i32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Octave weighting strength.
    pub weighted_strength: f64,
}

impl FractalParams {
    /// Unmodified parameters of `config`.
    #[must_use]
    pub fn base(config: &NoiseFieldConfig) -> Self {
        Self {
            amplitude: config.amplitude,
            frequency: config.frequency,
            octaves: config.octaves,
            lacunarity: config.lacunarity,
            persistence: config.persistence,
            weighted_strength: config.weighted_strength,
        }
    }

    /// Frequency as the backend expects it (cycles per world unit).
    #[inline]
    #[must_use]
    pub fn backend_frequency(&self) -> f64 {
        self.frequency / FREQUENCY_SCALE
    }

    /// Builds a generator for these parameters.
    #[allow(clippy::cast_possible_truncation)]
    fn generator(&self, config: &NoiseFieldConfig, seed: WorldSeed) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(seed.noise_seed());
        noise.set_noise_type(Some(config.noise_type.to_fastnoise()));
        noise.set_fractal_type(Some(config.fractal_type.to_fastnoise()));
        noise.set_frequency(Some(self.backend_frequency() as f32));
        noise.set_fractal_octaves(Some(self.octaves));
        noise.set_fractal_lacunarity(Some(self.lacunarity as f32));
        noise.set_fractal_gain(Some(self.persistence as f32));
        noise.set_fractal_weighted_strength(Some(self.weighted_strength as f32));
        noise
    }
}

/// A sampling handle for one field of a [`NoiseLibrary`].
///
/// Obtained from [`NoiseLibrary::field`], which validates the reachable
/// modifier graph first.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField<'a> {
    library: &'a NoiseLibrary,
    name: &'a str,
    config: &'a NoiseFieldConfig,
}

impl<'a> NoiseField<'a> {
    pub(crate) const fn new(
        library: &'a NoiseLibrary,
        name: &'a str,
        config: &'a NoiseFieldConfig,
    ) -> Self {
        Self {
            library,
            name,
            config,
        }
    }

    /// The field's name in its library.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The field's configuration.
    #[must_use]
    pub const fn config(&self) -> &'a NoiseFieldConfig {
        self.config
    }

    /// Samples the field at `(x, y)`.
    ///
    /// # Returns
    ///
    /// A value nominally in [-1, 1] times the effective amplitude, or the
    /// unscaled value when `ignore_amplitude` is set.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::ZeroDivisor`] if an octave modifier divides by
    /// a value that truncates to zero, [`NoiseError::InvalidParameter`] if a
    /// modified parameter leaves its domain (octaves below one, or a float
    /// that is not finite as `f32`), or [`NoiseError::DepthExceeded`] if
    /// modifier nesting is deeper than [`MAX_MODIFIER_DEPTH`].
    pub fn sample(&self, x: f64, y: f64, seed: WorldSeed, ignore_amplitude: bool) -> NoiseResult<f64> {
        self.sample_at_depth(x, y, seed, ignore_amplitude, 0)
    }

    /// Resolves the effective fractal parameters at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Same as [`sample`](Self::sample).
    pub fn resolve(&self, x: f64, y: f64, seed: WorldSeed) -> NoiseResult<FractalParams> {
        self.resolve_at_depth(x, y, seed, 0)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn sample_at_depth(
        &self,
        x: f64,
        y: f64,
        seed: WorldSeed,
        ignore_amplitude: bool,
        depth: usize,
    ) -> NoiseResult<f64> {
        if depth > MAX_MODIFIER_DEPTH {
            return Err(NoiseError::DepthExceeded {
                field: self.name.to_owned(),
                limit: MAX_MODIFIER_DEPTH,
            });
        }

        let params = self.resolve_at_depth(x, y, seed, depth)?;
        let noise = params.generator(self.config, seed);

        let mut raw = f64::from(noise.get_noise_2d(x as f32, y as f32));
        if self.config.invert {
            raw = -raw;
        }
        let raw = self.config.discard.apply(raw);

        Ok(if ignore_amplitude {
            raw
        } else {
            raw * params.amplitude
        })
    }

    fn resolve_at_depth(
        &self,
        x: f64,
        y: f64,
        seed: WorldSeed,
        depth: usize,
    ) -> NoiseResult<FractalParams> {
        let mut params = FractalParams::base(self.config);

        params.amplitude = self.resolve_float(FractalParameter::Amplitude, x, y, seed, depth)?;
        params.frequency = self.resolve_float(FractalParameter::Frequency, x, y, seed, depth)?;
        params.lacunarity = self.resolve_float(FractalParameter::Lacunarity, x, y, seed, depth)?;
        params.persistence = self.resolve_float(FractalParameter::Persistence, x, y, seed, depth)?;
        params.weighted_strength =
            self.resolve_float(FractalParameter::WeightedStrength, x, y, seed, depth)?;

        // Octaves are integral: the modifier is truncated toward zero first
        let slot = &self.config.modifiers.octaves;
        if let Some(modifier) = self.modifier(FractalParameter::Octaves, x, y, seed, depth)? {
            #[allow(clippy::cast_possible_truncation)]
            let modifier = modifier.trunc() as i32;
            params.octaves = slot.op.combine_int(self.config.octaves, modifier).ok_or_else(|| {
                NoiseError::ZeroDivisor {
                    field: self.name.to_owned(),
                    parameter: FractalParameter::Octaves,
                }
            })?;
            if params.octaves < 1 {
                return Err(self.invalid(
                    FractalParameter::Octaves,
                    format!("resolved to {} octaves", params.octaves),
                ));
            }
        }

        Ok(params)
    }

    fn resolve_float(
        &self,
        parameter: FractalParameter,
        x: f64,
        y: f64,
        seed: WorldSeed,
        depth: usize,
    ) -> NoiseResult<f64> {
        let base = self.config.base(parameter);
        let value = match self.modifier(parameter, x, y, seed, depth)? {
            Some(modifier) => self.config.modifiers.get(parameter).op.combine(base, modifier),
            None => base,
        };

        // The backend takes f32, so the value must survive the narrowing too
        #[allow(clippy::cast_possible_truncation)]
        let narrowed = value as f32;
        if !value.is_finite() || !narrowed.is_finite() {
            return Err(self.invalid(parameter, format!("resolved to non-finite value {value}")));
        }
        Ok(value)
    }

    fn invalid(&self, parameter: FractalParameter, reason: String) -> NoiseError {
        NoiseError::InvalidParameter {
            field: self.name.to_owned(),
            parameter,
            reason,
        }
    }

    /// Samples the slot for `parameter`.
    ///
    /// Returns `None` when the slot is empty, the value is zero, or the
    /// gate rejects it.
    fn modifier(
        &self,
        parameter: FractalParameter,
        x: f64,
        y: f64,
        seed: WorldSeed,
        depth: usize,
    ) -> NoiseResult<Option<f64>> {
        let slot = self.config.modifiers.get(parameter);
        let Some(target) = slot.field.as_deref() else {
            return Ok(None);
        };

        let field = self.library.field_unchecked(target)?;
        let value = field.sample_at_depth(x, y, seed, slot.ignore_amplitude, depth + 1)?;

        Ok(slot.admits(value).then_some(value))
    }
}
