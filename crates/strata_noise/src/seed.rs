//! World seed shared by noise sampling and cave seeding.

use serde::{Deserialize, Serialize};

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(i64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Seed handed to the noise backend, which only takes 32 bits.
    ///
    /// Seeds inside the `i32` range pass through unchanged; wider seeds fold
    /// their high half into the low half.
    #[inline]
    #[must_use]
    pub fn noise_seed(self) -> i32 {
        i32::try_from(self.0).unwrap_or_else(|_| {
            let bits = self.0 as u64;
            ((bits ^ (bits >> 32)) as u32) as i32
        })
    }

    /// Seed for the cave-seeding random stream.
    #[inline]
    #[must_use]
    pub const fn rng_seed(self) -> u64 {
        self.0 as u64
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(1234)
    }
}

impl From<i64> for WorldSeed {
    fn from(seed: i64) -> Self {
        Self(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_seeds_pass_through() {
        assert_eq!(WorldSeed::new(1234).noise_seed(), 1234);
        assert_eq!(WorldSeed::new(-1).noise_seed(), -1);
        assert_eq!(WorldSeed::new(i64::from(i32::MIN)).noise_seed(), i32::MIN);
    }

    #[test]
    fn test_wide_seeds_fold() {
        let wide = WorldSeed::new(0x0000_0001_0000_0002);
        assert_eq!(wide.noise_seed(), 3);

        // Distinct high halves must not collapse onto the same noise seed
        let a = WorldSeed::new(0x0000_0005_0000_0000).noise_seed();
        let b = WorldSeed::new(0x0000_0007_0000_0000).noise_seed();
        assert_ne!(a, b);
    }
}
