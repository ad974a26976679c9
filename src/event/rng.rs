//! Deterministic RNG for event scheduling.
//!
//! Uses xorshift64* for speed and stable output across platforms, so a
//! seeded run replays the exact same trigger times. Not cryptographically
//! secure and must never be used for secrets.

use serde::{Deserialize, Serialize};

/// Deterministic RNG with a single 64-bit state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRng {
    state: u64,
}

impl EventRng {
    /// Create a new RNG. A zero seed is remapped to a non-zero constant to
    /// avoid the xorshift lockup state.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let s = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: s }
    }

    /// Next 64-bit value from xorshift64*.
    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform sample in `[0, 1)` built from the top 53 bits.
    #[inline(always)]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Exponentially distributed sample with the given rate, by inverse
    /// CDF. Gaps drawn this way compose into a Poisson process.
    #[inline]
    pub fn exp_sample(&mut self, rate: f64) -> f64 {
        debug_assert!(rate > 0.0);
        -(1.0 - self.next_f64()).ln() / rate
    }
}
