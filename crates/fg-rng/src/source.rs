//! Random source capability
//!
//! The selector and the pool builder receive their randomness through
//! [`RandomSource`] at construction instead of reaching for a thread-local
//! generator.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Uniform integer source.
pub trait RandomSource {
    /// Uniform integer in `0..upper`. `upper` must be non-zero.
    fn below(&mut self, upper: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn below(&mut self, upper: usize) -> usize {
        (**self).below(upper)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn below(&mut self, upper: usize) -> usize {
        (**self).below(upper)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CHACHA SOURCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Default source backed by ChaCha8.
///
/// Unseeded instances draw their key from the OS; seeded instances replay the
/// same sequence on every platform.
#[derive(Debug, Clone)]
pub struct ChaChaSource {
    rng: ChaCha8Rng,
}

impl ChaChaSource {
    /// Non-deterministic source seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Deterministic source from a numeric seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Deterministic source keyed by a string label
    pub fn from_label(label: &str) -> Self {
        Self::from_seed(seed_from_label(label))
    }
}

impl Default for ChaChaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ChaChaSource {
    fn below(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }
}

/// FNV-1a hash of a label, used to key seeded sources.
pub fn seed_from_label(label: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    label.bytes().fold(OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// FIXED SEQUENCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Replays a fixed list of values, cycling when exhausted.
///
/// Each value is reduced modulo the requested bound, so `FixedSequence::new([0])`
/// always answers the lowest index.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<usize>,
    cursor: usize,
}

impl FixedSequence {
    pub fn new(values: impl IntoIterator<Item = usize>) -> Self {
        let values: Vec<usize> = values.into_iter().collect();
        Self {
            values: if values.is_empty() { vec![0] } else { values },
            cursor: 0,
        }
    }

    /// Number of values handed out so far
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedSequence {
    fn below(&mut self, upper: usize) -> usize {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value % upper
    }
}
