//! Injectable randomness shared by generation, population and combat.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::IntRange;

/// Capability that produces uniform integers within an inclusive range.
pub trait RandomSource {
    /// Draws a value uniformly from `range`.
    ///
    /// Degenerate or inverted ranges yield their lower bound.
    fn roll(&mut self, range: IntRange) -> u32;
}

/// Deterministic source backed by a seeded ChaCha stream.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a source whose sequence is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn roll(&mut self, range: IntRange) -> u32 {
        if range.min() >= range.max() {
            return range.min();
        }
        self.rng.gen_range(range.min()..=range.max())
    }
}

/// Source that replays a fixed list of values.
///
/// Each roll consumes the next queued value clamped into the requested
/// range. Once the queue is exhausted every roll yields the range minimum.
#[cfg(any(test, feature = "scripted_random"))]
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: std::collections::VecDeque<u32>,
}

#[cfg(any(test, feature = "scripted_random"))]
impl ScriptedRandom {
    /// Creates a source that yields `values` in order.
    #[must_use]
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Number of queued values not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

#[cfg(any(test, feature = "scripted_random"))]
impl RandomSource for ScriptedRandom {
    fn roll(&mut self, range: IntRange) -> u32 {
        if range.is_inverted() {
            return range.min();
        }
        match self.values.pop_front() {
            Some(value) => value.clamp(range.min(), range.max()),
            None => range.min(),
        }
    }
}
