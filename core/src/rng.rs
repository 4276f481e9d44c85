//! Pluggable randomness shared by the engines.
//!
//! Every engine draws from its own [`GameRng`]. Seeding one makes mine layouts, shuffles, tile
//! spawns and word draws reproducible, which is what the test suites rely on.

use core::ops::Range;
use rand::prelude::*;
use rand::rngs::SmallRng;

#[derive(Clone, Debug)]
pub struct GameRng {
    inner: SmallRng,
    seed: Option<u64>,
}

impl GameRng {
    /// Deterministic stream: the same seed always yields the same games.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: SmallRng::from_entropy(),
            seed: None,
        }
    }

    /// Seeded when `seed` is given, entropy-backed otherwise.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Uniform index in `range`. Panics on an empty range, like `Rng::gen_range`.
    pub fn index(&mut self, range: Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Uniform integer in `range`.
    pub fn range_u32(&mut self, range: Range<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
