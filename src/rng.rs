//! Explicit, forkable randomness context.
//!
//! All stochastic decisions in the pipeline flow through an [`RngStream`]
//! seeded once per run. Sub-streams are derived from the run seed plus a
//! stable stream index, so per-row/per-column/per-zone work can be executed
//! in any order (including in parallel) and still reproduce byte-identical
//! output. ChaCha8 is used because its stream is portable and stable across
//! `rand` releases, which the determinism guarantee depends on.

use rand::{Rng as _, SeedableRng as _};
use rand_chacha::ChaCha8Rng;

pub struct RngStream {
    seed: u64,
    rng: ChaCha8Rng,
}

impl RngStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Derive an independent sub-stream for a stable index (stage, row,
    /// column, zone...). Forking does not consume state from `self`.
    pub fn fork(&self, stream: u64) -> Self {
        Self::new(mix(self.seed, stream))
    }

    /// Uniform integer in `lo..=hi`. `lo > hi` is a caller bug.
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo <= hi);
        self.rng.gen_range(lo..=hi)
    }

    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        debug_assert!(lo <= hi);
        self.rng.gen_range(lo..=hi)
    }

    pub fn range_usize(&mut self, lo: usize, hi: usize) -> usize {
        debug_assert!(lo <= hi);
        self.rng.gen_range(lo..=hi)
    }

    /// Uniform float in `[lo, hi)`.
    pub fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform pick from a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        debug_assert!(!items.is_empty());
        &items[self.rng.gen_range(0..items.len())]
    }
}

fn mix(seed: u64, stream: u64) -> u64 {
    splitmix64(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
