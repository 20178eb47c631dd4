//! The seeded generator used by test contexts.
//!
//! [`TestRng`] wraps a ChaCha8 stream seeded from a single `u64`. It
//! implements [`RandomSource`] for the padding fill of protected buffers
//! and offers the typed generators test bodies use to build inputs.

use std::ops::RangeInclusive;

use rand::distr::uniform::SampleUniform;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::RandomSource;

/// Deterministic generator for test data.
///
/// Range arguments are inclusive on both ends, and every range generator
/// panics when `min > max`.
#[derive(Clone, Debug)]
pub struct TestRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl TestRng {
    /// Seed used when a test does not pick its own.
    pub const DEFAULT_SEED: u64 = 12_345_678;

    /// Create a generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Restart the stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.inner = ChaCha8Rng::seed_from_u64(seed);
        self.seed = seed;
    }

    /// The seed of the current stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform `u64` in `[min, max]`.
    pub fn urandom64(&mut self, min: u64, max: u64) -> u64 {
        self.inner.random_range(min..=max)
    }

    /// Uniform `i64` in `[min, max]`.
    pub fn srandom64(&mut self, min: i64, max: i64) -> i64 {
        self.inner.random_range(min..=max)
    }

    /// Uniform `u32` in `[min, max]`.
    pub fn urandom32(&mut self, min: u32, max: u32) -> u32 {
        self.inner.random_range(min..=max)
    }

    /// Uniform `i32` in `[min, max]`.
    pub fn srandom32(&mut self, min: i32, max: i32) -> i32 {
        self.inner.random_range(min..=max)
    }

    /// `n` values drawn uniformly from `range`.
    pub fn array<T>(&mut self, n: usize, range: RangeInclusive<T>) -> Vec<T>
    where
        T: SampleUniform + PartialOrd + Clone,
    {
        (0..n)
            .map(|_| self.inner.random_range(range.clone()))
            .collect()
    }

    /// `n` signed 32-bit values in `[min, max]`.
    pub fn random_i32_array(&mut self, n: usize, min: i32, max: i32) -> Vec<i32> {
        self.array(n, min..=max)
    }

    /// `n` unsigned 32-bit values in `[min, max]`.
    pub fn random_u32_array(&mut self, n: usize, min: u32, max: u32) -> Vec<u32> {
        self.array(n, min..=max)
    }

    /// `n` signed 64-bit values in `[min, max]`.
    ///
    /// Suites that do not care about magnitude conventionally pass the
    /// `i32` range here, so sums of a few elements cannot overflow.
    pub fn random_i64_array(&mut self, n: usize, min: i64, max: i64) -> Vec<i64> {
        self.array(n, min..=max)
    }

    /// `n` unsigned 64-bit values in `[min, max]`.
    pub fn random_u64_array(&mut self, n: usize, min: u64, max: u64) -> Vec<u64> {
        self.array(n, min..=max)
    }

    /// `n` raw bytes in `[min, max]`.
    pub fn random_bytes(&mut self, n: usize, min: u8, max: u8) -> Vec<u8> {
        self.array(n, min..=max)
    }

    /// `n` ASCII characters in `1..=127` (never NUL).
    pub fn random_string(&mut self, n: usize) -> String {
        self.random_string_in(n, 1..=127)
    }

    /// `n` characters with byte values in `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is empty or reaches past `0x7F`, since the result
    /// must stay single-byte UTF-8.
    pub fn random_string_in(&mut self, n: usize, range: RangeInclusive<u8>) -> String {
        assert!(
            !range.is_empty() && *range.end() <= 0x7F,
            "string range {range:?} is not a non-empty ASCII range"
        );
        (0..n)
            .map(|_| char::from(self.inner.random_range(range.clone())))
            .collect()
    }
}

impl Default for TestRng {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl RandomSource for TestRng {
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}
