//! Per-run test context.
//!
//! A [`TestContext`] owns the seeded generator of one test run. Test bodies
//! draw their inputs from it and hand data to the solution under test
//! through the `ro_*` helpers, which copy into protected buffers seeded
//! from the same stream.

use judgekit_guard::{run_on_ro_array, run_on_ro_matrix, run_on_ro_string, RoMatrix, RoString};
use judgekit_random::TestRng;

/// State passed to a test body on every run.
#[derive(Clone, Debug)]
pub struct TestContext {
    rng: TestRng,
}

impl TestContext {
    /// Create a context seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: TestRng::new(seed),
        }
    }

    /// Restart the generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    /// The seeded generator.
    pub fn rng(&mut self) -> &mut TestRng {
        &mut self.rng
    }

    /// Run `f` on a write-protected copy of `data`.
    ///
    /// Aborts the process if protected memory cannot be set up.
    pub fn ro_array<T, F, O>(&mut self, data: &[T], f: F) -> O
    where
        T: Copy,
        F: FnOnce(&[T]) -> O,
    {
        run_on_ro_array(data, &mut self.rng, f)
    }

    /// Run `f` on a write-protected copy of a rectangular table.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is empty or ragged.
    pub fn ro_matrix<T, Row, F, O>(&mut self, rows: &[Row], f: F) -> O
    where
        T: Copy,
        Row: AsRef<[T]>,
        F: FnOnce(&RoMatrix<T>) -> O,
    {
        run_on_ro_matrix(rows, &mut self.rng, f)
    }

    /// Run `f` on a write-protected, NUL-terminated copy of `text`.
    pub fn ro_string<F, O>(&mut self, text: impl AsRef<[u8]>, f: F) -> O
    where
        F: FnOnce(&RoString) -> O,
    {
        run_on_ro_string(text, &mut self.rng, f)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new(TestRng::DEFAULT_SEED)
    }
}
