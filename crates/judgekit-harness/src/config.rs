//! Safe-test and run-tracker configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use judgekit_random::TestRng;

// ── SafeTestConfig ─────────────────────────────────────────────────

/// How a [`SafeTest`](crate::SafeTest) drives its body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeTestConfig {
    /// Budget for the first, watched run. Default: 30 s.
    pub timeout: Duration,
    /// Extra runs on the calling thread after the watched run. Default: 2.
    pub iterations: u32,
    /// Seed the context is reset to before every run. Default: 12345678.
    pub seed: u64,
}

impl SafeTestConfig {
    /// Default budget for the watched run.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default number of unwatched iterations.
    pub const DEFAULT_ITERATIONS: u32 = 2;

    /// Defaults for suites that compare a hand-written implementation with
    /// a wrapped one: three iterations instead of two.
    pub fn asm() -> Self {
        Self {
            iterations: 3,
            ..Self::default()
        }
    }

    /// Set the watched-run budget.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the watched-run budget in milliseconds.
    pub fn timeout_ms(self, millis: u64) -> Self {
        self.timeout(Duration::from_millis(millis))
    }

    /// Set the number of unwatched iterations.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for SafeTestConfig {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            iterations: Self::DEFAULT_ITERATIONS,
            seed: TestRng::DEFAULT_SEED,
        }
    }
}

// ── TrackerConfig ──────────────────────────────────────────────────

/// Where the run tracker writes its token, and what it writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    /// File created when the run completes cleanly.
    pub token_path: PathBuf,
    /// Content written to the token file.
    pub secret: String,
}

impl TrackerConfig {
    /// Variable naming the token file. Unset disables tracking.
    pub const PATH_VAR: &'static str = "JUDGEKIT_TOKEN_PATH";

    /// Variable holding the token content.
    pub const SECRET_VAR: &'static str = "JUDGEKIT_TOKEN_SECRET";

    /// Create a config.
    pub fn new(token_path: impl Into<PathBuf>, secret: impl Into<String>) -> Self {
        Self {
            token_path: token_path.into(),
            secret: secret.into(),
        }
    }

    /// Read the config from [`PATH_VAR`](Self::PATH_VAR) and
    /// [`SECRET_VAR`](Self::SECRET_VAR).
    ///
    /// Returns `None` when the path variable is unset or empty. A missing
    /// secret becomes an empty token.
    pub fn from_env() -> Option<Self> {
        let path = env::var_os(Self::PATH_VAR).filter(|p| !p.is_empty())?;
        let secret = env::var(Self::SECRET_VAR).unwrap_or_default();
        Some(Self::new(path, secret))
    }
}
