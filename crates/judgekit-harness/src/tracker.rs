//! Run-completion token.
//!
//! A grading run is trusted only if every test case that started also
//! returned or unwound normally. [`RunTracker`] counts live cases through
//! [`CaseGuard`]s and, when the run is [finished](RunTracker::finish) with
//! no case still live, writes a secret token file that the checker later
//! verifies. A process that exits or aborts from inside a test body never
//! reaches `finish`, so no token appears.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::error::HarnessError;

/// Result of [`RunTracker::finish`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackerOutcome {
    /// Every case completed; the token was written to `path`.
    Written {
        /// Token file location.
        path: PathBuf,
    },
    /// Some cases were still live; nothing was written.
    Incomplete {
        /// Number of cases that never released their guard.
        live: usize,
    },
    /// The tracker had no configuration.
    Disabled,
}

/// Counts running test cases and writes the completion token.
#[derive(Debug)]
pub struct RunTracker {
    config: Option<TrackerConfig>,
    live: Arc<AtomicUsize>,
    started: AtomicUsize,
    finished: bool,
}

impl RunTracker {
    /// Create a tracker. `None` disables token writing; guards are still
    /// counted.
    pub fn new(config: Option<TrackerConfig>) -> Self {
        match &config {
            Some(c) => log::debug!("run tracker writes {}", c.token_path.display()),
            None => log::debug!("run tracker disabled"),
        }
        Self {
            config,
            live: Arc::new(AtomicUsize::new(0)),
            started: AtomicUsize::new(0),
            finished: false,
        }
    }

    /// Create a tracker from [`TrackerConfig::from_env`].
    pub fn from_env() -> Self {
        Self::new(TrackerConfig::from_env())
    }

    /// Whether a token will be written on a clean finish.
    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Mark a case as running until the returned guard is dropped.
    pub fn enter(&self) -> CaseGuard {
        self.live.fetch_add(1, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::Relaxed);
        CaseGuard {
            live: Arc::clone(&self.live),
        }
    }

    /// Cases currently holding a guard.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Cases entered so far.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::Relaxed)
    }

    /// End the run, writing the token if no case is still live.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Io`] if the token file cannot be written.
    pub fn finish(mut self) -> Result<TrackerOutcome, HarnessError> {
        self.finished = true;
        let Some(config) = self.config.take() else {
            return Ok(TrackerOutcome::Disabled);
        };
        let live = self.live();
        if live > 0 {
            log::warn!("{live} test case(s) still running, completion token withheld");
            return Ok(TrackerOutcome::Incomplete { live });
        }
        fs::write(&config.token_path, config.secret.as_bytes())?;
        log::info!(
            "{} case(s) completed, token written to {}",
            self.started(),
            config.token_path.display()
        );
        Ok(TrackerOutcome::Written {
            path: config.token_path,
        })
    }
}

impl Drop for RunTracker {
    fn drop(&mut self) {
        if !self.finished && self.config.is_some() {
            log::warn!("run tracker dropped without finish, completion token not written");
        }
    }
}

/// Holds one live case open on a [`RunTracker`].
///
/// Released on drop, including while unwinding from a failed assertion.
#[derive(Debug)]
#[must_use = "the case is counted as finished as soon as the guard is dropped"]
pub struct CaseGuard {
    live: Arc<AtomicUsize>,
}

impl Drop for CaseGuard {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_count_live_cases() {
        let t = RunTracker::new(None);
        let a = t.enter();
        let b = t.enter();
        assert_eq!(t.live(), 2);
        drop(a);
        assert_eq!(t.live(), 1);
        drop(b);
        assert_eq!((t.live(), t.started()), (0, 2));
    }

    #[test]
    fn disabled_tracker_writes_nothing() {
        let t = RunTracker::new(None);
        assert!(!t.is_enabled());
        drop(t.enter());
        assert_eq!(t.finish().unwrap(), TrackerOutcome::Disabled);
    }

    #[test]
    fn unwinding_releases_the_guard() {
        let t = RunTracker::new(None);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _case = t.enter();
            panic!("assertion failed in body");
        }));
        assert!(result.is_err());
        assert_eq!(t.live(), 0);
    }
}
