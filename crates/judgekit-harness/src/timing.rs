//! Time budgets and relative-speed checks.
//!
//! [`run_with_timeout`] runs a closure on a detached worker thread and
//! waits for its result on a one-slot channel. A worker that overruns its
//! budget is abandoned, not killed: the caller gets
//! [`HarnessError::TimedOut`] and the worker keeps running until it
//! returns or the process exits.

use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;

use crate::error::HarnessError;

/// Factor used by [`assert_not_slower`] when the caller has no opinion.
pub const DEFAULT_TIME_FACTOR: f64 = 2.0;

/// Run `f` on a worker thread and wait at most `timeout` for it.
///
/// A panic inside `f` is resumed on the calling thread, so assertion
/// failures in the body surface as ordinary test failures.
///
/// # Errors
///
/// [`HarnessError::TimedOut`] if `f` has not returned after `timeout`,
/// [`HarnessError::Io`] if the worker thread cannot be spawned.
pub fn run_with_timeout<F, O>(timeout: Duration, f: F) -> Result<O, HarnessError>
where
    F: FnOnce() -> O + Send + 'static,
    O: Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name("judgekit-watched".into())
        .spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(f));
            // The receiver is gone once the caller has given up.
            let _ = tx.send(outcome);
        })?;

    match rx.recv_timeout(timeout) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(payload)) => panic::resume_unwind(payload),
        Err(RecvTimeoutError::Timeout) => {
            log::warn!("watched run exceeded {} ms", timeout.as_millis());
            Err(HarnessError::TimedOut { timeout })
        }
        Err(RecvTimeoutError::Disconnected) => {
            panic!("watched worker exited without reporting a result")
        }
    }
}

/// Like [`run_with_timeout`], but a timeout fails the test.
///
/// # Panics
///
/// Panics with `timed out (> N milliseconds).` when the budget is exceeded.
pub fn assert_completes_within<F, O>(timeout: Duration, f: F) -> O
where
    F: FnOnce() -> O + Send + 'static,
    O: Send + 'static,
{
    match run_with_timeout(timeout, f) {
        Ok(value) => value,
        Err(e) => panic!("{e}"),
    }
}

/// Run `f` and report how long it took.
pub fn measure<F, O>(f: F) -> (O, Duration)
where
    F: FnOnce() -> O,
{
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Whether `candidate` stays under `factor` times `reference`.
///
/// One microsecond is added to the reference so a reference that rounds
/// to zero still leaves the candidate a non-zero allowance.
pub fn duration_within(reference: Duration, candidate: Duration, factor: f64) -> bool {
    let reference_us = reference.as_micros() as f64;
    let candidate_us = candidate.as_micros() as f64;
    factor * (1.0 + reference_us) > candidate_us
}

/// Fail unless `candidate` stays under `factor` times `reference`.
///
/// # Panics
///
/// Panics with a `Time limit exceeded` report naming both durations.
#[track_caller]
pub fn assert_duration_within(reference: Duration, candidate: Duration, factor: f64) {
    if !duration_within(reference, candidate, factor) {
        panic!(
            "Time limit exceeded.\n\tUser time: {}\n\tAuthor time: {}",
            candidate.as_micros(),
            reference.as_micros()
        );
    }
}

/// Time `reference` and then `candidate`, and fail if the candidate is
/// more than `factor` times slower.
///
/// Returns both results so the caller can compare them.
#[track_caller]
pub fn assert_not_slower<A, B, RA, RB>(reference: A, candidate: B, factor: f64) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    let (expected, reference_time) = measure(reference);
    let (actual, candidate_time) = measure(candidate);
    log::debug!(
        "reference {} us, candidate {} us",
        reference_time.as_micros(),
        candidate_time.as_micros()
    );
    assert_duration_within(reference_time, candidate_time, factor);
    (expected, actual)
}
