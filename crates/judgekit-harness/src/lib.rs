//! Test-driving harness for judgekit suites.
//!
//! Grading suites write each test as a body over a [`TestContext`]. The
//! [`SafeTest`] driver runs the body on a watched thread under a time
//! budget, repeats it with the same seed, and counts the case on a
//! [`RunTracker`] so the run can prove it finished. Scored assignments
//! register their cases on a [`Tester`], which picks the public or private
//! pass from the contest input file and writes the secret and score the
//! checker verifies. The remaining modules hold the assertions test bodies
//! use: panics, relative timing, and floating-point tolerance.
//!
//! # Example
//!
//! ```no_run
//! use judgekit_harness::{RunTracker, SafeTest};
//!
//! let tracker = RunTracker::from_env();
//! SafeTest::new("reverse").tracker(&tracker).run(|ctx| {
//!     let text = ctx.rng().random_string(32);
//!     let expected: String = text.chars().rev().collect();
//!     ctx.ro_string(&text, |s| {
//!         let got: String = s.to_str().unwrap_or_default().chars().rev().collect();
//!         assert_eq!(got, expected);
//!     });
//! });
//! tracker.finish().expect("token file not writable");
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod numeric;
pub mod panics;
pub mod report;
pub mod tester;
pub mod timing;
pub mod tracker;

pub use config::{SafeTestConfig, TrackerConfig};
pub use context::TestContext;
pub use error::HarnessError;
pub use numeric::{
    format_grid, format_list, get_by_module, relative_difference, sequence, sorted, unique,
};
pub use panics::{
    catch_panic, expect_panic_message, expect_panic_payload, panic_message, PanicPayload,
};
pub use report::{
    contest_output, round_score, CaseReport, CaseVerdict, SuiteReport, TestKind, TestingReport,
};
pub use safe_test::SafeTest;
pub use tester::{ContestIo, ContestSecrets, TestCase, TestMode, Tester};
pub use timing::{
    assert_completes_within, assert_duration_within, assert_not_slower, duration_within, measure,
    run_with_timeout, DEFAULT_TIME_FACTOR,
};
pub use tracker::{CaseGuard, RunTracker, TrackerOutcome};
