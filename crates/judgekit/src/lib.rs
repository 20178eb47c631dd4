//! judgekit: a grading harness for programming-assignment test suites.
//!
//! This is the facade crate that re-exports the public API of the judgekit
//! sub-crates. Test suites normally depend on `judgekit` alone.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use judgekit::prelude::*;
//!
//! // The solution under test.
//! fn count_zeros(values: &[i32]) -> usize {
//!     values.iter().filter(|&&v| v == 0).count()
//! }
//!
//! let tracker = RunTracker::from_env();
//! SafeTest::new("count_zeros")
//!     .config(SafeTestConfig::default().timeout_ms(1_000))
//!     .tracker(&tracker)
//!     .run(|ctx| {
//!         let data = ctx.rng().random_i32_array(10_000, -3, 3);
//!         let expected = data.iter().filter(|&&v| v == 0).count();
//!         // The solution sees a read-only copy; writing to it faults.
//!         assert_eq!(ctx.ro_array(&data, count_zeros), expected);
//!     });
//! tracker.finish().unwrap();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`random`] | `judgekit-random` | Seeded generator and typed input builders |
//! | [`guard`] | `judgekit-guard` | Page-protected read-only buffers, matrices, strings |
//! | [`harness`] | `judgekit-harness` | Safe-test driver, scored test registry, timing and panic assertions, run tracker |
//! | [`checker`] | `judgekit-checker` | Secret verification and score reporting |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Seeded deterministic random data (`judgekit-random`).
pub use judgekit_random as random;

/// Page-protected read-only copies of test data (`judgekit-guard`).
///
/// [`guard::RoBuffer`], [`guard::RoMatrix`] and [`guard::RoString`] own
/// their mappings; the `run_on_ro_*` functions scope one to a closure.
pub use judgekit_guard as guard;

/// Test driving and assertions (`judgekit-harness`).
pub use judgekit_harness as harness;

/// Contest checker library (`judgekit-checker`).
///
/// The `judgekit-checker` binary wraps [`checker::check_files`].
pub use judgekit_checker as checker;

pub use judgekit_harness::assert_near_rel;

/// Common imports for writing a grading suite.
///
/// ```rust
/// use judgekit::prelude::*;
/// ```
pub mod prelude {
    // Random
    pub use judgekit_random::{RandomSource, TestRng};

    // Protected buffers
    pub use judgekit_guard::{
        run_on_ro_array, run_on_ro_matrix, run_on_ro_string, GuardError, RoBuffer, RoMatrix,
        RoString,
    };

    // Driver
    pub use judgekit_harness::{
        RunTracker, SafeTest, SafeTestConfig, TestContext, TrackerConfig, TrackerOutcome,
    };

    // Scored runs
    pub use judgekit_harness::{
        CaseVerdict, ContestIo, ContestSecrets, TestCase, TestMode, Tester, TestingReport,
    };

    // Assertions and helpers
    pub use judgekit_harness::{
        assert_completes_within, assert_duration_within, assert_near_rel, assert_not_slower,
        catch_panic, expect_panic_message, expect_panic_payload, format_grid, format_list,
        get_by_module, measure, relative_difference, sequence, sorted, unique,
    };
}
