//! Run one test in a child process.
//!
//! The test binary re-executes itself filtered to a single test, with an
//! environment marker set. The test checks [`in_child`] first: in the child
//! it performs the fatal action, in the parent it inspects how the child
//! exited.
//!
//! ```no_run
//! use judgekit_test_utils::isolated;
//!
//! // inside a `#[test]` named `write_faults`:
//! fn write_faults() {
//!     if isolated::in_child() {
//!         // do the thing that should crash
//!         return;
//!     }
//!     let status = isolated::run_isolated("write_faults").unwrap();
//!     assert!(isolated::terminated_abnormally(&status));
//! }
//! ```

use std::env;
use std::io;
use std::process::{Command, ExitStatus, Stdio};

/// Environment variable set in the child.
pub const CHILD_ENV: &str = "JUDGEKIT_ISOLATED_CHILD";

/// Whether this process is the child of [`run_isolated`].
pub fn in_child() -> bool {
    env::var_os(CHILD_ENV).is_some()
}

/// Re-run the current test binary restricted to `test_name`.
///
/// `test_name` is the full path the harness prints for the test, e.g.
/// `write_faults` for a top-level integration test.
pub fn run_isolated(test_name: &str) -> io::Result<ExitStatus> {
    let exe = env::current_exe()?;
    Command::new(exe)
        .args([test_name, "--exact", "--test-threads=1", "--nocapture"])
        .env(CHILD_ENV, test_name)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
}

/// Whether the child died from a signal or a Windows exception code rather
/// than exiting on its own.
#[cfg(unix)]
pub fn terminated_abnormally(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.signal().is_some()
}

/// Whether the child died from a signal or a Windows exception code rather
/// than exiting on its own.
#[cfg(windows)]
pub fn terminated_abnormally(status: &ExitStatus) -> bool {
    // NTSTATUS error codes have the top two bits set.
    status
        .code()
        .is_some_and(|c| (c as u32) & 0xC000_0000 == 0xC000_0000)
}

/// The signal that killed the child, if any.
#[cfg(unix)]
pub fn termination_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}
