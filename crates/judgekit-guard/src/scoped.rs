//! Scoped runs: allocate, call, release.
//!
//! Each runner builds one protected buffer, passes a read-only view to the
//! callback, and drops the buffer when the callback returns or unwinds. A
//! panicking callback (a failed assertion) therefore still releases its
//! pages before the panic reaches the caller.
//!
//! Setup failures split two ways. Bad input (no rows, ragged rows) panics
//! like any other failed precondition. An environment failure (the host
//! would not map or protect memory) aborts the process: every later test
//! would hit the same broken host.

use judgekit_random::RandomSource;

use crate::buffer::RoBuffer;
use crate::error::GuardError;
use crate::matrix::RoMatrix;
use crate::pages::{PageProvider, SystemPages};
use crate::string::RoString;

/// Run `f` on a protected copy of `data`.
pub fn run_on_ro_array<T, R, F, O>(data: &[T], padding: &mut R, f: F) -> O
where
    T: Copy,
    R: RandomSource + ?Sized,
    F: FnOnce(&[T]) -> O,
{
    run_on_ro_array_in::<SystemPages, T, R, F, O>(data, padding, f)
}

/// [`run_on_ro_array`] with an explicit page provider.
pub fn run_on_ro_array_in<P, T, R, F, O>(data: &[T], padding: &mut R, f: F) -> O
where
    P: PageProvider,
    T: Copy,
    R: RandomSource + ?Sized,
    F: FnOnce(&[T]) -> O,
{
    let buffer = RoBuffer::<T, P>::new_in(data, padding).unwrap_or_else(|e| setup_failed(e));
    f(&buffer)
}

/// Run `f` on a protected copy of a rectangular 2-D input.
///
/// # Panics
///
/// Panics if `rows` is empty or ragged.
pub fn run_on_ro_matrix<T, Row, R, F, O>(rows: &[Row], padding: &mut R, f: F) -> O
where
    T: Copy,
    Row: AsRef<[T]>,
    R: RandomSource + ?Sized,
    F: FnOnce(&RoMatrix<T>) -> O,
{
    run_on_ro_matrix_in::<SystemPages, T, Row, R, F, O>(rows, padding, f)
}

/// [`run_on_ro_matrix`] with an explicit page provider.
pub fn run_on_ro_matrix_in<P, T, Row, R, F, O>(rows: &[Row], padding: &mut R, f: F) -> O
where
    P: PageProvider,
    T: Copy,
    Row: AsRef<[T]>,
    R: RandomSource + ?Sized,
    F: FnOnce(&RoMatrix<T, P>) -> O,
{
    let matrix = RoMatrix::<T, P>::new_in(rows, padding).unwrap_or_else(|e| setup_failed(e));
    f(&matrix)
}

/// Run `f` on a protected, NUL-terminated copy of `text`.
pub fn run_on_ro_string<R, F, O>(text: impl AsRef<[u8]>, padding: &mut R, f: F) -> O
where
    R: RandomSource + ?Sized,
    F: FnOnce(&RoString) -> O,
{
    run_on_ro_string_in::<SystemPages, R, F, O>(text, padding, f)
}

/// [`run_on_ro_string`] with an explicit page provider.
pub fn run_on_ro_string_in<P, R, F, O>(text: impl AsRef<[u8]>, padding: &mut R, f: F) -> O
where
    P: PageProvider,
    R: RandomSource + ?Sized,
    F: FnOnce(&RoString<P>) -> O,
{
    let string = RoString::<P>::new_in(text, padding).unwrap_or_else(|e| setup_failed(e));
    f(&string)
}

fn setup_failed(err: GuardError) -> ! {
    if err.is_environment() {
        log::error!("protected memory unavailable, aborting: {err}");
        eprintln!("judgekit: protected memory unavailable, aborting: {err}");
        std::process::abort();
    }
    panic!("{err}");
}
