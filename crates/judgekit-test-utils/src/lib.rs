//! Test utilities for judgekit development.
//!
//! - [`RecordingPages`]: a heap-backed [`PageProvider`] that logs every
//!   map, protect, and unmap on the calling thread, for asserting release
//!   order and leak freedom without real page tables.
//! - [`isolated`]: re-run a single test in a child process, for asserting
//!   that a write to protected memory kills the writer.
//! - [`ZeroSource`]: a [`RandomSource`] that only yields zeros.
//!
//! [`PageProvider`]: judgekit_guard::PageProvider
//! [`RandomSource`]: judgekit_random::RandomSource

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod isolated;
pub mod pages;

pub use pages::{PageEvent, RecordingPages};

use judgekit_random::RandomSource;

/// A random source that always yields zero.
///
/// Padding built from it is all zeros, which is what the real source must
/// never produce.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroSource;

impl RandomSource for ZeroSource {
    fn next_u64(&mut self) -> u64 {
        0
    }
}
