//! Page-mapping providers and allocation sizing.
//!
//! A [`PageProvider`] is the only place the crate talks to the OS memory
//! manager. The platform implementation is picked at build time through
//! the [`SystemPages`] alias; tests substitute their own provider to
//! observe map and release order without touching real page tables.

#![allow(unsafe_code)]

use std::io;
use std::ptr::NonNull;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::UnixPages;
#[cfg(windows)]
pub use windows::WindowsPages;

/// Provider for the host platform.
#[cfg(unix)]
pub type SystemPages = UnixPages;

/// Provider for the host platform.
#[cfg(windows)]
pub type SystemPages = WindowsPages;

/// Anonymous page mappings with a read-only downgrade.
///
/// # Contract
///
/// - [`map`](PageProvider::map) returns a region aligned to
///   [`page_size`](PageProvider::page_size), readable and writable, not
///   aliasing any other live region.
/// - `len` passed to every method is a non-zero multiple of the page size.
pub trait PageProvider {
    /// Granularity at which protection changes apply, in bytes.
    fn page_size() -> usize;

    /// Map `len` fresh read-write bytes.
    fn map(len: usize) -> io::Result<NonNull<u8>>;

    /// Downgrade a whole mapping to read-only.
    ///
    /// # Safety
    ///
    /// `base` and `len` must describe a live mapping returned by
    /// [`map`](PageProvider::map) of this provider.
    unsafe fn protect_read_only(base: NonNull<u8>, len: usize) -> io::Result<()>;

    /// Release a whole mapping.
    ///
    /// # Safety
    ///
    /// `base` and `len` must describe a live mapping returned by
    /// [`map`](PageProvider::map) of this provider. No reference into the
    /// region may outlive this call.
    unsafe fn unmap(base: NonNull<u8>, len: usize) -> io::Result<()>;
}

/// Page size of the host, queried once.
pub fn page_size() -> usize {
    SystemPages::page_size()
}

/// Bytes needed for `count` elements of `element_size` bytes, rounded up to
/// the host page size.
pub fn allocation_size(element_size: usize, count: usize) -> usize {
    allocation_size_for(page_size(), element_size, count)
}

/// [`allocation_size`] for an explicit page size.
///
/// `page_size` must be non-zero. Overflow of `element_size * count` is not
/// checked.
pub fn allocation_size_for(page_size: usize, element_size: usize, count: usize) -> usize {
    (element_size * count).div_ceil(page_size) * page_size
}
