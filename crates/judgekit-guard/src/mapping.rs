//! Sealed page mappings.
//!
//! A [`PageMapping`] is the allocation descriptor behind every protected
//! buffer: it owns one page-aligned region, remembers how many leading
//! bytes carry caller data, and releases the region on drop. Once
//! constructed it is read-only for its whole life; the writable phase
//! exists only inside [`PageMapping::sealed`].

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

use judgekit_random::RandomSource;

use crate::error::GuardError;
use crate::pages::{allocation_size_for, PageProvider, SystemPages};

/// One read-only, page-aligned region owned by a protected buffer.
///
/// Invariants: `allocated % P::page_size() == 0`, `allocated >= requested`,
/// `allocated > 0`. Bytes `[requested, allocated)` hold padding drawn
/// from the random source the mapping was built with.
pub struct PageMapping<P: PageProvider = SystemPages> {
    base: NonNull<u8>,
    requested: usize,
    allocated: usize,
    _provider: PhantomData<fn() -> P>,
}

// SAFETY: the region is exclusively owned and immutable after `sealed`
// returns, so sharing or moving the descriptor across threads is sound.
unsafe impl<P: PageProvider> Send for PageMapping<P> {}
unsafe impl<P: PageProvider> Sync for PageMapping<P> {}

impl<P: PageProvider> PageMapping<P> {
    /// Map a fresh region, copy `parts` back to back into its start, pad
    /// the tail from `padding`, then make the whole region read-only.
    ///
    /// A zero-byte request still maps one page, all of it padding.
    pub(crate) fn sealed<T: Copy, R: RandomSource + ?Sized>(
        parts: &[&[T]],
        padding: &mut R,
    ) -> Result<Self, GuardError> {
        let page = P::page_size();
        let count: usize = parts.iter().map(|p| p.len()).sum();
        let requested = count * mem::size_of::<T>();
        let allocated = allocation_size_for(page, 1, requested).max(page);

        let base = P::map(allocated).map_err(|source| GuardError::MapFailed {
            bytes: allocated,
            source,
        })?;
        debug_assert_eq!(base.as_ptr().align_offset(mem::align_of::<T>()), 0);

        // From here on, an early return releases the region through Drop.
        let mapping = Self {
            base,
            requested,
            allocated,
            _provider: PhantomData,
        };

        let mut dst = base.as_ptr().cast::<T>();
        for part in parts {
            // SAFETY: the region is writable, aligned for T, and holds at
            // least `count` elements; parts cannot overlap a fresh mapping.
            unsafe {
                ptr::copy_nonoverlapping(part.as_ptr(), dst, part.len());
                dst = dst.add(part.len());
            }
        }

        // SAFETY: `[requested, allocated)` lies inside the writable region
        // and nothing else refers to it yet.
        let tail = unsafe {
            slice::from_raw_parts_mut(base.as_ptr().add(requested), allocated - requested)
        };
        padding.fill_bytes(tail);
        log::trace!(
            "padded {} bytes after {} data bytes at {:p}",
            allocated - requested,
            requested,
            base
        );

        // SAFETY: `base`/`allocated` are exactly what `P::map` returned.
        unsafe { P::protect_read_only(base, allocated) }.map_err(|source| {
            GuardError::ProtectFailed {
                bytes: allocated,
                source,
            }
        })?;
        log::debug!("sealed {allocated} bytes ({requested} requested) at {base:p}");

        Ok(mapping)
    }

    /// The first `len` elements of the region as `T`.
    ///
    /// `len` must not exceed the element count the mapping was sealed with.
    pub(crate) fn view<T: Copy>(&self, len: usize) -> &[T] {
        debug_assert!(len * mem::size_of::<T>() <= self.requested);
        // SAFETY: the first `requested` bytes were initialised with `T`
        // values in `sealed` and stay immutable until `self` is dropped.
        unsafe { slice::from_raw_parts(self.base.as_ptr().cast::<T>().cast_const(), len) }
    }

    /// Read-only pointer to the start of the region.
    pub fn as_ptr(&self) -> *const u8 {
        self.base.as_ptr().cast_const()
    }

    /// Bytes of caller data at the start of the region.
    pub fn requested_bytes(&self) -> usize {
        self.requested
    }

    /// Total bytes mapped; a multiple of the page size.
    pub fn allocated_bytes(&self) -> usize {
        self.allocated
    }

    /// The random tail `[requested, allocated)`.
    pub fn padding(&self) -> &[u8] {
        // SAFETY: the tail was fully written in `sealed` and is immutable.
        unsafe {
            slice::from_raw_parts(
                self.base.as_ptr().add(self.requested).cast_const(),
                self.allocated - self.requested,
            )
        }
    }
}

impl<P: PageProvider> Drop for PageMapping<P> {
    fn drop(&mut self) {
        // SAFETY: `base`/`allocated` describe our own live mapping and every
        // view borrowed from `self` has ended.
        match unsafe { P::unmap(self.base, self.allocated) } {
            Ok(()) => log::debug!("released {} bytes at {:p}", self.allocated, self.base),
            Err(e) => log::error!(
                "failed to release {} bytes at {:p}: {e}",
                self.allocated,
                self.base
            ),
        }
    }
}

impl<P: PageProvider> fmt::Debug for PageMapping<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageMapping")
            .field("base", &self.base)
            .field("requested", &self.requested)
            .field("allocated", &self.allocated)
            .finish()
    }
}
