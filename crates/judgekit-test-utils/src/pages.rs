//! Heap-backed page provider that records what happens to each mapping.

use std::alloc::{self, Layout};
use std::cell::{Cell, RefCell};
use std::io;
use std::ptr::NonNull;

use judgekit_guard::PageProvider;

/// Page size reported by [`RecordingPages`], independent of the host.
pub const RECORDING_PAGE_SIZE: usize = 4096;

/// One call into [`RecordingPages`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageEvent {
    Map { base: usize, len: usize },
    Protect { base: usize, len: usize },
    Unmap { base: usize, len: usize },
}

thread_local! {
    static EVENTS: RefCell<Vec<PageEvent>> = const { RefCell::new(Vec::new()) };
    static FAIL_NEXT_PROTECT: Cell<bool> = const { Cell::new(false) };
}

/// Provider that hands out page-aligned heap blocks and logs each call on
/// the current thread.
///
/// Protection is recorded, not enforced: writes do not fault. Use the real
/// provider for fault tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordingPages;

impl RecordingPages {
    /// Drain this thread's event log.
    pub fn take_events() -> Vec<PageEvent> {
        EVENTS.with(|e| std::mem::take(&mut *e.borrow_mut()))
    }

    /// Maps minus unmaps in this thread's current log.
    pub fn live_mappings() -> isize {
        EVENTS.with(|e| {
            e.borrow().iter().fold(0, |n, ev| match ev {
                PageEvent::Map { .. } => n + 1,
                PageEvent::Unmap { .. } => n - 1,
                PageEvent::Protect { .. } => n,
            })
        })
    }

    /// Make the next protect call on this thread fail.
    pub fn fail_next_protect() {
        FAIL_NEXT_PROTECT.with(|f| f.set(true));
    }

    fn layout(len: usize) -> io::Result<Layout> {
        Layout::from_size_align(len, RECORDING_PAGE_SIZE)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
    }

    fn record(event: PageEvent) {
        EVENTS.with(|e| e.borrow_mut().push(event));
    }
}

impl PageProvider for RecordingPages {
    fn page_size() -> usize {
        RECORDING_PAGE_SIZE
    }

    fn map(len: usize) -> io::Result<NonNull<u8>> {
        let layout = Self::layout(len)?;
        // SAFETY: `len` is non-zero per the provider contract.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let base = NonNull::new(ptr).ok_or_else(|| io::Error::from(io::ErrorKind::OutOfMemory))?;
        Self::record(PageEvent::Map {
            base: base.as_ptr() as usize,
            len,
        });
        Ok(base)
    }

    unsafe fn protect_read_only(base: NonNull<u8>, len: usize) -> io::Result<()> {
        if FAIL_NEXT_PROTECT.with(|f| f.replace(false)) {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        Self::record(PageEvent::Protect {
            base: base.as_ptr() as usize,
            len,
        });
        Ok(())
    }

    unsafe fn unmap(base: NonNull<u8>, len: usize) -> io::Result<()> {
        let layout = Self::layout(len)?;
        // SAFETY: the caller passes back a block from `map` with its length.
        unsafe { alloc::dealloc(base.as_ptr(), layout) };
        Self::record(PageEvent::Unmap {
            base: base.as_ptr() as usize,
            len,
        });
        Ok(())
    }
}
