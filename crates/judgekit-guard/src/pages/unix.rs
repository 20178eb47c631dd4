//! `mmap` / `mprotect` / `munmap` provider.

use std::io;
use std::ptr::{self, NonNull};
use std::sync::OnceLock;

use super::PageProvider;

/// Page provider backed by anonymous private `mmap` regions.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnixPages;

impl PageProvider for UnixPages {
    fn page_size() -> usize {
        static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
        *PAGE_SIZE.get_or_init(|| {
            // SAFETY: sysconf has no memory-safety preconditions.
            let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
            if size > 0 {
                size as usize
            } else {
                4096
            }
        })
    }

    fn map(len: usize) -> io::Result<NonNull<u8>> {
        // SAFETY: a null hint with MAP_ANONYMOUS creates a new region and
        // never replaces an existing mapping.
        let addr = unsafe {
            libc::mmap(
                ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }
        NonNull::new(addr.cast::<u8>()).ok_or_else(|| io::Error::other("mmap returned null"))
    }

    unsafe fn protect_read_only(base: NonNull<u8>, len: usize) -> io::Result<()> {
        // SAFETY: caller guarantees `base..base + len` is a live mapping of ours.
        let rc = unsafe { libc::mprotect(base.as_ptr().cast(), len, libc::PROT_READ) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    unsafe fn unmap(base: NonNull<u8>, len: usize) -> io::Result<()> {
        // SAFETY: caller guarantees the region is ours and no longer borrowed.
        let rc = unsafe { libc::munmap(base.as_ptr().cast(), len) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}
