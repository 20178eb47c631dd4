//! `VirtualAlloc` / `VirtualProtect` / `VirtualFree` provider.

use std::io;
use std::mem;
use std::ptr::{self, NonNull};
use std::sync::OnceLock;

use winapi::shared::minwindef::DWORD;
use winapi::um::memoryapi::{VirtualAlloc, VirtualFree, VirtualProtect};
use winapi::um::sysinfoapi::{GetSystemInfo, SYSTEM_INFO};
use winapi::um::winnt::{MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_READONLY, PAGE_READWRITE};

use super::PageProvider;

/// Page provider backed by committed `VirtualAlloc` regions.
///
/// Uses the allocation granularity (usually 64 KiB) rather than the 4 KiB
/// page size, since that is what `VirtualAlloc` hands out.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowsPages;

impl PageProvider for WindowsPages {
    fn page_size() -> usize {
        static GRANULARITY: OnceLock<usize> = OnceLock::new();
        *GRANULARITY.get_or_init(|| {
            // SAFETY: SYSTEM_INFO is plain data; GetSystemInfo fills it in.
            let mut info: SYSTEM_INFO = unsafe { mem::zeroed() };
            // SAFETY: `info` is a valid, writable SYSTEM_INFO.
            unsafe { GetSystemInfo(&mut info) };
            info.dwAllocationGranularity as usize
        })
    }

    fn map(len: usize) -> io::Result<NonNull<u8>> {
        // SAFETY: a null address asks the OS for a fresh region.
        let addr = unsafe {
            VirtualAlloc(ptr::null_mut(), len, MEM_COMMIT | MEM_RESERVE, PAGE_READWRITE)
        };
        NonNull::new(addr.cast::<u8>()).ok_or_else(io::Error::last_os_error)
    }

    unsafe fn protect_read_only(base: NonNull<u8>, len: usize) -> io::Result<()> {
        let mut old: DWORD = 0;
        // SAFETY: caller guarantees `base..base + len` is a live region of ours.
        let ok = unsafe { VirtualProtect(base.as_ptr().cast(), len, PAGE_READONLY, &mut old) };
        if ok != 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    unsafe fn unmap(base: NonNull<u8>, _len: usize) -> io::Result<()> {
        // SAFETY: MEM_RELEASE takes the base returned by VirtualAlloc and a
        // zero size; the caller guarantees the region is no longer borrowed.
        let ok = unsafe { VirtualFree(base.as_ptr().cast(), 0, MEM_RELEASE) };
        if ok != 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}
