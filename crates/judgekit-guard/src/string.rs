//! Read-only NUL-terminated byte strings.

use std::ffi::{c_char, CStr};
use std::fmt;
use std::ops::Deref;
use std::str::Utf8Error;

use judgekit_random::RandomSource;

use crate::error::GuardError;
use crate::mapping::PageMapping;
use crate::pages::{PageProvider, SystemPages};

/// A protected copy of a byte string with a trailing NUL.
///
/// The terminator is part of the data region, so C-style readers that stop
/// at NUL never touch the padding. [`len`](RoString::len) excludes it.
pub struct RoString<P: PageProvider = SystemPages> {
    mapping: PageMapping<P>,
    len: usize,
}

impl RoString {
    /// Copy `text` plus a NUL into fresh protected pages.
    pub fn new<R: RandomSource + ?Sized>(
        text: impl AsRef<[u8]>,
        padding: &mut R,
    ) -> Result<Self, GuardError> {
        Self::new_in(text, padding)
    }
}

impl<P: PageProvider> RoString<P> {
    /// [`RoString::new`] with an explicit page provider.
    pub fn new_in<R: RandomSource + ?Sized>(
        text: impl AsRef<[u8]>,
        padding: &mut R,
    ) -> Result<Self, GuardError> {
        let bytes = text.as_ref();
        let mapping = PageMapping::sealed(&[bytes, &[0u8][..]], padding)?;
        Ok(Self {
            mapping,
            len: bytes.len(),
        })
    }

    /// Content bytes, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        self.mapping.view(self.len)
    }

    /// Content bytes followed by the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        self.mapping.view(self.len + 1)
    }

    /// The content as a C string, or `None` if it contains an interior NUL.
    pub fn as_c_str(&self) -> Option<&CStr> {
        CStr::from_bytes_with_nul(self.as_bytes_with_nul()).ok()
    }

    /// The content as UTF-8.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    /// Raw pointer to the first byte, for APIs expecting `const char*`.
    pub fn as_ptr(&self) -> *const c_char {
        self.mapping.as_ptr().cast()
    }

    /// Content length in bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The allocation descriptor backing this string.
    pub fn mapping(&self) -> &PageMapping<P> {
        &self.mapping
    }
}

impl<P: PageProvider> Deref for RoString<P> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<P: PageProvider> fmt::Debug for RoString<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}
