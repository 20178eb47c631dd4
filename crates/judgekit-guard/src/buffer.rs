//! Read-only 1-D buffers.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use judgekit_random::RandomSource;

use crate::error::GuardError;
use crate::mapping::PageMapping;
use crate::pages::{PageProvider, SystemPages};

/// A page-protected, read-only copy of a slice.
///
/// The elements sit at the start of their own page-aligned mapping; the
/// rest of the last page is random padding, and every byte of the mapping
/// is read-only. A write through [`as_ptr`](RoBuffer::as_ptr) raises an
/// access violation. The mapping is released when the buffer is dropped,
/// including while unwinding from a failed assertion.
pub struct RoBuffer<T, P: PageProvider = SystemPages> {
    mapping: PageMapping<P>,
    len: usize,
    _elem: PhantomData<T>,
}

impl<T: Copy> RoBuffer<T> {
    /// Copy `data` into fresh protected pages, padding the tail from
    /// `padding`.
    pub fn new<R: RandomSource + ?Sized>(data: &[T], padding: &mut R) -> Result<Self, GuardError> {
        Self::new_in(data, padding)
    }
}

impl<T: Copy, P: PageProvider> RoBuffer<T, P> {
    /// [`RoBuffer::new`] with an explicit page provider.
    pub fn new_in<R: RandomSource + ?Sized>(
        data: &[T],
        padding: &mut R,
    ) -> Result<Self, GuardError> {
        let mapping = PageMapping::sealed(&[data], padding)?;
        Ok(Self {
            mapping,
            len: data.len(),
            _elem: PhantomData,
        })
    }

    /// The read-only view.
    pub fn as_slice(&self) -> &[T] {
        self.mapping.view(self.len)
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw pointer to the first element. Never null, even when empty.
    pub fn as_ptr(&self) -> *const T {
        self.mapping.as_ptr().cast()
    }

    /// The allocation descriptor backing this buffer.
    pub fn mapping(&self) -> &PageMapping<P> {
        &self.mapping
    }
}

impl<T: Copy, P: PageProvider> Deref for RoBuffer<T, P> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy, P: PageProvider> AsRef<[T]> for RoBuffer<T, P> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Copy + fmt::Debug, P: PageProvider> fmt::Debug for RoBuffer<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
