//! Read-only 2-D buffers.
//!
//! A [`RoMatrix`] is a table of row pointers, itself protected, over
//! independently protected rows. This is the layout of a `T**` argument:
//! tested code can follow `table[i][j]` but cannot write either level.

use std::fmt;
use std::ops::Index;

use judgekit_random::RandomSource;

use crate::buffer::RoBuffer;
use crate::error::GuardError;
use crate::pages::{PageProvider, SystemPages};

/// A protected `rows x cols` matrix.
///
/// All rows have the same length; construction rejects ragged input.
pub struct RoMatrix<T, P: PageProvider = SystemPages> {
    // Fields drop in declaration order: rows are released before the
    // table that points at them.
    rows: Vec<RoBuffer<T, P>>,
    table: RoBuffer<*const T, P>,
    cols: usize,
}

impl<T: Copy> RoMatrix<T> {
    /// Protect every row, then protect the table of row pointers.
    ///
    /// Fails with [`GuardError::EmptyMatrix`] for no rows and
    /// [`GuardError::RaggedRows`] when any row differs in length from row 0.
    pub fn new<Row, R>(data: &[Row], padding: &mut R) -> Result<Self, GuardError>
    where
        Row: AsRef<[T]>,
        R: RandomSource + ?Sized,
    {
        Self::new_in(data, padding)
    }
}

impl<T: Copy, P: PageProvider> RoMatrix<T, P> {
    /// [`RoMatrix::new`] with an explicit page provider.
    pub fn new_in<Row, R>(data: &[Row], padding: &mut R) -> Result<Self, GuardError>
    where
        Row: AsRef<[T]>,
        R: RandomSource + ?Sized,
    {
        let first = data.first().ok_or(GuardError::EmptyMatrix)?;
        let cols = first.as_ref().len();
        if let Some((row, found)) = data
            .iter()
            .map(|r| r.as_ref().len())
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(GuardError::RaggedRows {
                row,
                expected: cols,
                found,
            });
        }

        let rows = data
            .iter()
            .map(|r| RoBuffer::<T, P>::new_in(r.as_ref(), &mut *padding))
            .collect::<Result<Vec<_>, _>>()?;
        let pointers: Vec<*const T> = rows.iter().map(RoBuffer::as_ptr).collect();
        let table = RoBuffer::<*const T, P>::new_in(&pointers, padding)?;

        Ok(Self { rows, table, cols })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (the length of every row).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row `i` as a read-only slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[T] {
        &self.rows[i]
    }

    /// Element `(i, j)`, or `None` when out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        self.rows.get(i)?.get(j)
    }

    /// Iterate over rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// The protected table of row pointers.
    pub fn row_table(&self) -> &[*const T] {
        &self.table
    }

    /// Raw pointer to the row table, shaped like a C `const T* const*`.
    pub fn as_ptr(&self) -> *const *const T {
        self.table.as_ptr()
    }

    /// Row buffers, for inspecting their allocation descriptors.
    pub fn row_buffers(&self) -> &[RoBuffer<T, P>] {
        &self.rows
    }

    /// The buffer holding the row table.
    pub fn table_buffer(&self) -> &RoBuffer<*const T, P> {
        &self.table
    }
}

impl<T: Copy, P: PageProvider> Index<(usize, usize)> for RoMatrix<T, P> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.rows[i][j]
    }
}

impl<T: Copy + fmt::Debug, P: PageProvider> fmt::Debug for RoMatrix<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter_rows()).finish()
    }
}
