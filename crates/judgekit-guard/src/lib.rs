//! Page-protected read-only copies of test data.
//!
//! Golden inputs handed to solution code live in their own anonymous page
//! mappings that are downgraded to read-only before the solution sees
//! them. A stray write faults immediately instead of silently corrupting
//! the input the checker later compares against. The unused tail of the
//! last page is filled with seeded random bytes, so reading past the end
//! yields garbage rather than convenient zeros.
//!
//! # Architecture
//!
//! ```text
//! run_on_ro_array / run_on_ro_matrix / run_on_ro_string   (scoped runners)
//! ├── RoBuffer<T>      one PageMapping, n elements
//! ├── RoMatrix<T>      RoBuffer<T> × rows + RoBuffer<*const T> row table
//! └── RoString         one PageMapping, bytes + NUL
//!     └── PageMapping  map → copy → pad → protect, unmap on drop
//!         └── PageProvider (UnixPages | WindowsPages, cfg-selected)
//! ```
//!
//! # Lifecycle
//!
//! Buffers are ordinary owned values. Dropping one releases its mapping,
//! so release happens on every exit path that runs destructors, including
//! unwinding out of a failed assertion. A process killed by an access
//! violation releases nothing; the OS reclaims it.
//!
//! # Threading
//!
//! Nothing here synchronises. Each caller passes its own random source,
//! so tests running on separate threads do not share state. A
//! [`RoMatrix`] holds raw row pointers and is not `Send`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod buffer;
pub mod error;
mod mapping;
pub mod matrix;
pub mod pages;
pub mod scoped;
pub mod string;

// Public re-exports for the primary API surface.
pub use buffer::RoBuffer;
pub use error::GuardError;
pub use mapping::PageMapping;
pub use matrix::RoMatrix;
pub use pages::{allocation_size, allocation_size_for, page_size, PageProvider, SystemPages};
pub use scoped::{
    run_on_ro_array, run_on_ro_array_in, run_on_ro_matrix, run_on_ro_matrix_in,
    run_on_ro_string, run_on_ro_string_in,
};
pub use string::RoString;
