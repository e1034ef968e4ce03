//! Memory management utilities for Quill
//!
//! Quill's execution model is strictly single-threaded (see the interpreter core's
//! concurrency section), so only one pointer strategy is provided: reference-counted,
//! non-atomic, with no cycle collection. `Resource` values are the only thing in the
//! value model that these pointers are used to share; everything else uses plain owned
//! collections that are deep-copied on `Clone`.

#![warn(missing_docs)]

mod address;
mod ptr;
mod ptr_mut;

pub use address::Address;
pub use ptr::Ptr;
pub use ptr_mut::{Borrow, BorrowMut, PtrMut, QCell};
