//! # Quill
//!
//! Pulls together the instruction-graph IR ([quill_ir]) and the tree-walking runtime
//! ([quill_runtime]) for the Quill scripting language.
//!
//! Scripts are run with the [Quill] struct. This crate has no lexer or parser of its own: a
//! [quill_ir::Script] is assumed to already exist, either built by hand with
//! [quill_ir::ScriptBuilder] or produced by an external front end.
//!
//! ## Example
//!
//! ```
//! use quill::prelude::*;
//! use quill_ir::{OpCode, ScriptBuilder};
//!
//! let mut builder = ScriptBuilder::new("example");
//! let one = builder.new_const_int(1);
//! let two = builder.new_const_int(2);
//! let add = builder.push(OpCode::Add, &[one, two]);
//! let script = builder.build(add);
//!
//! let mut quill = Quill::new();
//! match quill.run(script) {
//!     Ok(result) => assert_eq!(result, QValue::Int(3)),
//!     Err(error) => panic!("Runtime error: {error}"),
//! }
//! ```

#![warn(missing_docs)]

mod error;
#[allow(clippy::module_inception)]
mod quill;

pub mod prelude;

pub use quill_ir as ir;
pub use quill_memory::{Borrow, BorrowMut, Ptr, PtrMut};
pub use quill_runtime as runtime;
pub use quill_runtime::{
    Context, ContextKind, HostFn, QValue, QuillWrite, Resource, ResourceHandle, ScriptLoader,
};

pub use crate::{
    error::{Error, Result},
    quill::{Quill, QuillSettings},
};
