//! A collection of useful items to make it easier to work with `quill_runtime`

#[doc(inline)]
pub use crate::{
    Context, ContextKind, DefaultStdout, Error, ErrorKind, Executor, HostFn, QValue, QuillWrite,
    Resource, ResourceHandle, Result, ScriptLoader,
};
pub use quill_memory::{Borrow, BorrowMut, Ptr, PtrMut};
