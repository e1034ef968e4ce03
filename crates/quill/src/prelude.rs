//! A collection of useful items to make it easier to work with `quill`

pub use quill_ir::{OpCode, Script, ScriptBuilder};
pub use quill_runtime::prelude::*;

pub use crate::{Quill, QuillSettings};
