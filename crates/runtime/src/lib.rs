//! The execution engine for the Quill scripting language
//!
//! This crate has no lexer or parser of its own: it consumes the instruction graphs produced by
//! `quill_ir` (or by an external parser implementing the same contract) and evaluates them.
//! See [Executor] for the entry point.

#![warn(missing_docs)]

mod context;
mod error;
mod host;
mod io;
mod resource;
mod value;

pub mod executor;
pub mod prelude;

pub use crate::{
    context::{Context, ContextKind},
    error::{
        arity_error, loader_error, name_error, range_error, structural_error, type_error,
        type_error_with_slice, Error, ErrorKind, Result,
    },
    executor::{Executor, HostFn, ScriptLoader},
    io::{DefaultStdout, QuillWrite},
    resource::{Resource, ResourceHandle},
    value::QValue,
};
