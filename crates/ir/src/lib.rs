//! The instruction graph, constant pool, and script-relocation machinery used by Quill
//!
//! This crate has no lexer or parser of its own; [ScriptBuilder] plays the role a parser's
//! output layer would play, and `quill_runtime` is the crate that actually evaluates a [Script].

#![warn(missing_docs)]

mod builder;
mod error;
mod instruction;
mod op;
mod script;

pub use crate::{
    builder::ScriptBuilder,
    error::{RelocationError, Result},
    instruction::{ConstKey, Instruction, InstructionKey},
    op::OpCode,
    script::{ConstValue, Script},
};
