//! Shared helpers for building small instruction graphs by hand in integration tests
//!
//! These stand in for a parser: each helper mirrors one shape from spec.md §6.1's opcode
//! catalogue, the same way `quill_ir::ScriptBuilder` stands in for the parser's output layer.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use quill_ir::{InstructionKey, OpCode, Script, ScriptBuilder};
use quill_runtime::{Error, QuillWrite, Result};

/// A `Vec<u8>`-backed stdout sink, for asserting on what `Println` wrote
#[derive(Clone, Default)]
pub struct CapturedStdout(pub Rc<RefCell<Vec<u8>>>);

impl CapturedStdout {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl QuillWrite for CapturedStdout {
    fn write(&self, bytes: &[u8]) -> Result<()> {
        self.0.borrow_mut().extend_from_slice(bytes);
        Ok(())
    }
}

/// Builds a `CallFunction` node
pub fn call(builder: &mut ScriptBuilder, name: &str, args: &[InstructionKey]) -> InstructionKey {
    let group = group_of(builder, args);
    builder.push_named(OpCode::CallFunction, Some(name), &[group])
}

/// Builds a `Group` node containing `items`, or the NULL node if `items` is empty
pub fn group_of(builder: &mut ScriptBuilder, items: &[InstructionKey]) -> InstructionKey {
    let Some((first, rest)) = items.split_first() else {
        return InstructionKey::NULL;
    };
    let group = builder.new_group(*first);
    for item in rest {
        builder.add_to_group(group, *item);
    }
    group
}

/// Builds a `NewVar name [init]` node
pub fn new_var(builder: &mut ScriptBuilder, name: &str, init: Option<InstructionKey>) -> InstructionKey {
    match init {
        Some(init) => builder.push_named(OpCode::NewVar, Some(name), &[init]),
        None => builder.push_named(OpCode::NewVar, Some(name), &[]),
    }
}

pub fn read_var(builder: &mut ScriptBuilder, name: &str) -> InstructionKey {
    builder.push_named(OpCode::ReadVar, Some(name), &[])
}

pub fn write_var(builder: &mut ScriptBuilder, name: &str, value: InstructionKey) -> InstructionKey {
    builder.push_named(OpCode::WriteVar, Some(name), &[value])
}

pub fn bin(builder: &mut ScriptBuilder, op: OpCode, lhs: InstructionKey, rhs: InstructionKey) -> InstructionKey {
    builder.push(op, &[lhs, rhs])
}

pub fn ret(builder: &mut ScriptBuilder, value: InstructionKey) -> InstructionKey {
    builder.push(OpCode::ReturnStatement, &[value])
}

/// Builds an `if (cond) { action } else if ... else { ... }` statement, matching spec.md
/// §4.4's inverted `IfStatement`/`ConditionExpression` shape.
pub fn if_stmt(
    builder: &mut ScriptBuilder,
    cond: InstructionKey,
    action: InstructionKey,
    elifs: &[(InstructionKey, InstructionKey)],
    else_block: Option<InstructionKey>,
) -> InstructionKey {
    let main = builder.push(OpCode::ConditionExpression, &[cond, action]);

    let chain = if elifs.is_empty() {
        InstructionKey::NULL
    } else {
        let branch_keys: Vec<InstructionKey> = elifs
            .iter()
            .map(|&(c, a)| builder.push(OpCode::ConditionExpression, &[c, a]))
            .collect();
        group_of(builder, &branch_keys)
    };

    let else_key = else_block.unwrap_or(InstructionKey::NULL);
    builder.push(OpCode::IfStatement, &[main, chain, else_key])
}

/// Builds a `func name(formals) { body }` declaration; returns its `NewFunction` key
pub fn func_decl(
    builder: &mut ScriptBuilder,
    name: &str,
    formals: &[&str],
    body: InstructionKey,
) -> InstructionKey {
    let formal_keys: Vec<InstructionKey> = formals
        .iter()
        .map(|formal| builder.push_named(OpCode::NewVar, Some(formal), &[]))
        .collect();
    let formal_group = group_of(builder, &formal_keys);
    builder.push_named(OpCode::NewFunction, Some(name), &[formal_group, body])
}

pub fn for_stmt(
    builder: &mut ScriptBuilder,
    init: Option<InstructionKey>,
    cond: Option<InstructionKey>,
    post: Option<InstructionKey>,
    body: InstructionKey,
) -> InstructionKey {
    builder.push(
        OpCode::ForStatement,
        &[
            init.unwrap_or(InstructionKey::NULL),
            cond.unwrap_or(InstructionKey::NULL),
            post.unwrap_or(InstructionKey::NULL),
            body,
        ],
    )
}

pub fn for_in_stmt(
    builder: &mut ScriptBuilder,
    key_val_name: &str,
    iter: InstructionKey,
    body: InstructionKey,
) -> InstructionKey {
    builder.push_named(OpCode::ForInStatement, Some(key_val_name), &[iter, body])
}

pub fn switch_stmt(
    builder: &mut ScriptBuilder,
    value: InstructionKey,
    cases: &[(Vec<InstructionKey>, InstructionKey)],
    default: Option<InstructionKey>,
) -> InstructionKey {
    let case_keys: Vec<InstructionKey> = cases
        .iter()
        .map(|(conds, action)| {
            let cond_group = group_of(builder, conds);
            builder.push(OpCode::Group, &[cond_group, *action])
        })
        .collect();
    let cases_group = group_of(builder, &case_keys);
    builder.push(
        OpCode::SwitchCaseStatement,
        &[value, cases_group, default.unwrap_or(InstructionKey::NULL)],
    )
}

pub fn create_array(builder: &mut ScriptBuilder, items: &[InstructionKey]) -> InstructionKey {
    let list = group_of(builder, items);
    builder.push(OpCode::CreateArray, &[list])
}

pub fn create_map(builder: &mut ScriptBuilder, pairs: &[(InstructionKey, InstructionKey)]) -> InstructionKey {
    let pair_keys: Vec<InstructionKey> = pairs
        .iter()
        .map(|&(k, v)| builder.push(OpCode::Group, &[k, v]))
        .collect();
    let list = group_of(builder, &pair_keys);
    builder.push(OpCode::CreateMap, &[list])
}

pub fn read_at(builder: &mut ScriptBuilder, name: &str, index: InstructionKey) -> InstructionKey {
    builder.push_named(OpCode::ReadAt, Some(name), &[index])
}

pub fn write_at(builder: &mut ScriptBuilder, name: &str, index: InstructionKey, value: InstructionKey) -> InstructionKey {
    builder.push_named(OpCode::WriteAt, Some(name), &[index, value])
}

pub fn group(builder: &mut ScriptBuilder, items: &[InstructionKey]) -> InstructionKey {
    group_of(builder, items)
}

/// Builds an `AddWrite` (`name += value`) node
pub fn add_write(builder: &mut ScriptBuilder, name: &str, value: InstructionKey) -> InstructionKey {
    builder.push_named(OpCode::AddWrite, Some(name), &[value])
}

pub fn finish(builder: ScriptBuilder, entry: InstructionKey) -> Script {
    builder.build(entry)
}

pub fn expect_ok<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("unexpected error: {e}"),
    }
}

pub fn expect_err<T: std::fmt::Debug>(result: Result<T>) -> Error {
    match result {
        Ok(value) => panic!("expected an error, got {value:?}"),
        Err(e) => e,
    }
}
