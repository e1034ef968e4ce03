//! The baseline host-function registry
//!
//! Mirrors `original_source/builtin.cc`'s registration of native functions: a flat table of
//! name -> [HostFn](crate::executor::HostFn), consulted by `Executor::eval_call` after the
//! user-defined function table comes up empty. These are the functions spec.md §6.2 requires
//! every embedding to provide; stdlib modules (http, tcp, json, hex, file I/O) are registered
//! separately by the embedder, the same way `quill`'s core library modules sit outside this crate.

use quill_memory::PtrMut;

use crate::{
    context::Context,
    error::{arity_error, structural_error, type_error, Result},
    executor::Executor,
    value::QValue,
};

/// Registers every baseline host function on a freshly-created [Executor]
pub(crate) fn register_builtins(executor: &mut Executor) {
    executor.register_host_fn("Println", println_fn);
    executor.register_host_fn("len", len_fn);
    executor.register_host_fn("typeof", typeof_fn);
    executor.register_host_fn("ToString", to_string_fn);
    executor.register_host_fn("append", append_fn);
    executor.register_host_fn("bytes", bytes_fn);
    executor.register_host_fn("string", string_fn);
    executor.register_host_fn("BytesFromHexString", bytes_from_hex_string_fn);
    executor.register_host_fn("close", close_fn);
    executor.register_host_fn("exit", exit_fn);
    executor.register_host_fn("require", require_fn);
}

/// Prints every argument's display string separated by a space, followed by a trailing space
/// and a newline; matches spec.md §8's literal scenarios (`Println(a)` -> `"7 "`).
fn println_fn(args: &mut [QValue], _ctx: &PtrMut<Context>, vm: &mut Executor) -> Result<QValue> {
    let mut line = String::new();
    for arg in args.iter() {
        line.push_str(&arg.to_display_string());
        line.push(' ');
    }
    vm.stdout().write_line(&line)?;
    Ok(QValue::Null)
}

fn one_arg<'a>(args: &'a [QValue], _name: &str) -> Result<&'a QValue> {
    match args {
        [value] => Ok(value),
        other => arity_error(1, other.len()),
    }
}

fn len_fn(args: &mut [QValue], _ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    let value = one_arg(args, "len")?;
    Ok(QValue::Int(value.length()? as i64))
}

fn typeof_fn(args: &mut [QValue], _ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    let value = one_arg(args, "typeof")?;
    Ok(QValue::Str(value.type_name().as_bytes().to_vec()))
}

fn to_string_fn(args: &mut [QValue], _ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    let value = one_arg(args, "ToString")?;
    Ok(QValue::Str(value.to_display_string().into_bytes()))
}

/// `append(target, ...values)`: returns a new Array/Bytes with every trailing value appended.
/// Like every other host function, `target` arrives as a copy of the caller's value; the script
/// is responsible for reassigning the result (`a = append(a, x)`), matching the eager-copy
/// semantics of spec.md §3.
///
/// For an `Array` target, each trailing value is pushed as-is. For a `Bytes` target, each
/// trailing value must be `Bytes` (concatenated), `Integer` (its low byte pushed), or an `Array`
/// of Integers (each element's low byte pushed, via the same coercion `bytes()` performs) —
/// matching `Append`/`AppendIntegerArrayToBytes` in `original_source/builtin.cc`.
fn append_fn(args: &mut [QValue], _ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    let Some((target, rest)) = args.split_first() else {
        return arity_error(1, 0);
    };

    match target {
        QValue::Array(items) => {
            let mut items = items.clone();
            items.extend(rest.iter().cloned());
            Ok(QValue::Array(items))
        }
        QValue::Bytes(bytes) => {
            let mut bytes = bytes.clone();
            for value in rest {
                match value {
                    QValue::Bytes(more) => bytes.extend_from_slice(more),
                    QValue::Int(byte) => bytes.push(*byte as u8),
                    QValue::Array(items) => append_integer_array_to_bytes(&mut bytes, items)?,
                    other => return type_error("Bytes, Integer, or Array of Integer", other),
                }
            }
            Ok(QValue::Bytes(bytes))
        }
        other => type_error("Array or Bytes", other),
    }
}

fn append_integer_array_to_bytes(bytes: &mut Vec<u8>, items: &[QValue]) -> Result<()> {
    if !items.iter().all(|item| matches!(item, QValue::Int(_))) {
        return structural_error("only Integer Array can append to bytes");
    }
    for item in items {
        let QValue::Int(byte) = item else { unreachable!("checked above") };
        bytes.push(*byte as u8);
    }
    Ok(())
}

/// `bytes(v)`: String -> Bytes of the same underlying octets; Array of Integers -> Bytes with
/// each element truncated to its low byte.
fn bytes_fn(args: &mut [QValue], _ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    let value = one_arg(args, "bytes")?;
    match value {
        QValue::Str(raw) | QValue::Bytes(raw) => Ok(QValue::Bytes(raw.clone())),
        QValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    QValue::Int(i) => out.push(*i as u8),
                    other => return type_error("Integer", other),
                }
            }
            Ok(QValue::Bytes(out))
        }
        other => type_error("String, Bytes, or Array", other),
    }
}

/// `string(v)`: decodes Bytes (or a String) as UTF-8 text; see spec.md §8 scenario 6.
fn string_fn(args: &mut [QValue], _ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    let value = one_arg(args, "string")?;
    match value {
        QValue::Bytes(raw) | QValue::Str(raw) => Ok(QValue::Str(raw.clone())),
        other => type_error("String or Bytes", other),
    }
}

/// `BytesFromHexString(s)`: decodes a hex-digit string (even length, no separators) into Bytes
fn bytes_from_hex_string_fn(
    args: &mut [QValue],
    _ctx: &PtrMut<Context>,
    _vm: &mut Executor,
) -> Result<QValue> {
    let value = one_arg(args, "BytesFromHexString")?;
    let QValue::Str(raw) = value else {
        return type_error("String", value);
    };

    fn hex_digit(b: u8) -> Option<u8> {
        match b {
            b'0'..=b'9' => Some(b - b'0'),
            b'a'..=b'f' => Some(b - b'a' + 10),
            b'A'..=b'F' => Some(b - b'A' + 10),
            _ => None,
        }
    }

    if raw.len() % 2 != 0 {
        return crate::error::range_error("hex string must have an even number of digits");
    }

    let mut out = Vec::with_capacity(raw.len() / 2);
    for pair in raw.chunks_exact(2) {
        let (Some(hi), Some(lo)) = (hex_digit(pair[0]), hex_digit(pair[1])) else {
            return crate::error::range_error("invalid hex digit");
        };
        out.push((hi << 4) | lo);
    }
    Ok(QValue::Bytes(out))
}

fn close_fn(args: &mut [QValue], _ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    let value = one_arg(args, "close")?;
    let QValue::Resource(handle) = value else {
        return type_error("Resource", value);
    };
    handle.close();
    Ok(QValue::Null)
}

/// `exit(code)`: sets the `Exit` flag on `ctx`, propagating all the way to the root. `code`
/// defaults to `0` if omitted.
fn exit_fn(args: &mut [QValue], ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    let code = match args {
        [] => QValue::Int(0),
        [value] => value.clone(),
        other => return arity_error(1, other.len()),
    };
    ctx.borrow_mut().do_exit(code);
    Ok(QValue::Null)
}

/// `require(name)`: legal only at file scope; delegates to [Executor::require]
fn require_fn(args: &mut [QValue], ctx: &PtrMut<Context>, vm: &mut Executor) -> Result<QValue> {
    let value = one_arg(args, "require")?;
    let QValue::Str(raw) = value else {
        return type_error("String", value);
    };
    let name = match std::str::from_utf8(raw) {
        Ok(name) => name.to_string(),
        Err(_) => return structural_error("require: module name must be valid UTF-8"),
    };
    vm.require(&name, ctx)?;
    Ok(QValue::Null)
}
