use criterion::{criterion_group, criterion_main, Criterion};
use quill::prelude::*;
use quill_ir::InstructionKey;

/// Builds `func fib(n) { if (n < 2) return n; return fib(n-1) + fib(n-2); } Println(fib(count))`
fn fib_script(count: i64) -> Script {
    let mut builder = ScriptBuilder::new("fib_recursive");

    let n_for_cond = builder.push_named(OpCode::ReadVar, Some("n"), &[]);
    let two = builder.new_const_int(2);
    let cond = builder.push(OpCode::Lt, &[n_for_cond, two]);
    let n_for_return = builder.push_named(OpCode::ReadVar, Some("n"), &[]);
    let early_return = builder.push(OpCode::ReturnStatement, &[n_for_return]);
    let if_branch = builder.push(OpCode::ConditionExpression, &[cond, early_return]);
    let if_node = builder.push(OpCode::IfStatement, &[if_branch, InstructionKey::NULL, InstructionKey::NULL]);

    let n1 = builder.push_named(OpCode::ReadVar, Some("n"), &[]);
    let one = builder.new_const_int(1);
    let n_minus_1 = builder.push(OpCode::Sub, &[n1, one]);
    let fib_args_1 = builder.new_group(n_minus_1);
    let fib_1 = builder.push_named(OpCode::CallFunction, Some("fib"), &[fib_args_1]);

    let n2 = builder.push_named(OpCode::ReadVar, Some("n"), &[]);
    let two_again = builder.new_const_int(2);
    let n_minus_2 = builder.push(OpCode::Sub, &[n2, two_again]);
    let fib_args_2 = builder.new_group(n_minus_2);
    let fib_2 = builder.push_named(OpCode::CallFunction, Some("fib"), &[fib_args_2]);

    let sum = builder.push(OpCode::Add, &[fib_1, fib_2]);
    let final_return = builder.push(OpCode::ReturnStatement, &[sum]);

    let body = builder.new_group(if_node);
    builder.add_to_group(body, final_return);
    let formal_n = builder.push_named(OpCode::NewVar, Some("n"), &[]);
    let formals = builder.new_group(formal_n);
    let decl = builder.push_named(OpCode::NewFunction, Some("fib"), &[formals, body]);

    let n_value = builder.new_const_int(count);
    let call_args = builder.new_group(n_value);
    let call_fib = builder.push_named(OpCode::CallFunction, Some("fib"), &[call_args]);

    let entry = builder.new_group(decl);
    builder.add_to_group(entry, call_fib);
    builder.build(entry)
}

/// Builds `var total = 0; for (var i = 0; i < count; i += 1) total += i`
fn loop_script(count: i64) -> Script {
    let mut builder = ScriptBuilder::new("sum_loop");
    let zero = builder.new_const_int(0);
    let total_decl = builder.push_named(OpCode::NewVar, Some("total"), &[zero]);

    let zero_again = builder.new_const_int(0);
    let init = builder.push_named(OpCode::NewVar, Some("i"), &[zero_again]);
    let i_for_cond = builder.push_named(OpCode::ReadVar, Some("i"), &[]);
    let bound = builder.new_const_int(count);
    let cond = builder.push(OpCode::Lt, &[i_for_cond, bound]);

    let i_for_add = builder.push_named(OpCode::ReadVar, Some("i"), &[]);
    let body = builder.push_named(OpCode::AddWrite, Some("total"), &[i_for_add]);
    let post = builder.push_named(OpCode::IncWrite, Some("i"), &[]);

    let loop_node = builder.push(OpCode::ForStatement, &[init, cond, post, body]);

    let entry = builder.new_group(total_decl);
    builder.add_to_group(entry, loop_node);
    builder.build(entry)
}

fn quill_benchmark(c: &mut Criterion) {
    let fib = fib_script(20);
    c.bench_function("fib_recursive", |b| {
        b.iter(|| {
            Quill::default().run(fib.clone()).unwrap();
        })
    });

    let sum_loop = loop_script(100_000);
    c.bench_function("sum_loop", |b| {
        b.iter(|| {
            Quill::default().run(sum_loop.clone()).unwrap();
        })
    });
}

criterion_group!(benches, quill_benchmark);
criterion_main!(benches);
