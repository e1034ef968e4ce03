mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::*;
use quill_ir::{OpCode, Script, ScriptBuilder};
use quill_runtime::{Executor, QValue, ScriptLoader};

/// Builds a tiny module that declares `var greeting = "hi"`, exposed for the requiring script
fn greeting_module() -> Script {
    let mut builder = ScriptBuilder::new("greeting");
    let hi = builder.new_const_str("hi");
    let decl = new_var(&mut builder, "greeting", Some(hi));
    finish(builder, decl)
}

struct CountingLoader {
    load_count: Rc<Cell<u32>>,
}

impl ScriptLoader for CountingLoader {
    fn load_script(&mut self, name: &str) -> Option<Script> {
        if name == "greeting" {
            self.load_count.set(self.load_count.get() + 1);
            Some(greeting_module())
        } else {
            None
        }
    }
}

/// spec.md §8: `require("m"); require("m")` has the same effect as a single `require("m")`
#[test]
fn require_is_idempotent_and_exposes_top_level_declarations() {
    let mut builder = ScriptBuilder::new("main");
    let name1 = builder.new_const_str("greeting");
    let req1 = call(&mut builder, "require", &[name1]);
    let name2 = builder.new_const_str("greeting");
    let req2 = call(&mut builder, "require", &[name2]);
    let greeting = read_var(&mut builder, "greeting");
    let entry = group(&mut builder, &[req1, req2, greeting]);
    let script = finish(builder, entry);

    let load_count = Rc::new(Cell::new(0));
    let mut vm = Executor::new();
    vm.set_script_loader(Box::new(CountingLoader {
        load_count: load_count.clone(),
    }));

    let result = expect_ok(vm.execute(script));
    assert_eq!(result, QValue::Str(b"hi".to_vec()));
    assert_eq!(load_count.get(), 1, "require must only load a given origin once");
}

#[test]
fn require_without_a_loader_is_a_runtime_error() {
    let mut builder = ScriptBuilder::new("main");
    let name = builder.new_const_str("greeting");
    let entry = call(&mut builder, "require", &[name]);
    let script = finish(builder, entry);

    let mut vm = Executor::new();
    expect_err(vm.execute(script));
}

#[test]
fn require_for_unknown_module_is_a_loader_error() {
    struct EmptyLoader;
    impl ScriptLoader for EmptyLoader {
        fn load_script(&mut self, _name: &str) -> Option<Script> {
            None
        }
    }

    let mut builder = ScriptBuilder::new("main");
    let name = builder.new_const_str("does_not_exist");
    let entry = call(&mut builder, "require", &[name]);
    let script = finish(builder, entry);

    let mut vm = Executor::new();
    vm.set_script_loader(Box::new(EmptyLoader));
    expect_err(vm.execute(script));
}

/// spec.md §9: relocation invariance — a script run alone behaves the same as after another load
#[test]
fn relocation_invariance() {
    let standalone = {
        let mut builder = ScriptBuilder::new("test");
        let two = builder.new_const_int(2);
        let three = builder.new_const_int(3);
        let add = bin(&mut builder, OpCode::Add, two, three);
        finish(builder, add)
    };
    let mut vm = Executor::new();
    let alone = expect_ok(vm.execute(standalone));

    let filler = {
        let mut builder = ScriptBuilder::new("filler");
        let one = builder.new_const_int(1);
        finish(builder, one)
    };
    let after_filler = {
        let mut builder = ScriptBuilder::new("test2");
        let two = builder.new_const_int(2);
        let three = builder.new_const_int(3);
        let add = bin(&mut builder, OpCode::Add, two, three);
        finish(builder, add)
    };
    let mut vm2 = Executor::new();
    expect_ok(vm2.execute(filler));
    let after = expect_ok(vm2.execute(after_filler));

    assert_eq!(alone, after);
}

/// A script can only be relocated once; loading the same `Script` value into two executors
/// (simulating a second relocation attempt) must fail on the second attempt.
#[test]
fn relocating_a_script_twice_is_an_error() {
    let mut builder = ScriptBuilder::new("test");
    let one = builder.new_const_int(1);
    let mut script = builder.build(one);

    script.relocate(0, 0).unwrap();
    assert!(script.relocate(100, 10).is_err());
}
