mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::*;
use quill_ir::ScriptBuilder;
use quill_runtime::{Context, Executor, QValue, Resource, ResourceHandle, Result};

#[derive(Debug)]
struct CountingResource {
    closed: Rc<Cell<bool>>,
}

impl Resource for CountingResource {
    fn close(&mut self) {
        self.closed.set(true);
    }

    fn is_available(&self) -> bool {
        !self.closed.get()
    }
}

thread_local! {
    /// Lets the test observe the close state of the one resource `open_resource` hands out,
    /// since a `HostFn` is a bare function pointer and can't close over test-local state.
    static LAST_OPENED: RefCell<Option<Rc<Cell<bool>>>> = const { RefCell::new(None) };
}

fn open_resource(
    _args: &mut [QValue],
    _ctx: &quill_memory::PtrMut<Context>,
    _vm: &mut Executor,
) -> Result<QValue> {
    let closed = Rc::new(Cell::new(false));
    LAST_OPENED.with(|cell| *cell.borrow_mut() = Some(closed.clone()));
    Ok(QValue::Resource(ResourceHandle::new(CountingResource { closed })))
}

/// spec.md §3/§8: copies of a `Resource` value share the same underlying close state, unlike
/// every other value kind, which deep-copies on assignment
#[test]
fn copies_of_a_resource_share_close_state() {
    let mut builder = ScriptBuilder::new("test");
    let open = call(&mut builder, "open_resource", &[]);
    let decl = new_var(&mut builder, "r", Some(open));
    let r1 = read_var(&mut builder, "r");
    let decl2 = new_var(&mut builder, "r2", Some(r1));
    let r2_for_close = read_var(&mut builder, "r2");
    let close_call = call(&mut builder, "close", &[r2_for_close]);
    let entry = group(&mut builder, &[decl, decl2, close_call]);
    let script = finish(builder, entry);

    let mut vm = Executor::new();
    vm.register_host_fn("open_resource", open_resource);
    expect_ok(vm.execute(script));

    let closed = LAST_OPENED.with(|cell| cell.borrow().clone()).unwrap();
    assert!(closed.get(), "closing r2 must also close r, since both share the same resource");
}

#[test]
fn close_is_idempotent() {
    let closed = Rc::new(Cell::new(false));
    let handle = ResourceHandle::new(CountingResource {
        closed: closed.clone(),
    });
    handle.close();
    handle.close();
    assert!(closed.get());
    assert!(!handle.is_available());
}

/// spec.md §3/§5: a resource releases its handle when its last reference is dropped, even if
/// the script never calls `close()` explicitly
#[test]
fn dropping_the_last_reference_closes_the_resource() {
    let closed = Rc::new(Cell::new(false));
    let handle = ResourceHandle::new(CountingResource { closed: closed.clone() });
    let clone = handle.clone();
    drop(handle);
    assert!(!closed.get(), "a surviving clone must keep the resource open");
    drop(clone);
    assert!(closed.get(), "dropping the last reference must close the resource");
}

#[test]
fn closing_a_non_resource_is_a_type_error() {
    let mut builder = ScriptBuilder::new("test");
    let five = builder.new_const_int(5);
    let entry = call(&mut builder, "close", &[five]);
    let script = finish(builder, entry);

    let mut vm = Executor::new();
    expect_err(vm.execute(script));
}

#[test]
fn exit_sets_the_script_result_and_short_circuits_remaining_statements() {
    let mut builder = ScriptBuilder::new("test");
    let forty_two = builder.new_const_int(42);
    let exit_call = call(&mut builder, "exit", &[forty_two]);

    let ninety_nine = builder.new_const_int(99);
    let decl = new_var(&mut builder, "never_set", Some(ninety_nine));

    let entry = group(&mut builder, &[exit_call, decl]);
    let script = finish(builder, entry);

    let mut vm = Executor::new();
    let result = expect_ok(vm.execute(script));
    assert_eq!(result, QValue::Int(42));
}
