use quill::prelude::*;
use quill_ir::InstructionKey;

fn main() {
    // say_hello() ; say_hello("Alice") ; Println(plus(10, 20))
    let mut builder = ScriptBuilder::new("rust_function");

    let call_no_args =
        builder.push_named(OpCode::CallFunction, Some("say_hello"), &[InstructionKey::NULL]);

    let alice = builder.new_const_str("Alice");
    let alice_args = builder.new_group(alice);
    let call_with_name = builder.push_named(OpCode::CallFunction, Some("say_hello"), &[alice_args]);

    let ten = builder.new_const_int(10);
    let twenty = builder.new_const_int(20);
    let plus_args = builder.new_group(ten);
    builder.add_to_group(plus_args, twenty);
    let plus_result = builder.push_named(OpCode::CallFunction, Some("plus"), &[plus_args]);
    let println_args = builder.new_group(plus_result);
    let println = builder.push_named(OpCode::CallFunction, Some("Println"), &[println_args]);

    let entry = builder.new_group(call_no_args);
    builder.add_to_group(entry, call_with_name);
    builder.add_to_group(entry, println);
    let script = builder.build(entry);

    let mut quill = Quill::default();
    quill.register_host_fn("say_hello", say_hello);
    quill.register_host_fn("plus", plus);
    quill.run(script).unwrap();
}

fn say_hello(args: &mut [QValue], _ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    match args {
        [] => println!("Hello?"),
        [QValue::Str(name)] => println!("Hello, {}", String::from_utf8_lossy(name)),
        _ => return Err("say_hello expects no arguments or a single String".to_string().into()),
    }

    Ok(QValue::Null)
}

fn plus(args: &mut [QValue], _ctx: &PtrMut<Context>, _vm: &mut Executor) -> Result<QValue> {
    match args {
        [QValue::Int(a), QValue::Int(b)] => Ok(QValue::Int(a + b)),
        [QValue::Float(a), QValue::Float(b)] => Ok(QValue::Float(a + b)),
        _ => Err("plus expects two numbers of the same kind".to_string().into()),
    }
}
