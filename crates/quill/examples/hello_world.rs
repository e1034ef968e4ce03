use quill::prelude::*;

fn main() -> quill::Result<()> {
    // `Println("Hello, World!")`, built by hand since this crate has no parser of its own.
    let mut builder = ScriptBuilder::new("hello_world");
    let greeting = builder.new_const_str("Hello, World!");
    let args = builder.new_group(greeting);
    let entry = builder.push_named(OpCode::CallFunction, Some("Println"), &[args]);
    let script = builder.build(entry);

    Quill::default().run(script)?;

    Ok(())
}
