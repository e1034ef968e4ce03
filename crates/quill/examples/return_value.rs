use quill::prelude::*;

fn main() -> quill::Result<()> {
    // 1 + 2
    let mut builder = ScriptBuilder::new("return_value");
    let one = builder.new_const_int(1);
    let two = builder.new_const_int(2);
    let entry = builder.push(OpCode::Add, &[one, two]);
    let script = builder.build(entry);

    match Quill::default().run(script)? {
        QValue::Int(result) => {
            println!("The result is {result}");
        }
        other => panic!("Expected an Integer, found a {}", other.type_name()),
    }

    Ok(())
}
