use quill::prelude::*;

/// A minimal loader serving one module by name, in place of a filesystem or network lookup
struct InMemoryLoader;

impl ScriptLoader for InMemoryLoader {
    fn load_script(&mut self, name: &str) -> Option<Script> {
        if name != "my_module" {
            return None;
        }

        // var square = 9 * 9
        let mut builder = ScriptBuilder::new("my_module");
        let nine = builder.new_const_int(9);
        let nine_again = builder.new_const_int(9);
        let mul = builder.push(OpCode::Mul, &[nine, nine_again]);
        let decl = builder.push_named(OpCode::NewVar, Some("square"), &[mul]);
        Some(builder.build(decl))
    }
}

fn main() {
    // require("my_module"); Println(square)
    let mut builder = ScriptBuilder::new("module");
    let name = builder.new_const_str("my_module");
    let name_args = builder.new_group(name);
    let require_call = builder.push_named(OpCode::CallFunction, Some("require"), &[name_args]);

    let square = builder.push_named(OpCode::ReadVar, Some("square"), &[]);
    let println_args = builder.new_group(square);
    let println = builder.push_named(OpCode::CallFunction, Some("Println"), &[println_args]);

    let entry = builder.new_group(require_call);
    builder.add_to_group(entry, println);
    let script = builder.build(entry);

    let settings = QuillSettings::default().with_script_loader(InMemoryLoader);
    Quill::with_settings(settings).run(script).unwrap();
}
