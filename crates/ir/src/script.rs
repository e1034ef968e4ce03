use crate::{
    error::{RelocationError, Result},
    instruction::{ConstKey, Instruction, InstructionKey},
    op::OpCode,
};

/// A constant pool entry
///
/// The constant pool only ever holds the literal types that can appear in source text; arrays,
/// maps, and bytes are all built at runtime via `CreateArray`/`CreateMap`/host functions instead.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue {
    Int(i64),
    Float(f64),
    Str(String),
}

/// A loaded, relocatable unit of instruction-graph + constant-pool data
///
/// Mirrors the "script" concept from the original interpreter: a dense arena of [Instruction]s
/// addressed by key, a parallel constant pool, and an entry point. Scripts start out addressed
/// from key `0`; [Script::relocate] shifts every key (and every reference to a key) by a fixed
/// base so that multiple scripts loaded into the same [Executor](quill_runtime) occupy disjoint
/// key space. A script may only be relocated once.
#[derive(Clone, Debug)]
pub struct Script {
    pub(crate) instructions: Vec<Instruction>,
    pub(crate) constants: Vec<ConstValue>,
    pub(crate) entry_point: InstructionKey,
    pub(crate) origin: String,
    pub(crate) instruction_base: u32,
    pub(crate) const_base: u32,
    pub(crate) relocated: bool,
}

impl Script {
    pub(crate) fn new(
        instructions: Vec<Instruction>,
        constants: Vec<ConstValue>,
        entry_point: InstructionKey,
        origin: String,
    ) -> Self {
        Self {
            instructions,
            constants,
            entry_point,
            origin,
            instruction_base: 0,
            const_base: 0,
            relocated: false,
        }
    }

    /// The name this script was loaded under, used to deduplicate `require` calls
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The instruction that execution of this script should begin at
    pub fn entry_point(&self) -> InstructionKey {
        self.entry_point
    }

    /// The base that every instruction key in this script has been shifted by
    pub fn instruction_base(&self) -> u32 {
        self.instruction_base
    }

    /// The base that every constant key in this script has been shifted by
    pub fn const_base(&self) -> u32 {
        self.const_base
    }

    /// The number of instruction slots this script occupies, for computing the next script's base
    pub fn instruction_count(&self) -> u32 {
        self.instructions.len() as u32
    }

    /// The number of constant slots this script occupies, for computing the next script's base
    pub fn const_count(&self) -> u32 {
        self.constants.len() as u32
    }

    /// Looks up an instruction by its (already relocated) key
    pub fn get(&self, key: InstructionKey) -> Option<&Instruction> {
        let index = key.0.checked_sub(self.instruction_base)?;
        self.instructions.get(index as usize)
    }

    /// Looks up a constant by its (already relocated) key
    pub fn get_const(&self, key: ConstKey) -> Option<&ConstValue> {
        let index = key.0.checked_sub(self.const_base)?;
        self.constants.get(index as usize)
    }

    /// Shifts every instruction key, constant key, and reference to either in this script by the
    /// given bases
    ///
    /// A freshly-built script is addressed from zero; this is called exactly once, when the
    /// script is loaded into an [Executor](quill_runtime), so that its key space doesn't collide
    /// with any previously-loaded script. Calling this a second time is an error.
    pub fn relocate(&mut self, instruction_base: u32, const_base: u32) -> Result<()> {
        if self.instruction_base != 0 || self.const_base != 0 || self.relocated {
            return Err(RelocationError::AlreadyRelocated);
        }

        let instruction_count = self.instructions.len() as u32;
        let const_count = self.constants.len() as u32;

        for instruction in &mut self.instructions {
            if instruction.opcode == OpCode::Const {
                if let Some(const_ref) = instruction.const_ref {
                    if const_ref.0 >= const_count {
                        return Err(RelocationError::KeyOutOfRange(const_ref.0));
                    }
                    instruction.const_ref = Some(const_ref.offset(const_base));
                }
            }
            for r in &mut instruction.refs {
                if r.0 >= instruction_count {
                    return Err(RelocationError::KeyOutOfRange(r.0));
                }
                *r = r.offset(instruction_base);
            }
            instruction.key = instruction.key.offset(instruction_base);
        }

        self.entry_point = self.entry_point.offset(instruction_base);
        self.instruction_base = instruction_base;
        self.const_base = const_base;
        self.relocated = true;

        Ok(())
    }

    /// Renders a node and its descendants as an indented tree, for debugging
    pub fn dump(&self, key: InstructionKey) -> String {
        let mut out = String::new();
        self.dump_into(key, 0, &mut out);
        out
    }

    fn dump_into(&self, key: InstructionKey, depth: usize, out: &mut String) {
        let Some(instruction) = self.get(key) else {
            out.push_str(&"\t".repeat(depth));
            out.push_str("<dangling>\n");
            return;
        };

        out.push_str(&"\t".repeat(depth));
        out.push_str(&format!("{:?} {:?}", instruction.key, instruction.opcode));
        if let Some(name) = &instruction.name {
            out.push_str(&format!(" {name}"));
        }
        if let Some(const_ref) = instruction.const_ref {
            if let Some(value) = self.get_const(const_ref) {
                out.push_str(&format!(" {value:?}"));
            }
        }
        out.push('\n');

        for r in instruction.refs.clone() {
            self.dump_into(r, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::ScriptBuilder;

    use super::*;

    fn two_plus_three() -> Script {
        let mut builder = ScriptBuilder::new("test");
        let two = builder.new_const_int(2);
        let three = builder.new_const_int(3);
        let add = builder.push(OpCode::Add, &[two, three]);
        builder.build(add)
    }

    #[test]
    fn relocate_shifts_keys_and_refs() {
        let mut script = two_plus_three();
        script.relocate(100, 10).unwrap();

        assert_eq!(script.instruction_base(), 100);
        assert_eq!(script.const_base(), 10);

        let entry = script.get(script.entry_point()).unwrap();
        assert_eq!(entry.opcode(), OpCode::Add);
        assert_eq!(entry.refs().len(), 2);
        for r in entry.refs() {
            let konst = script.get(*r).unwrap();
            assert!(konst.const_ref().unwrap().0 >= 10);
        }
    }

    #[test]
    fn relocate_twice_is_an_error() {
        let mut script = two_plus_three();
        script.relocate(100, 10).unwrap();
        assert_eq!(script.relocate(200, 20), Err(RelocationError::AlreadyRelocated));
    }

    #[test]
    fn dump_renders_nested_groups() {
        let mut builder = ScriptBuilder::new("test");
        let one = builder.new_const_int(1);
        let group = builder.new_group(one);
        let two = builder.new_const_int(2);
        builder.add_to_group(group, two);
        let script = builder.build(group);

        let rendered = script.dump(script.entry_point());
        assert!(rendered.contains("Group"));
        assert!(rendered.contains("Int(1)"));
        assert!(rendered.contains("Int(2)"));
    }
}
