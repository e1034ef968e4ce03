use smallvec::SmallVec;

use crate::{
    instruction::{ConstKey, Instruction, InstructionKey},
    op::OpCode,
    script::{ConstValue, Script},
};

/// Assembles a [Script]'s instruction graph and constant pool
///
/// This stands in for the parser's output contract: a real parser would walk source text and
/// call these methods to build the graph node by node, exactly the way
/// `Script::New*`/`Script::NewConst` do in the original interpreter. Keys are handed out in
/// monotonically increasing order starting from 1; key `0` is reserved up front for a `Nop`
/// node, matching [InstructionKey::NULL].
pub struct ScriptBuilder {
    instructions: Vec<Instruction>,
    constants: Vec<ConstValue>,
    next_instruction: u32,
    next_const: u32,
    origin: String,
}

impl ScriptBuilder {
    /// Starts a new builder, pre-populating the `Nop` node at [InstructionKey::NULL]
    pub fn new(origin: impl Into<String>) -> Self {
        let null = Instruction {
            opcode: OpCode::Nop,
            key: InstructionKey::NULL,
            name: None,
            refs: SmallVec::new(),
            const_ref: None,
        };
        Self {
            instructions: vec![null],
            constants: Vec::new(),
            next_instruction: 1,
            next_const: 0,
            origin: origin.into(),
        }
    }

    fn alloc_key(&mut self) -> InstructionKey {
        let key = InstructionKey(self.next_instruction);
        self.next_instruction += 1;
        key
    }

    /// Appends a new node with the given opcode and references, returning its key
    pub fn push(&mut self, opcode: OpCode, refs: &[InstructionKey]) -> InstructionKey {
        self.push_named(opcode, None, refs)
    }

    /// Appends a new node with a name attached (`NewVar`, `ReadVar`, `WriteVar`, `NewFunction`,
    /// `CallFunction`, and the compound-assignment opcodes all carry a name)
    pub fn push_named(
        &mut self,
        opcode: OpCode,
        name: Option<&str>,
        refs: &[InstructionKey],
    ) -> InstructionKey {
        let key = self.alloc_key();
        self.instructions.push(Instruction {
            opcode,
            key,
            name: name.map(Into::into),
            refs: refs.iter().copied().collect(),
            const_ref: None,
        });
        key
    }

    /// Starts a `Group` node (a statement list) containing a single element
    pub fn new_group(&mut self, first: InstructionKey) -> InstructionKey {
        self.push(OpCode::Group, &[first])
    }

    /// Appends another element to an existing `Group` node
    ///
    /// Panics if `group` doesn't refer to a `Group` node previously returned by
    /// [ScriptBuilder::new_group] from this same builder.
    pub fn add_to_group(&mut self, group: InstructionKey, element: InstructionKey) {
        let instruction = &mut self.instructions[group.0 as usize];
        assert_eq!(instruction.opcode, OpCode::Group, "key does not name a Group node");
        instruction.refs.push(element);
    }

    fn new_const(&mut self, value: ConstValue) -> InstructionKey {
        let const_key = ConstKey(self.next_const);
        self.next_const += 1;
        self.constants.push(value);

        let key = self.alloc_key();
        self.instructions.push(Instruction {
            opcode: OpCode::Const,
            key,
            name: None,
            refs: SmallVec::new(),
            const_ref: Some(const_key),
        });
        key
    }

    /// Appends a `Const` node reading an integer literal
    pub fn new_const_int(&mut self, value: i64) -> InstructionKey {
        self.new_const(ConstValue::Int(value))
    }

    /// Appends a `Const` node reading a float literal
    pub fn new_const_float(&mut self, value: f64) -> InstructionKey {
        self.new_const(ConstValue::Float(value))
    }

    /// Appends a `Const` node reading a string literal
    pub fn new_const_str(&mut self, value: impl Into<String>) -> InstructionKey {
        self.new_const(ConstValue::Str(value.into()))
    }

    /// Consumes the builder, producing a [Script] with the given entry point
    ///
    /// The returned script is addressed from key `0`; it must be relocated before being loaded
    /// alongside any other script.
    pub fn build(self, entry_point: InstructionKey) -> Script {
        Script::new(self.instructions, self.constants, entry_point, self.origin)
    }
}
