use smallvec::SmallVec;

use crate::op::OpCode;

/// A key identifying a node within a [Script](crate::Script)'s instruction graph
///
/// Keys are assigned by a [ScriptBuilder](crate::ScriptBuilder) in monotonically increasing
/// order starting from 1; key `0` is reserved for the builder's pre-populated `Nop` node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstructionKey(pub(crate) u32);

impl InstructionKey {
    /// The key of the `Nop` instruction that every script is pre-populated with
    pub const NULL: Self = Self(0);

    pub(crate) fn offset(self, base: u32) -> Self {
        Self(self.0 + base)
    }
}

/// A key identifying an entry in a [Script](crate::Script)'s constant pool
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstKey(pub(crate) u32);

impl ConstKey {
    pub(crate) fn offset(self, base: u32) -> Self {
        Self(self.0 + base)
    }
}

/// A single node in a script's flat instruction graph
///
/// Most opcodes carry between zero and four references to other nodes, which is why `refs` is
/// a `SmallVec` rather than a `Vec`: only `Group` nodes and call-argument lists grow past the
/// inline capacity.
#[derive(Clone, Debug)]
pub struct Instruction {
    pub(crate) opcode: OpCode,
    pub(crate) key: InstructionKey,
    /// The variable, function, or field name this node names, if any
    pub(crate) name: Option<Box<str>>,
    pub(crate) refs: SmallVec<[InstructionKey; 4]>,
    /// For `Const` nodes, the constant pool entry this node reads
    pub(crate) const_ref: Option<ConstKey>,
}

impl Instruction {
    /// The opcode carried by this node
    pub fn opcode(&self) -> OpCode {
        self.opcode
    }

    /// This node's key within its script
    pub fn key(&self) -> InstructionKey {
        self.key
    }

    /// The name associated with this node, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// This node's references to other nodes in the graph
    pub fn refs(&self) -> &[InstructionKey] {
        &self.refs
    }

    /// This node's constant pool reference, set only on `Const` nodes
    pub fn const_ref(&self) -> Option<ConstKey> {
        self.const_ref
    }

    /// True for the pre-populated `Nop` node found at key 0 in every script
    pub fn is_null(&self) -> bool {
        matches!(self.opcode, OpCode::Nop) && self.key == InstructionKey::NULL
    }
}
