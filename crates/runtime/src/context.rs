use quill_ir::InstructionKey;
use quill_memory::PtrMut;
use rustc_hash::FxHashMap;

use crate::{
    error::{name_error, structural_error, Result},
    value::QValue,
};

/// The kind of lexical frame a [Context] represents
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContextKind {
    /// The root frame of an executing script; only File frames register functions
    File,
    /// A user-defined function body
    Function,
    /// A `for`/`for-in` loop body
    For,
    /// A `switch` body
    Switch,
}

/// The non-local control-flow flags carried by a [Context]
///
/// `Continue`/`Break`/`Return`/`Exit` are modeled as plain flags rather than a
/// `Result<QValue, ControlFlow>` return type: this keeps the interrupt check at the top of
/// `Executor::eval` a single, auditable predicate, the same shape as
/// `original_source/vm.cc`'s `Executor::Execute` opening guard.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlFlags {
    pub continue_: bool,
    pub break_: bool,
    pub return_: bool,
    pub exit_: bool,
}

impl ControlFlags {
    /// True if any flag is set
    pub fn is_interrupted(self) -> bool {
        self.continue_ || self.break_ || self.return_ || self.exit_
    }

    /// Clears `Continue` only, used by for-loops between iterations
    pub fn clean_continue(&mut self) {
        self.continue_ = false;
    }
}

/// A lexically nested evaluation frame
///
/// Contexts are held behind [PtrMut] (`Rc<RefCell<_>>`) rather than by unique ownership: a host
/// function may be handed the current context and need to mutate it (`require`, `exit`), so
/// interior mutability is required even though execution is single-threaded.
#[derive(Debug)]
pub struct Context {
    kind: ContextKind,
    parent: Option<PtrMut<Context>>,
    vars: FxHashMap<String, QValue>,
    functions: FxHashMap<String, InstructionKey>,
    flags: ControlFlags,
    return_value: QValue,
}

impl Context {
    /// Creates a new context of the given kind with an optional parent
    pub fn new(kind: ContextKind, parent: Option<PtrMut<Context>>) -> PtrMut<Context> {
        let mut vars = FxHashMap::default();
        vars.insert("true".to_string(), QValue::Int(1));
        vars.insert("false".to_string(), QValue::Int(0));

        PtrMut::from(Self {
            kind,
            parent,
            vars,
            functions: FxHashMap::default(),
            flags: ControlFlags::default(),
            return_value: QValue::Null,
        })
    }

    /// This frame's kind
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// This frame's control flags
    pub fn flags(&self) -> ControlFlags {
        self.flags
    }

    /// True iff any control flag is set
    pub fn is_interrupted(&self) -> bool {
        self.flags.is_interrupted()
    }

    /// Clears `Continue` only
    pub fn clean_continue(&mut self) {
        self.flags.clean_continue();
    }

    /// Clears every flag, used when a `for`/`for-in` loop starts a fresh iteration
    pub fn clear_flags(&mut self) {
        self.flags = ControlFlags::default();
    }

    /// The value captured by the most recent `Return` or `Exit`
    pub fn return_value(&self) -> QValue {
        self.return_value.clone()
    }

    /// True iff any ancestor (including this frame) is a `Function` frame
    pub fn return_available(this: &PtrMut<Context>) -> bool {
        let mut current = this.clone();
        loop {
            if current.borrow().kind == ContextKind::Function {
                return true;
            }
            let next = current.borrow().parent.clone();
            match next {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// True iff this frame is a `For` or `Switch` frame
    pub fn break_available(&self) -> bool {
        matches!(self.kind, ContextKind::For | ContextKind::Switch)
    }

    /// True iff this frame is a `For` frame
    pub fn continue_available(&self) -> bool {
        matches!(self.kind, ContextKind::For)
    }

    fn is_reserved(name: &str) -> bool {
        name == "true" || name == "false"
    }

    /// Creates a binding in this frame; errors on duplicate declaration
    pub fn add_var(&mut self, name: &str) -> Result<()> {
        if Self::is_reserved(name) {
            return Ok(());
        }
        if self.vars.contains_key(name) {
            return structural_error(format!("duplicate variable declaration: {name}"));
        }
        self.vars.insert(name.to_string(), QValue::Null);
        Ok(())
    }

    /// Looks up `name` in this frame, then its parent chain
    pub fn get_var(this: &PtrMut<Context>, name: &str) -> Result<QValue> {
        let mut current = this.clone();
        loop {
            if let Some(value) = current.borrow().vars.get(name) {
                return Ok(value.clone());
            }
            let next = current.borrow().parent.clone();
            match next {
                Some(parent) => current = parent,
                None => return name_error(name),
            }
        }
    }

    /// Writes to the nearest existing binding in the chain, or creates one in the current frame
    pub fn set_var(this: &PtrMut<Context>, name: &str, value: QValue) {
        if Self::is_reserved(name) {
            return;
        }
        let mut current = this.clone();
        loop {
            if current.borrow().vars.contains_key(name) {
                current.borrow_mut().vars.insert(name.to_string(), value);
                return;
            }
            let next = current.borrow().parent.clone();
            match next {
                Some(parent) => current = parent,
                None => break,
            }
        }
        this.borrow_mut().vars.insert(name.to_string(), value);
    }

    /// Registers a function's `NewFunction` instruction key; valid only in `File` frames
    pub fn add_function(&mut self, name: &str, key: InstructionKey) -> Result<()> {
        if self.kind != ContextKind::File {
            return structural_error("functions can only be declared at file scope");
        }
        if self.functions.contains_key(name) {
            return structural_error(format!("duplicate function declaration: {name}"));
        }
        self.functions.insert(name.to_string(), key);
        Ok(())
    }

    /// Searches the root `File` context for a function, regardless of where the call originates
    pub fn get_function(this: &PtrMut<Context>, name: &str) -> Option<InstructionKey> {
        let mut current = this.clone();
        loop {
            if let Some(key) = current.borrow().functions.get(name) {
                return Some(*key);
            }
            let next = current.borrow().parent.clone();
            match next {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Sets `Return` and captures its value
    pub fn do_return(&mut self, value: QValue) {
        self.return_value = value;
        self.flags.return_ = true;
    }

    /// Sets `Break`
    pub fn do_break(&mut self) {
        self.flags.break_ = true;
    }

    /// Sets `Continue`
    pub fn do_continue(&mut self) {
        self.flags.continue_ = true;
    }

    /// Sets `Exit` and captures the script's exit code
    pub fn do_exit(&mut self, code: QValue) {
        self.return_value = code;
        self.flags.exit_ = true;
    }
}
