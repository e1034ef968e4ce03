use quill_ir::{ConstValue, Instruction, InstructionKey, OpCode, Script};
use quill_memory::PtrMut;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    context::{Context, ContextKind},
    error::{arity_error, loader_error, name_error, structural_error, Result},
    io::{DefaultStdout, QuillWrite},
    value::QValue,
};

/// The native-function ABI every host function implements
///
/// A bare function pointer rather than a boxed closure: host functions are stateless entry
/// points that reach whatever state they need through `ctx` and `vm`, mirroring
/// `original_source/vm.hpp`'s `RUNTIME_FUNCTION` typedef.
pub type HostFn = fn(&mut [QValue], &PtrMut<Context>, &mut Executor) -> Result<QValue>;

/// Supplies additional scripts on demand, invoked from the `require` host function
pub trait ScriptLoader {
    /// Loads the script named `name`, or returns `None` if no such script exists
    fn load_script(&mut self, name: &str) -> Option<Script>;
}

/// Recursively evaluates instruction graphs, owns the script list, host-function registry, and
/// script loader
pub struct Executor {
    scripts: Vec<Script>,
    host_fns: FxHashMap<String, HostFn>,
    loaded_origins: FxHashSet<String>,
    loader: Option<Box<dyn ScriptLoader>>,
    stdout: Box<dyn QuillWrite>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    /// Creates an executor with the baseline host functions registered and stdout wired to the
    /// process's real stdout
    pub fn new() -> Self {
        let mut executor = Self {
            scripts: Vec::new(),
            host_fns: FxHashMap::default(),
            loaded_origins: FxHashSet::default(),
            loader: None,
            stdout: Box::new(DefaultStdout),
        };
        crate::host::register_builtins(&mut executor);
        executor
    }

    /// Installs the script loader consulted by `require`
    pub fn set_script_loader(&mut self, loader: Box<dyn ScriptLoader>) {
        self.loader = Some(loader);
    }

    /// Replaces the sink `Println` and friends write to
    pub fn set_stdout(&mut self, stdout: Box<dyn QuillWrite>) {
        self.stdout = stdout;
    }

    /// The sink `Println` and friends write to
    pub fn stdout(&self) -> &dyn QuillWrite {
        self.stdout.as_ref()
    }

    /// Registers a host function under `name`, shadowed by any user-defined function of the
    /// same name
    pub fn register_host_fn(&mut self, name: &str, f: HostFn) {
        self.host_fns.insert(name.to_string(), f);
    }

    fn next_instruction_base(&self) -> u32 {
        self.scripts
            .iter()
            .map(|s| s.instruction_base() + s.instruction_count())
            .max()
            .unwrap_or(0)
    }

    fn next_const_base(&self) -> u32 {
        self.scripts
            .iter()
            .map(|s| s.const_base() + s.const_count())
            .max()
            .unwrap_or(0)
    }

    fn load(&mut self, mut script: Script) -> Result<InstructionKey> {
        let instruction_base = self.next_instruction_base();
        let const_base = self.next_const_base();
        script
            .relocate(instruction_base, const_base)
            .map_err(|e| crate::Error::from(e.to_string()))?;
        self.loaded_origins.insert(script.origin().to_string());
        let entry = script.entry_point();
        self.scripts.push(script);
        Ok(entry)
    }

    /// Loads `script` as the root program and evaluates it from its entry point under a fresh
    /// `File` context, returning the entry instruction's own result (or the `Exit` code, if the
    /// script exited explicitly).
    ///
    /// A multi-statement script's entry point is a `Group`, and `Group` always evaluates to
    /// `Null` regardless of its last child's value — matching `original_source/vm.cc`'s `kGroup`
    /// case, which discards the list's value the same way. Only a single top-level expression
    /// (no `Group` wrapper) yields its own value here.
    pub fn execute(&mut self, script: Script) -> Result<QValue> {
        let entry = self.load(script)?;
        let ctx = Context::new(ContextKind::File, None);
        let result = self.eval(entry, &ctx).map_err(|e| self.trace_frame(entry, e))?;
        if ctx.borrow().flags().exit_ {
            Ok(ctx.borrow().return_value())
        } else {
            Ok(result)
        }
    }

    /// The `require(name)` host function's implementation: loads `name` via the installed
    /// [ScriptLoader] unless already loaded, then executes it under `ctx` so its top-level
    /// declarations become visible to the caller
    pub(crate) fn require(&mut self, name: &str, ctx: &PtrMut<Context>) -> Result<()> {
        if ctx.borrow().kind() != ContextKind::File {
            return structural_error("require must be called at file scope");
        }
        if self.loaded_origins.contains(name) {
            return Ok(());
        }
        let Some(loader) = self.loader.as_mut() else {
            return loader_error(format!("no script loader installed, cannot require '{name}'"));
        };
        let Some(script) = loader.load_script(name) else {
            return loader_error(format!("failed to load script '{name}'"));
        };
        let entry = self.load(script)?;
        self.eval(entry, ctx).map_err(|e| self.trace_frame(entry, e))?;
        Ok(())
    }

    fn with_owning_script<R>(&self, key: InstructionKey, f: impl FnOnce(&Script) -> R) -> Result<R> {
        for script in self.scripts.iter().rev() {
            if script.get(key).is_some() {
                return Ok(f(script));
            }
        }
        name_error(&format!("instruction {key:?} does not belong to any loaded script"))
    }

    /// Extends an error's trace with the origin of the script owning `key`, used at frame
    /// boundaries (script entry, `require`, user-function call) the same way
    /// `original_source/vm.cc` attaches the current script name when unwinding a call
    fn trace_frame(&self, key: InstructionKey, mut error: crate::Error) -> crate::Error {
        if let Ok(origin) = self.with_owning_script(key, |script| script.origin().to_string()) {
            error.extend_trace(&origin, key);
        }
        error
    }

    fn resolve(&self, key: InstructionKey) -> Result<(Instruction, Option<ConstValue>)> {
        self.with_owning_script(key, |script| {
            let instruction = script.get(key).expect("checked by with_owning_script").clone();
            let constant = instruction
                .const_ref()
                .and_then(|const_key| script.get_const(const_key))
                .cloned();
            (instruction, constant)
        })
    }

    fn instruction_at(&self, key: InstructionKey) -> Result<Instruction> {
        self.with_owning_script(key, |script| {
            script.get(key).expect("checked by with_owning_script").clone()
        })
    }

    /// Evaluates a single instruction node under `ctx`, recursively evaluating its references
    pub fn eval(&mut self, key: InstructionKey, ctx: &PtrMut<Context>) -> Result<QValue> {
        if ctx.borrow().is_interrupted() {
            return Ok(ctx.borrow().return_value());
        }

        let (instruction, constant) = self.resolve(key)?;
        let opcode = instruction.opcode();

        if opcode.is_arithmetic() {
            return self.eval_binary(&instruction, ctx);
        }
        if opcode.is_compound_assign() {
            return self.eval_update(&instruction, ctx);
        }

        match opcode {
            OpCode::Nop => Ok(QValue::Null),
            OpCode::Const => Ok(const_to_value(
                constant.expect("Const node without a constant-pool entry"),
            )),
            OpCode::NewVar => self.eval_new_var(&instruction, ctx),
            OpCode::ReadVar => Context::get_var(ctx, instruction_name(&instruction)?),
            OpCode::WriteVar => self.eval_write_var(&instruction, ctx),
            OpCode::NewFunction => self.eval_new_function(&instruction, ctx),
            OpCode::CallFunction => self.eval_call(&instruction, ctx),
            OpCode::Group => self.eval_group(&instruction, ctx),
            OpCode::ConditionExpression => self.eval_condition_expression(&instruction, ctx),
            OpCode::IfStatement => self.eval_if(&instruction, ctx),
            OpCode::ReturnStatement => self.eval_return(&instruction, ctx),
            OpCode::BreakStatement => self.eval_break(ctx),
            OpCode::ContinueStatement => self.eval_continue(ctx),
            OpCode::ForStatement => self.eval_for(&instruction, ctx),
            OpCode::ForInStatement => self.eval_for_in(&instruction, ctx),
            OpCode::SwitchCaseStatement => self.eval_switch(&instruction, ctx),
            OpCode::CreateMap => self.eval_create_map(&instruction, ctx),
            OpCode::CreateArray => self.eval_create_array(&instruction, ctx),
            OpCode::ReadAt => self.eval_read_at(&instruction, ctx),
            OpCode::WriteAt => self.eval_write_at(&instruction, ctx),
            OpCode::Slice => self.eval_slice(&instruction, ctx),
            _ => unreachable!("opcode {opcode:?} should be dispatched via eval_binary/eval_update"),
        }
    }

    fn eval_binary(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let refs = instr.refs();
        let lhs = self.eval(refs[0], ctx)?;

        match instr.opcode() {
            OpCode::Not => return Ok(lhs.not()),
            OpCode::BitNot => return lhs.bit_not(),
            OpCode::Negate => return lhs.negate(),
            _ => {}
        }

        let rhs = self.eval(refs[1], ctx)?;
        match instr.opcode() {
            OpCode::Add => lhs.add(&rhs),
            OpCode::Sub => lhs.sub(&rhs),
            OpCode::Mul => lhs.mul(&rhs),
            OpCode::Div => lhs.div(&rhs),
            OpCode::Mod => lhs.rem(&rhs),
            OpCode::Gt => Ok(QValue::Int((lhs.compare(&rhs)?.is_gt()) as i64)),
            OpCode::Ge => Ok(QValue::Int((!lhs.compare(&rhs)?.is_lt()) as i64)),
            OpCode::Lt => Ok(QValue::Int((lhs.compare(&rhs)?.is_lt()) as i64)),
            OpCode::Le => Ok(QValue::Int((!lhs.compare(&rhs)?.is_gt()) as i64)),
            OpCode::Eq => Ok(QValue::Int(lhs.values_equal(&rhs) as i64)),
            OpCode::Ne => Ok(QValue::Int(!lhs.values_equal(&rhs) as i64)),
            OpCode::Or => Ok(QValue::Int((lhs.is_truthy() || rhs.is_truthy()) as i64)),
            OpCode::And => Ok(QValue::Int((lhs.is_truthy() && rhs.is_truthy()) as i64)),
            OpCode::BitAnd => lhs.bit_and(&rhs),
            OpCode::BitOr => lhs.bit_or(&rhs),
            OpCode::BitXor => lhs.bit_xor(&rhs),
            OpCode::ShiftLeft => lhs.shift_left(&rhs),
            OpCode::ShiftRight => lhs.shift_right(&rhs),
            other => unreachable!("{other:?} is not a binary opcode"),
        }
    }

    fn eval_update(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let name = instruction_name(instr)?;

        if instr.opcode().is_unary_write() {
            let old = Context::get_var(ctx, name)?;
            let QValue::Int(i) = old else {
                return crate::error::type_error("Integer", &old);
            };
            let new_value = match instr.opcode() {
                OpCode::IncWrite => QValue::Int(i + 1),
                OpCode::DecWrite => QValue::Int(i - 1),
                other => unreachable!("{other:?} is not a unary-write opcode"),
            };
            Context::set_var(ctx, name, new_value);
            return Ok(QValue::Null);
        }

        let rhs = self.eval(instr.refs()[0], ctx)?;
        let new_value = if instr.opcode() == OpCode::Write {
            rhs
        } else {
            let old = Context::get_var(ctx, name)?;
            match instr.opcode() {
                OpCode::AddWrite => old.add_assign(&rhs)?,
                OpCode::SubWrite => old.sub(&rhs)?,
                OpCode::MulWrite => old.mul(&rhs)?,
                OpCode::DivWrite => old.div(&rhs)?,
                OpCode::BitOrWrite => old.bit_or(&rhs)?,
                OpCode::BitAndWrite => old.bit_and(&rhs)?,
                OpCode::BitXorWrite => old.bit_xor(&rhs)?,
                OpCode::ShiftLeftWrite => old.shift_left(&rhs)?,
                OpCode::ShiftRightWrite => old.shift_right(&rhs)?,
                other => unreachable!("{other:?} is not a compound-assignment opcode"),
            }
        };
        Context::set_var(ctx, name, new_value);
        Ok(QValue::Null)
    }

    fn eval_new_var(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let name = instruction_name(instr)?;
        ctx.borrow_mut().add_var(name)?;
        match instr.refs().first() {
            Some(&init) => {
                let value = self.eval(init, ctx)?;
                Context::set_var(ctx, name, value.clone());
                Ok(value)
            }
            None => Ok(QValue::Null),
        }
    }

    fn eval_write_var(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let name = instruction_name(instr)?;
        let value = self.eval(instr.refs()[0], ctx)?;
        Context::set_var(ctx, name, value);
        Ok(QValue::Null)
    }

    fn eval_new_function(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let name = instruction_name(instr)?;
        ctx.borrow_mut().add_function(name, instr.key())?;
        Ok(QValue::Null)
    }

    fn eval_group(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        for &r in instr.refs() {
            self.eval(r, ctx)?;
            if ctx.borrow().is_interrupted() {
                break;
            }
        }
        Ok(QValue::Null)
    }

    fn eval_condition_expression(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let refs = instr.refs();
        let cond = self.eval(refs[0], ctx)?;
        if cond.is_truthy() {
            self.eval(refs[1], ctx)?;
        }
        Ok(cond)
    }

    /// `cond` is itself a `ConditionExpression` bundling the main branch's action; `thenChain`
    /// holds the `else if` chain as further `ConditionExpression` nodes.
    fn eval_if(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let refs = instr.refs();
        let (cond_key, chain_key, else_key) = (refs[0], refs[1], refs[2]);

        let mut val = self.eval(cond_key, ctx)?;
        if val.is_truthy() {
            return Ok(QValue::Null);
        }

        let chain = self.instruction_at(chain_key)?;
        if chain.opcode() != OpCode::Nop {
            for &branch in chain.refs() {
                val = self.eval(branch, ctx)?;
                if val.is_truthy() || ctx.borrow().is_interrupted() {
                    break;
                }
            }
        }

        if val.is_truthy() || ctx.borrow().is_interrupted() {
            return Ok(QValue::Null);
        }

        let else_instr = self.instruction_at(else_key)?;
        if else_instr.opcode() != OpCode::Nop {
            self.eval(else_key, ctx)?;
        }
        Ok(QValue::Null)
    }

    fn eval_return(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        if !Context::return_available(ctx) {
            return structural_error("return used outside of a function body");
        }
        let value = self.eval(instr.refs()[0], ctx)?;
        ctx.borrow_mut().do_return(value);
        Ok(QValue::Null)
    }

    fn eval_break(&mut self, ctx: &PtrMut<Context>) -> Result<QValue> {
        if !ctx.borrow().break_available() {
            return structural_error("break used outside of a for or switch block");
        }
        ctx.borrow_mut().do_break();
        Ok(QValue::Null)
    }

    fn eval_continue(&mut self, ctx: &PtrMut<Context>) -> Result<QValue> {
        if !ctx.borrow().continue_available() {
            return structural_error("continue used outside of a for block");
        }
        ctx.borrow_mut().do_continue();
        Ok(QValue::Null)
    }

    fn eval_for(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let refs = instr.refs();
        let (init, cond, post, body) = (refs[0], refs[1], refs[2], refs[3]);
        let loop_ctx = Context::new(ContextKind::For, Some(ctx.clone()));

        if self.instruction_at(init)?.opcode() != OpCode::Nop {
            self.eval(init, &loop_ctx)?;
        }

        loop {
            if self.instruction_at(cond)?.opcode() != OpCode::Nop {
                let val = self.eval(cond, &loop_ctx)?;
                if !val.is_truthy() {
                    break;
                }
            }

            self.eval(body, &loop_ctx)?;
            loop_ctx.borrow_mut().clean_continue();
            let flags = loop_ctx.borrow().flags();
            if flags.break_ || flags.return_ || flags.exit_ {
                break;
            }

            if self.instruction_at(post)?.opcode() != OpCode::Nop {
                self.eval(post, &loop_ctx)?;
            }
        }

        propagate_flags(ctx, &loop_ctx, PropagationPolicy::FOR_LOOP);
        Ok(QValue::Null)
    }

    fn eval_for_in(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let refs = instr.refs();
        let (iter_key, body) = (refs[0], refs[1]);
        let name = instruction_name(instr)?;
        let (key_name, val_name) = split_for_in_name(name);

        let loop_ctx = Context::new(ContextKind::For, Some(ctx.clone()));
        let iterable = self.eval(iter_key, &loop_ctx)?;

        macro_rules! run_iteration {
            ($key:expr, $val:expr) => {{
                if let Some(key_name) = &key_name {
                    Context::set_var(&loop_ctx, key_name, $key);
                }
                Context::set_var(&loop_ctx, &val_name, $val);
                self.eval(body, &loop_ctx)?;
                loop_ctx.borrow_mut().clean_continue();
                let flags = loop_ctx.borrow().flags();
                if flags.break_ || flags.return_ || flags.exit_ {
                    break;
                }
            }};
        }

        match &iterable {
            QValue::Str(bytes) | QValue::Bytes(bytes) => {
                for (i, byte) in bytes.iter().enumerate() {
                    run_iteration!(QValue::Int(i as i64), QValue::Int(*byte as i64));
                }
            }
            QValue::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    run_iteration!(QValue::Int(i as i64), item.clone());
                }
            }
            QValue::Map(map) => {
                for (k, v) in map.iter() {
                    run_iteration!(k.clone(), v.clone());
                }
            }
            _ => return crate::error::type_error("String, Bytes, Array, or Map", &iterable),
        }

        propagate_flags(ctx, &loop_ctx, PropagationPolicy::FOR_LOOP);
        Ok(QValue::Null)
    }

    fn eval_switch(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let refs = instr.refs();
        let (value_key, cases_key, default_key) = (refs[0], refs[1], refs[2]);
        let switch_ctx = Context::new(ContextKind::Switch, Some(ctx.clone()));

        let value = self.eval(value_key, &switch_ctx)?;
        let cases = self.instruction_at(cases_key)?;

        let mut matched = false;
        for &case_key in cases.refs() {
            let case = self.instruction_at(case_key)?;
            let conditions = self.instruction_at(case.refs()[0])?;
            let actions = case.refs()[1];

            let mut hit = false;
            for &cond_key in conditions.refs() {
                let cond_value = self.eval(cond_key, &switch_ctx)?;
                if value.values_equal(&cond_value) {
                    hit = true;
                    break;
                }
            }
            if hit {
                matched = true;
                self.eval(actions, &switch_ctx)?;
                break;
            }
        }

        if !matched && self.instruction_at(default_key)?.opcode() != OpCode::Nop {
            self.eval(default_key, &switch_ctx)?;
        }

        propagate_flags(ctx, &switch_ctx, PropagationPolicy::SWITCH);
        Ok(QValue::Null)
    }

    fn eval_create_map(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let list = self.instruction_at(instr.refs()[0])?;
        let mut map = std::collections::BTreeMap::new();
        for &pair_key in list.refs() {
            let pair = self.instruction_at(pair_key)?;
            let key = self.eval(pair.refs()[0], ctx)?;
            let value = self.eval(pair.refs()[1], ctx)?;
            map.insert(key, value);
        }
        Ok(QValue::Map(map))
    }

    fn eval_create_array(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let list = self.instruction_at(instr.refs()[0])?;
        let mut items = Vec::with_capacity(list.refs().len());
        for &item_key in list.refs() {
            items.push(self.eval(item_key, ctx)?);
        }
        Ok(QValue::Array(items))
    }

    fn eval_read_at(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let name = instruction_name(instr)?;
        let index = self.eval(instr.refs()[0], ctx)?;
        let target = Context::get_var(ctx, name)?;
        target.index_get(&index)
    }

    fn eval_write_at(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let name = instruction_name(instr)?;
        let index = self.eval(instr.refs()[0], ctx)?;
        let value = self.eval(instr.refs()[1], ctx)?;
        let mut target = Context::get_var(ctx, name)?;
        target.index_set(&index, value)?;
        Context::set_var(ctx, name, target.clone());
        Ok(target)
    }

    fn eval_slice(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let name = instruction_name(instr)?;
        let refs = instr.refs();
        let from = self.eval_slice_bound(refs[0], ctx)?;
        let to = self.eval_slice_bound(refs[1], ctx)?;
        let target = Context::get_var(ctx, name)?;
        target.slice(from, to)
    }

    fn eval_slice_bound(&mut self, key: InstructionKey, ctx: &PtrMut<Context>) -> Result<Option<i64>> {
        if self.instruction_at(key)?.opcode() == OpCode::Nop {
            return Ok(None);
        }
        match self.eval(key, ctx)? {
            QValue::Null => Ok(None),
            QValue::Int(i) => Ok(Some(i)),
            other => crate::error::type_error("Integer or Null", &other),
        }
    }

    fn eval_call(&mut self, instr: &Instruction, ctx: &PtrMut<Context>) -> Result<QValue> {
        let name = instruction_name(instr)?;
        let actual_list = self.instruction_at(instr.refs()[0])?;

        if let Some(func_key) = Context::get_function(ctx, name) {
            return self.call_user_function(func_key, &actual_list, ctx);
        }

        let Some(host) = self.host_fns.get(name).copied() else {
            return name_error(name);
        };
        let mut actuals = Vec::with_capacity(actual_list.refs().len());
        for &arg_key in actual_list.refs() {
            actuals.push(self.eval(arg_key, ctx)?);
        }
        host(&mut actuals, ctx, self).map_err(|e| e.with_prefix(name))
    }

    fn call_user_function(
        &mut self,
        func_key: InstructionKey,
        actual_list: &Instruction,
        caller_ctx: &PtrMut<Context>,
    ) -> Result<QValue> {
        let func = self.instruction_at(func_key)?;
        let formal_list = self.instruction_at(func.refs()[0])?;
        let body = func.refs()[1];

        if actual_list.refs().len() != formal_list.refs().len() {
            return arity_error(formal_list.refs().len(), actual_list.refs().len());
        }

        let mut actuals = Vec::with_capacity(actual_list.refs().len());
        for &arg_key in actual_list.refs() {
            actuals.push(self.eval(arg_key, caller_ctx)?);
        }

        let func_ctx = Context::new(ContextKind::Function, Some(caller_ctx.clone()));
        for (&formal_key, actual) in formal_list.refs().iter().zip(actuals) {
            let formal = self.instruction_at(formal_key)?;
            let formal_name = instruction_name(&formal)?;
            func_ctx.borrow_mut().add_var(formal_name)?;
            Context::set_var(&func_ctx, formal_name, actual);
        }

        self.eval(body, &func_ctx).map_err(|e| self.trace_frame(func_key, e))?;
        let return_value = func_ctx.borrow().return_value();
        if func_ctx.borrow().flags().exit_ {
            caller_ctx.borrow_mut().do_exit(return_value.clone());
        }
        Ok(return_value)
    }
}

/// Who consumes which flags when a child loop/switch context's execution completes; Return and
/// Exit always propagate regardless of policy.
struct PropagationPolicy {
    consumes_break: bool,
    consumes_continue: bool,
}

impl PropagationPolicy {
    const FOR_LOOP: Self = Self { consumes_break: true, consumes_continue: true };
    const SWITCH: Self = Self { consumes_break: true, consumes_continue: false };
}

fn propagate_flags(ctx: &PtrMut<Context>, child: &PtrMut<Context>, policy: PropagationPolicy) {
    let flags = child.borrow().flags();
    if !policy.consumes_continue && flags.continue_ {
        ctx.borrow_mut().do_continue();
    }
    if !policy.consumes_break && flags.break_ {
        ctx.borrow_mut().do_break();
    }
    if flags.return_ {
        ctx.borrow_mut().do_return(child.borrow().return_value());
    }
    if flags.exit_ {
        ctx.borrow_mut().do_exit(child.borrow().return_value());
    }
}

fn instruction_name(instr: &Instruction) -> Result<&str> {
    instr
        .name()
        .ok_or_else(|| crate::Error::from(format!("instruction {:?} is missing its name", instr.key())))
}

fn split_for_in_name(name: &str) -> (Option<String>, String) {
    match name.split_once(',') {
        Some((key, val)) if !key.is_empty() => (Some(key.to_string()), val.to_string()),
        Some((_, val)) => (None, val.to_string()),
        None => (None, name.to_string()),
    }
}

fn const_to_value(constant: ConstValue) -> QValue {
    match constant {
        ConstValue::Int(i) => QValue::Int(i),
        ConstValue::Float(f) => QValue::Float(f),
        ConstValue::Str(s) => QValue::Str(s.into_bytes()),
    }
}
