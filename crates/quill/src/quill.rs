use quill_ir::Script;
use quill_runtime::{Executor, HostFn, QValue, QuillWrite, ScriptLoader};

use crate::{Error, Result};

/// The main interface for the Quill language
///
/// This wraps an [Executor](quill_runtime::Executor) with the host functions, script loader, and
/// stdout sink an embedder configures once up front. There's no lexer or parser behind this API:
/// callers hand [Quill::run] an already-built [Script], typically produced by a front end that
/// targets the same instruction-graph contract as [quill_ir::ScriptBuilder].
///
/// Example:
///
/// ```
/// use quill::prelude::*;
/// use quill_ir::{OpCode, ScriptBuilder};
///
/// fn main() -> quill::Result<()> {
///     let mut builder = ScriptBuilder::new("example");
///     let one = builder.new_const_int(1);
///     let two = builder.new_const_int(2);
///     let add = builder.push(OpCode::Add, &[one, two]);
///     let script = builder.build(add);
///
///     let mut quill = Quill::new();
///     let result = quill.run(script)?;
///     assert_eq!(result, QValue::Int(3));
///
///     Ok(())
/// }
/// ```
pub struct Quill {
    executor: Executor,
}

impl Default for Quill {
    fn default() -> Self {
        Self::new()
    }
}

impl Quill {
    /// Creates a new instance of Quill with default settings
    pub fn new() -> Self {
        Self::with_settings(QuillSettings::default())
    }

    /// Creates a new instance of Quill with the given settings
    pub fn with_settings(settings: QuillSettings) -> Self {
        let mut executor = Executor::new();

        if let Some(loader) = settings.script_loader {
            executor.set_script_loader(loader);
        }
        if let Some(stdout) = settings.stdout {
            executor.set_stdout(stdout);
        }

        Self { executor }
    }

    /// Registers a native function under `name`, callable from scripts the same way a
    /// user-defined function is
    ///
    /// User-defined functions of the same name take priority: the host registry is only
    /// consulted once a script-level lookup comes up empty.
    pub fn register_host_fn(&mut self, name: &str, f: HostFn) -> &mut Self {
        self.executor.register_host_fn(name, f);
        self
    }

    /// Runs a script to completion, returning its result value
    ///
    /// The script's entry instruction is evaluated under a fresh root context. If the script (or
    /// a script it `require`s) calls `exit`, the exit code is returned in place of the entry
    /// instruction's own result.
    pub fn run(&mut self, script: Script) -> Result<QValue> {
        self.executor.execute(script).map_err(Error::from)
    }

    /// Returns a reference to the underlying executor
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Returns a mutable reference to the underlying executor
    ///
    /// Useful for calling [Executor] methods that aren't mirrored on [Quill] directly.
    pub fn executor_mut(&mut self) -> &mut Executor {
        &mut self.executor
    }
}

/// Settings used to control the behaviour of a [Quill] instance
#[derive(Default)]
pub struct QuillSettings {
    /// An optional loader consulted by the `require` host function
    pub script_loader: Option<Box<dyn ScriptLoader>>,
    /// An optional sink for output from `Println` and other writing host functions
    pub stdout: Option<Box<dyn QuillWrite>>,
}

impl QuillSettings {
    /// Helper for conveniently defining a script loader, consulted by `require`
    #[must_use]
    pub fn with_script_loader(mut self, loader: impl ScriptLoader + 'static) -> Self {
        self.script_loader = Some(Box::new(loader));
        self
    }

    /// Helper for conveniently defining a custom stdout implementation
    #[must_use]
    pub fn with_stdout(mut self, stdout: impl QuillWrite + 'static) -> Self {
        self.stdout = Some(Box::new(stdout));
        self
    }
}
