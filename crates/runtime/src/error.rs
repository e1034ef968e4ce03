use std::{error, fmt};

use quill_ir::InstructionKey;
use thiserror::Error;

use crate::value::QValue;

/// The different error categories that can be thrown by the Quill runtime
///
/// Mirrors spec.md's error handling table: type mismatch, arity mismatch, name error, range
/// error, structural error, and loader error each get their own variant so that embedders can
/// match on the kind of failure rather than parsing the message.
#[derive(Error, Clone)]
#[allow(missing_docs)]
pub enum ErrorKind {
    #[error("{0}")]
    StringError(String),
    #[error("expected {expected}, found {}", describe_values(found))]
    TypeMismatch { expected: String, found: Vec<QValue> },
    #[error("expected {expected} argument(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("'{0}' is not defined")]
    NameError(String),
    #[error("{0}")]
    RangeError(String),
    #[error("{0}")]
    StructuralError(String),
    #[error("{0}")]
    LoaderError(String),
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// An error thrown by the Quill runtime
#[derive(Clone, Debug)]
pub struct Error {
    pub(crate) error: ErrorKind,
    pub(crate) trace: Vec<ErrorFrame>,
}

impl Error {
    pub(crate) fn new(error: ErrorKind) -> Self {
        Self {
            error,
            trace: Vec::new(),
        }
    }

    /// Extends the error's trace with the script origin and instruction key where it propagated
    pub(crate) fn extend_trace(&mut self, origin: &str, instruction: InstructionKey) {
        self.trace.push(ErrorFrame {
            origin: origin.to_string(),
            instruction,
        });
    }

    /// Modifies string errors to include the given prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        use ErrorKind::StringError;

        self.error = match self.error {
            StringError(message) => StringError(format!("{prefix}: {message}")),
            other => other,
        };

        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        for ErrorFrame { origin, instruction } in self.trace.iter() {
            write!(f, "\n--- {origin}:{instruction:?}")?;
        }

        Ok(())
    }
}

impl error::Error for Error {}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Self::new(ErrorKind::StringError(error))
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Self::new(ErrorKind::StringError(error.into()))
    }
}

impl From<ErrorKind> for Error {
    fn from(error: ErrorKind) -> Self {
        Self::new(error)
    }
}

/// An origin and instruction key in a call stack where an error was thrown
#[derive(Clone, Debug)]
pub struct ErrorFrame {
    origin: String,
    instruction: InstructionKey,
}

/// The Result type used by the Quill runtime
pub type Result<T> = std::result::Result<T, Error>;

/// Creates a [crate::Error] from a message (with format-like behaviour), wrapped in `Err`
#[macro_export]
macro_rules! runtime_error {
    ($error:literal) => {
        Err($crate::Error::from(format!($error)))
    };
    ($error:expr) => {
        Err($crate::Error::from($error))
    };
    ($error:literal, $($y:expr),+ $(,)?) => {
        Err($crate::Error::from(format!($error, $($y),+)))
    };
}

/// Creates an error describing a type mismatch
pub fn type_error<T>(expected: &str, found: &QValue) -> Result<T> {
    type_error_with_slice(expected, std::slice::from_ref(found))
}

/// Creates an error describing a type mismatch across multiple values
pub fn type_error_with_slice<T>(expected: &str, found: &[QValue]) -> Result<T> {
    Err(ErrorKind::TypeMismatch {
        expected: expected.into(),
        found: found.into(),
    }
    .into())
}

/// Creates an error describing an arity mismatch
pub fn arity_error<T>(expected: usize, found: usize) -> Result<T> {
    Err(ErrorKind::ArityMismatch { expected, found }.into())
}

/// Creates an error describing an unresolved name
pub fn name_error<T>(name: &str) -> Result<T> {
    Err(ErrorKind::NameError(name.to_string()).into())
}

/// Creates an error describing an out-of-range index or slice
pub fn range_error<T>(message: impl Into<String>) -> Result<T> {
    Err(ErrorKind::RangeError(message.into()).into())
}

/// Creates an error describing a misplaced control-flow construct or `require` call
pub fn structural_error<T>(message: impl Into<String>) -> Result<T> {
    Err(ErrorKind::StructuralError(message.into()).into())
}

/// Creates an error describing a failed `require` load
pub fn loader_error<T>(message: impl Into<String>) -> Result<T> {
    Err(ErrorKind::LoaderError(message.into()).into())
}

fn describe_values(values: &[QValue]) -> String {
    match values {
        [] => "no args".to_string(),
        [single] => single.type_name().to_string(),
        _ => {
            let mut types = String::from('(');
            let mut first = true;
            for value in values {
                if !first {
                    types.push_str(", ");
                }
                first = false;
                types.push_str(value.type_name());
            }
            types.push(')');
            types
        }
    }
}
