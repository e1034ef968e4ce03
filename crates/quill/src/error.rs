use thiserror::Error;

/// The different error types that can result from [Quill](crate::Quill) operations
#[derive(Debug, Error, Clone)]
#[allow(missing_docs)]
pub enum Error {
    #[error("{0}")]
    StringError(String),
}

impl From<quill_runtime::Error> for Error {
    fn from(error: quill_runtime::Error) -> Self {
        Self::StringError(error.to_string())
    }
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Self::StringError(error)
    }
}

/// The Result type returned by [Quill](crate::Quill) operations
pub type Result<T> = std::result::Result<T, Error>;
