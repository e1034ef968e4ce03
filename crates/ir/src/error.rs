use thiserror::Error;

/// Errors produced while relocating or addressing a [Script](crate::Script)
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum RelocationError {
    #[error("script has already been relocated")]
    AlreadyRelocated,
    #[error("instruction key {0:?} is out of range for this script")]
    KeyOutOfRange(u32),
}

/// `quill_ir`'s result alias
pub type Result<T> = std::result::Result<T, RelocationError>;
