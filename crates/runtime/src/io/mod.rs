mod stdio;

pub use self::stdio::DefaultStdout;

use crate::Result;

/// An output sink that scripts write to via `Println` and similar host functions
///
/// Mirrors `KotoFile`/`KotoWrite`'s split in the teacher, collapsed to the write-only half since
/// the baseline host-function set has no read side. Injecting this as a trait object rather than
/// writing straight to `stdout` is what makes `Println` unit-testable without capturing real
/// process output.
pub trait QuillWrite {
    /// Writes raw bytes to the sink
    fn write(&self, bytes: &[u8]) -> Result<()>;

    /// Writes text followed by a newline
    fn write_line(&self, text: &str) -> Result<()> {
        self.write(text.as_bytes())?;
        self.write(b"\n")
    }

    /// Flushes any buffered output
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
