use std::io::{self, Write};

use super::QuillWrite;
use crate::{runtime_error, Result};

/// Writes to the process's real stdout
#[derive(Default)]
pub struct DefaultStdout;

impl QuillWrite for DefaultStdout {
    fn write(&self, bytes: &[u8]) -> Result<()> {
        match io::stdout().write_all(bytes) {
            Ok(()) => Ok(()),
            Err(e) => runtime_error!("failed to write to stdout: {e}"),
        }
    }

    fn flush(&self) -> Result<()> {
        match io::stdout().flush() {
            Ok(()) => Ok(()),
            Err(e) => runtime_error!("failed to flush stdout: {e}"),
        }
    }
}
