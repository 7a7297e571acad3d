//! Output sink threaded through the command tree.

use std::io::{self, Write};

/// Writable sink for help and informational text.
///
/// The tree builder never writes during construction; the sink is only used
/// when the root command is invoked without a subcommand or by leaf commands
/// whose output belongs to the caller (`version`, `options`). Defaults to
/// stdout; tests substitute an in-memory buffer.
pub struct Output {
    inner: Box<dyn Write + Send>,
}

impl Output {
    pub fn stdout() -> Self {
        Self {
            inner: Box::new(io::stdout()),
        }
    }

    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Box::new(writer),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sink_is_stdout_and_writable() {
        let mut out = Output::default();
        // Writing nothing must still be accepted by the default sink.
        out.write_all(b"").unwrap();
        out.flush().unwrap();
    }

    #[test]
    fn test_custom_sink_captures_writes() {
        let buffer = test_support::TestBuffer::new();
        let mut out = Output::new(buffer.clone());
        out.write_all(b"usage").unwrap();
        assert_eq!(buffer.contents(), "usage");
    }
}
