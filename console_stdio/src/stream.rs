//! Standard stream endpoints
//!
//! A [`ConsoleStream`] borrows the console for as long as it is used and
//! forwards to whatever the stream is currently bound to.

use console_text::{ConsoleError, ConsoleResult};
use hal::key_source::KeySource;
use hal::text_grid::TextGrid;

use crate::console::Console;

/// Which standard stream an endpoint serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Input,
    Output,
    Error,
}

/// Direction an endpoint may be used in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

impl StdStream {
    pub fn access(self) -> AccessMode {
        match self {
            Self::Input => AccessMode::Read,
            Self::Output | Self::Error => AccessMode::Write,
        }
    }
}

/// Endpoint for one standard stream
pub struct ConsoleStream<'a, G: TextGrid, K: KeySource> {
    console: &'a mut Console<G, K>,
    stream: StdStream,
}

impl<'a, G: TextGrid, K: KeySource> ConsoleStream<'a, G, K> {
    pub(crate) fn new(console: &'a mut Console<G, K>, stream: StdStream) -> Self {
        Self { console, stream }
    }

    pub fn stream(&self) -> StdStream {
        self.stream
    }

    pub fn access(&self) -> AccessMode {
        self.stream.access()
    }

    pub fn can_read(&self) -> bool {
        self.access() == AccessMode::Read
    }

    pub fn can_write(&self) -> bool {
        self.access() == AccessMode::Write
    }

    /// Reads encoded line bytes; see `LineEditor::read_line_into`
    pub fn read(&mut self, buf: &mut [u8]) -> ConsoleResult<usize> {
        self.require(AccessMode::Read)?;
        self.console.stdin_read(buf)
    }

    /// One unit if available right now
    pub fn read_unit(&mut self) -> ConsoleResult<Option<char>> {
        self.require(AccessMode::Read)?;
        self.console.stdin_read_unit()
    }

    pub fn write(&mut self, bytes: &[u8]) -> ConsoleResult<usize> {
        self.require(AccessMode::Write)?;
        self.console.write_to(self.stream, bytes)
    }

    pub fn flush(&mut self) -> ConsoleResult<()> {
        self.require(AccessMode::Write)?;
        self.console.flush(self.stream)
    }

    fn require(&self, access: AccessMode) -> ConsoleResult<()> {
        if self.access() == access {
            return Ok(());
        }
        Err(ConsoleError::Unsupported(match access {
            AccessMode::Read => "reading from an output stream",
            AccessMode::Write => "writing to standard input",
        }))
    }
}
