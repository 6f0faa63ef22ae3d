//! Standard stream bindings
//!
//! Each standard stream is either bound to the console (line editor for
//! input, display writer for output) or redirected to a caller-supplied
//! source or sink. Redirection predicates only inspect the binding.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Replacement for standard input
pub trait InputSource {
    /// Next line without its terminator, `None` at end of input
    fn read_line(&mut self) -> Option<String>;

    /// Copies raw bytes into `buf`, returning how many; 0 at end of input
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Next char without consuming it
    fn peek(&mut self) -> Option<char>;
}

/// Replacement for standard output or standard error
pub trait OutputSink {
    /// Accepts bytes, returning how many were taken
    fn write(&mut self, bytes: &[u8]) -> usize;

    fn flush(&mut self) {}
}

/// What standard input reads from
pub enum InputBinding {
    Console,
    Redirected(Box<dyn InputSource>),
}

impl InputBinding {
    pub fn redirected(source: impl InputSource + 'static) -> Self {
        Self::Redirected(Box::new(source))
    }

    pub fn is_redirected(&self) -> bool {
        matches!(self, Self::Redirected(_))
    }
}

impl fmt::Debug for InputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => f.write_str("Console"),
            Self::Redirected(_) => f.write_str("Redirected"),
        }
    }
}

/// What standard output or error writes to
pub enum OutputBinding {
    Console,
    Redirected(Box<dyn OutputSink>),
}

impl OutputBinding {
    pub fn redirected(sink: impl OutputSink + 'static) -> Self {
        Self::Redirected(Box::new(sink))
    }

    pub fn is_redirected(&self) -> bool {
        matches!(self, Self::Redirected(_))
    }
}

impl fmt::Debug for OutputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Console => f.write_str("Console"),
            Self::Redirected(_) => f.write_str("Redirected"),
        }
    }
}

/// Bindings of the three standard streams
#[derive(Debug)]
pub struct StdStreams {
    input: InputBinding,
    output: OutputBinding,
    error: OutputBinding,
}

impl StdStreams {
    /// All three streams bound to the console
    pub fn new() -> Self {
        Self {
            input: InputBinding::Console,
            output: OutputBinding::Console,
            error: OutputBinding::Console,
        }
    }

    pub fn is_input_redirected(&self) -> bool {
        self.input.is_redirected()
    }

    pub fn is_output_redirected(&self) -> bool {
        self.output.is_redirected()
    }

    pub fn is_error_redirected(&self) -> bool {
        self.error.is_redirected()
    }

    /// Rebinds standard input, returning the previous binding
    pub fn set_in(&mut self, binding: InputBinding) -> InputBinding {
        log::debug!("stdin bound to {:?}", binding);
        core::mem::replace(&mut self.input, binding)
    }

    /// Rebinds standard output, returning the previous binding
    pub fn set_out(&mut self, binding: OutputBinding) -> OutputBinding {
        log::debug!("stdout bound to {:?}", binding);
        core::mem::replace(&mut self.output, binding)
    }

    /// Rebinds standard error, returning the previous binding
    pub fn set_error(&mut self, binding: OutputBinding) -> OutputBinding {
        log::debug!("stderr bound to {:?}", binding);
        core::mem::replace(&mut self.error, binding)
    }

    pub fn input_mut(&mut self) -> &mut InputBinding {
        &mut self.input
    }

    pub fn output_mut(&mut self) -> &mut OutputBinding {
        &mut self.output
    }

    pub fn error_mut(&mut self) -> &mut OutputBinding {
        &mut self.error
    }
}

impl Default for StdStreams {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory input, read as lines separated by `'\n'`
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    bytes: VecDeque<u8>,
}

impl TextInput {
    pub fn new(text: &str) -> Self {
        Self {
            bytes: text.bytes().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

impl InputSource for TextInput {
    fn read_line(&mut self) -> Option<String> {
        if self.bytes.is_empty() {
            return None;
        }
        let end = self.bytes.iter().position(|&b| b == b'\n');
        let line: Vec<u8> = match end {
            Some(end) => {
                let line = self.bytes.drain(..end).collect();
                self.bytes.pop_front();
                line
            }
            None => self.bytes.drain(..).collect(),
        };
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let count = buf.len().min(self.bytes.len());
        for (slot, byte) in buf.iter_mut().zip(self.bytes.drain(..count)) {
            *slot = byte;
        }
        count
    }

    fn peek(&mut self) -> Option<char> {
        self.bytes.front().map(|&b| b as char)
    }
}

/// Output sink whose contents stay readable through any clone
#[derive(Debug, Clone, Default)]
pub struct SharedSink {
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buffer.borrow().clone()
    }

    /// Contents decoded as UTF-8
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buffer.borrow()).into_owned()
    }
}

impl OutputSink for SharedSink {
    fn write(&mut self, bytes: &[u8]) -> usize {
        self.buffer.borrow_mut().extend_from_slice(bytes);
        bytes.len()
    }
}
