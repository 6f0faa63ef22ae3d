//! Console error types

use alloc::string::String;
use hal::keyboard::KeyboardError;
use thiserror::Error;

/// Errors surfaced by console operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConsoleError {
    /// A numeric argument fell outside its valid range
    #[error("{what} {value} is outside [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    /// Window dimensions do not match a text mode preset
    #[error("unsupported window size {width}x{height}")]
    UnsupportedWindowSize { width: usize, height: usize },

    /// Operation the console cannot perform at all
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    /// Operation not valid in the console's current state
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Key source failure
    #[error(transparent)]
    Keyboard(#[from] KeyboardError),

    /// Configuration rejected
    #[error("invalid console configuration: {0}")]
    Config(String),
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl ConsoleError {
    /// Checks `value` against `min..=max`
    pub fn check_range(what: &'static str, value: usize, min: usize, max: usize) -> ConsoleResult<()> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(ConsoleError::OutOfRange {
                what,
                value,
                min,
                max,
            })
        }
    }
}
