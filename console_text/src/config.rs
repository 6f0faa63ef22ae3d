//! Console configuration
//!
//! Loaded once at boot from JSON bytes. Every field has a default, so an
//! empty object `{}` yields the stock console: ASCII both ways, white on
//! black, a 25% visible cursor, 80x25.

use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;
use hal::text_grid::{Color, TextMode};
use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::error::{ConsoleError, ConsoleResult};

/// Smallest and largest cursor height, in percent of the cell
pub const CURSOR_SIZE_MIN: u8 = 1;
pub const CURSOR_SIZE_MAX: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Version of the configuration format
    pub version: u32,
    pub input_encoding: TextEncoding,
    pub output_encoding: TextEncoding,
    pub foreground: Color,
    pub background: Color,
    /// Cursor height in percent, `1..=100`
    pub cursor_size: u8,
    pub cursor_visible: bool,
    pub mode: TextMode,
}

impl ConsoleConfig {
    /// Current version of the configuration format
    pub const CURRENT_VERSION: u32 = 1;

    /// Parses and validates a configuration
    pub fn from_json(bytes: &[u8]) -> ConsoleResult<Self> {
        let config: Self = serde_json::from_slice(bytes).map_err(|e| {
            log::warn!("console config rejected: {}", e);
            ConsoleError::Config(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConsoleResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| ConsoleError::Config(e.to_string()))
    }

    /// Checks the version and the cursor size range
    pub fn validate(&self) -> ConsoleResult<()> {
        if self.version != Self::CURRENT_VERSION {
            log::warn!("console config version {} not supported", self.version);
            return Err(ConsoleError::Config(format!(
                "unsupported version {}",
                self.version
            )));
        }
        if !(CURSOR_SIZE_MIN..=CURSOR_SIZE_MAX).contains(&self.cursor_size) {
            log::warn!("console config cursor size {} out of range", self.cursor_size);
            return Err(ConsoleError::Config(format!(
                "cursor size {} outside [{}, {}]",
                self.cursor_size, CURSOR_SIZE_MIN, CURSOR_SIZE_MAX
            )));
        }
        Ok(())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            input_encoding: TextEncoding::Ascii,
            output_encoding: TextEncoding::Ascii,
            foreground: Color::White,
            background: Color::Black,
            cursor_size: 25,
            cursor_visible: true,
            mode: TextMode::Text80x25,
        }
    }
}
