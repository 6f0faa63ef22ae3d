//! Text grid device boundary
//!
//! A fixed-size grid of byte cells with one color attribute and a hardware
//! cursor. The display writer owns the logical cursor and pushes it here.

use core::fmt;
use serde::{Deserialize, Serialize};

/// 16-color text palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    DarkBlue = 1,
    DarkGreen = 2,
    DarkCyan = 3,
    DarkRed = 4,
    DarkMagenta = 5,
    DarkYellow = 6,
    Gray = 7,
    DarkGray = 8,
    Blue = 9,
    Green = 10,
    Cyan = 11,
    Red = 12,
    Magenta = 13,
    Yellow = 14,
    White = 15,
}

impl Color {
    const ALL: [Color; 16] = [
        Color::Black,
        Color::DarkBlue,
        Color::DarkGreen,
        Color::DarkCyan,
        Color::DarkRed,
        Color::DarkMagenta,
        Color::DarkYellow,
        Color::Gray,
        Color::DarkGray,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Yellow,
        Color::White,
    ];

    /// Color for the low four bits of `nibble`
    pub const fn from_nibble(nibble: u8) -> Self {
        Self::ALL[(nibble & 0x0F) as usize]
    }

    /// Make an attribute byte from foreground and background colors
    pub const fn make_attr(fg: Color, bg: Color) -> u8 {
        (bg as u8) << 4 | (fg as u8)
    }

    /// Foreground half of an attribute byte
    pub const fn foreground_of(attr: u8) -> Self {
        Self::from_nibble(attr)
    }

    /// Background half of an attribute byte
    pub const fn background_of(attr: u8) -> Self {
        Self::from_nibble(attr >> 4)
    }
}

/// Supported text mode presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextMode {
    Text40x25,
    Text40x50,
    Text80x25,
    Text80x50,
    Text90x30,
    Text90x60,
}

impl TextMode {
    /// Preset matching exactly `cols` x `rows`
    pub fn from_dimensions(cols: usize, rows: usize) -> Option<Self> {
        let mode = match (cols, rows) {
            (40, 25) => Self::Text40x25,
            (40, 50) => Self::Text40x50,
            (80, 25) => Self::Text80x25,
            (80, 50) => Self::Text80x50,
            (90, 30) => Self::Text90x30,
            (90, 60) => Self::Text90x60,
            _ => return None,
        };
        Some(mode)
    }

    pub const fn cols(self) -> usize {
        match self {
            Self::Text40x25 | Self::Text40x50 => 40,
            Self::Text80x25 | Self::Text80x50 => 80,
            Self::Text90x30 | Self::Text90x60 => 90,
        }
    }

    pub const fn rows(self) -> usize {
        match self {
            Self::Text40x25 | Self::Text80x25 => 25,
            Self::Text90x30 => 30,
            Self::Text40x50 | Self::Text80x50 => 50,
            Self::Text90x60 => 60,
        }
    }

    /// Scan lines per character cell
    pub const fn cell_height(self) -> u8 {
        match self.rows() {
            25 | 30 => 16,
            _ => 8,
        }
    }
}

impl Default for TextMode {
    fn default() -> Self {
        Self::Text80x25
    }
}

impl fmt::Display for TextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols(), self.rows())
    }
}

/// Text grid device
///
/// Coordinates outside the grid are ignored by writes and read back as 0.
pub trait TextGrid {
    /// Grid width in cells
    fn cols(&self) -> usize;

    /// Grid height in cells
    fn rows(&self) -> usize;

    /// Writes one byte cell using the current color attribute
    fn set_cell(&mut self, col: usize, row: usize, byte: u8);

    /// Reads back one byte cell
    fn cell(&self, col: usize, row: usize) -> u8;

    /// Fills the grid with blanks in the current color
    fn clear(&mut self);

    /// Moves every row up by one and blanks the bottom row
    fn scroll_up(&mut self);

    /// Places the hardware cursor
    fn set_cursor_pos(&mut self, col: usize, row: usize);

    /// Current attribute byte (background in the high nibble)
    fn color(&self) -> u8;

    fn set_colors(&mut self, fg: Color, bg: Color);

    /// Cursor height as a percentage of the cell, in `1..=100`
    fn cursor_size(&self) -> u8;

    /// Callers validate the range; devices may assume `1..=100`
    fn set_cursor_size(&mut self, percent: u8);

    fn cursor_visible(&self) -> bool;

    fn set_cursor_visible(&mut self, visible: bool);

    /// Switches to a text mode preset, changing `cols`/`rows`
    fn set_mode(&mut self, mode: TextMode);
}

/// Indexed CRT controller registers driving the hardware cursor
pub trait CursorRegisters {
    fn read_crtc(&mut self, index: u8) -> u8;

    fn write_crtc(&mut self, index: u8, value: u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_attr() {
        assert_eq!(Color::make_attr(Color::White, Color::Black), 0x0F);
        assert_eq!(Color::make_attr(Color::Gray, Color::DarkBlue), 0x17);
    }

    #[test]
    fn test_color_split() {
        let attr = Color::make_attr(Color::Yellow, Color::DarkRed);
        assert_eq!(Color::foreground_of(attr), Color::Yellow);
        assert_eq!(Color::background_of(attr), Color::DarkRed);
    }

    #[test]
    fn test_text_mode_presets() {
        assert_eq!(TextMode::from_dimensions(80, 25), Some(TextMode::Text80x25));
        assert_eq!(TextMode::from_dimensions(90, 60), Some(TextMode::Text90x60));
        assert_eq!(TextMode::from_dimensions(80, 24), None);
        assert_eq!(TextMode::from_dimensions(100, 40), None);

        let mode = TextMode::Text40x50;
        assert_eq!((mode.cols(), mode.rows()), (40, 50));
        assert_eq!(mode.cell_height(), 8);
        assert_eq!(TextMode::default().cell_height(), 16);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&(Color::DarkCyan, TextMode::Text90x30)).unwrap();
        assert_eq!(json, r#"["DarkCyan","Text90x30"]"#);

        let back: (Color, TextMode) = serde_json::from_str(&json).unwrap();
        assert_eq!(back, (Color::DarkCyan, TextMode::Text90x30));
    }
}
