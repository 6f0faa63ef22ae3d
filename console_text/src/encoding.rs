//! Byte encodings for console input and output
//!
//! The grid stores one byte per cell, so output is always reduced to bytes
//! here. Characters an encoding cannot represent become `?`.

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

const REPLACEMENT: u8 = b'?';

/// Text encoding used by a console stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// 7-bit ASCII
    #[default]
    Ascii,
    /// ISO-8859-1, one byte per char up to U+00FF
    Latin1,
    Utf8,
}

impl TextEncoding {
    /// Number of bytes `ch` encodes to
    pub fn encoded_len(self, ch: char) -> usize {
        match self {
            Self::Ascii | Self::Latin1 => 1,
            Self::Utf8 => ch.len_utf8(),
        }
    }

    /// Encodes `ch` at the front of `out`
    ///
    /// Returns the number of bytes written, or `None` (with `out` untouched)
    /// when the encoded char does not fit.
    pub fn encode_char(self, ch: char, out: &mut [u8]) -> Option<usize> {
        let len = self.encoded_len(ch);
        if out.len() < len {
            return None;
        }
        match self {
            Self::Ascii | Self::Latin1 => out[0] = self.glyph(ch),
            Self::Utf8 => {
                ch.encode_utf8(out);
            }
        }
        Some(len)
    }

    /// Encodes a whole string
    pub fn encode_str(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            _ => text.chars().map(|ch| self.glyph(ch)).collect(),
        }
    }

    /// Decodes bytes, replacing anything unrepresentable
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { REPLACEMENT as char })
                .collect(),
            Self::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Single cell byte for `ch`
    ///
    /// UTF-8 has no single-byte form above U+007F, so those chars render as
    /// the replacement byte.
    pub fn glyph(self, ch: char) -> u8 {
        let limit = match self {
            Self::Ascii | Self::Utf8 => 0x7F,
            Self::Latin1 => 0xFF,
        };
        if (ch as u32) <= limit {
            ch as u8
        } else {
            REPLACEMENT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_char_fits() {
        let mut out = [0u8; 4];
        assert_eq!(TextEncoding::Ascii.encode_char('a', &mut out), Some(1));
        assert_eq!(out[0], b'a');

        assert_eq!(TextEncoding::Utf8.encode_char('é', &mut out), Some(2));
        assert_eq!(&out[..2], "é".as_bytes());
    }

    #[test]
    fn test_encode_char_does_not_fit() {
        let mut out = [0u8; 1];
        assert_eq!(TextEncoding::Utf8.encode_char('€', &mut out), None);
        assert_eq!(out, [0]);
        assert_eq!(TextEncoding::Ascii.encode_char('x', &mut []), None);
    }

    #[test]
    fn test_replacement() {
        assert_eq!(TextEncoding::Ascii.glyph('é'), b'?');
        assert_eq!(TextEncoding::Latin1.glyph('é'), 0xE9);
        assert_eq!(TextEncoding::Latin1.glyph('€'), b'?');
        assert_eq!(TextEncoding::Utf8.glyph('é'), b'?');
        assert_eq!(TextEncoding::Ascii.encode_str("naïve"), b"na?ve");
    }

    #[test]
    fn test_decode() {
        assert_eq!(TextEncoding::Ascii.decode(&[b'o', 0xE9, b'k']), "o?k");
        assert_eq!(TextEncoding::Latin1.decode(&[b'o', 0xE9]), "oé");
        assert_eq!(TextEncoding::Utf8.decode("oé".as_bytes()), "oé");
    }

    #[test]
    fn test_default_is_ascii() {
        assert_eq!(TextEncoding::default(), TextEncoding::Ascii);
    }
}
