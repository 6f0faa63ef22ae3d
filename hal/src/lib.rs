//! # Hardware Abstraction Layer (HAL)
//!
//! Device boundaries used by the text console.
//!
//! ## Philosophy
//!
//! **The console never touches hardware directly.**
//!
//! The line editor and display writer only see these traits. Architecture
//! crates (`hal_x86_64`, `console_vga`) implement them; tests use the fakes
//! in [`fake`].
//!
//! ## Boundaries
//!
//! 1. **KeySource**: discrete key events, with one blocking call
//! 2. **TextGrid**: a cols x rows grid of byte cells plus a hardware cursor
//! 3. **Speaker**: a tone generator for `beep`
//! 4. **KeyboardDevice / TimerDevice**: raw devices below the key source

#![no_std]

extern crate alloc;

pub mod fake;
pub mod key_source;
pub mod keyboard;
pub mod keyboard_translation;
pub mod speaker;
pub mod text_grid;
pub mod timer;

pub use key_source::{KeySource, ScancodeKeySource};
pub use keyboard::{HalKeyEvent, HalScancode, KeyboardDevice, KeyboardError};
pub use keyboard_translation::{scancode_to_key, KeyboardTranslator};
pub use speaker::Speaker;
pub use text_grid::{Color, CursorRegisters, TextGrid, TextMode};
pub use timer::TimerDevice;
