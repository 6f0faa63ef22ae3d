#![no_std]

//! # Line Editor
//!
//! Interactive single-line editing for the text console.
//!
//! ## Philosophy
//!
//! - **No_std compatible**: Uses alloc but not std
//! - **Deterministic**: Same key trace => same line and same screen
//! - **Cursor is borrowed**: The display writer owns the screen cursor; every
//!   call that echoes takes it as `&mut DisplayWriter`
//! - **Peek without loss**: Keys read ahead by `peek` are replayed, never
//!   dropped or echoed twice
//!
//! ## Design
//!
//! - [`LineBuffer`]: units plus an edit cursor
//! - [`ReplayQueue`] / [`Speculation`]: events read ahead by a speculative scan
//! - [`LineEditor`]: the scan loop and the read operations built on it

extern crate alloc;

pub mod buffer;
pub mod editor;
pub mod replay;

pub use buffer::LineBuffer;
pub use editor::{KeyRead, LineEditor};
pub use replay::{ReplayQueue, Speculation};
