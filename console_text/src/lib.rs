//! # Console Text
//!
//! The output half of the text console and the types shared by every
//! console crate.
//!
//! ## Philosophy
//!
//! - **One cursor owner**: [`DisplayWriter`] is the only thing that moves the
//!   screen cursor; the line editor borrows it per call
//! - **Bytes on a grid**: No escape sequences, no terminal model
//! - **Explicit configuration**: [`ConsoleConfig`] is data, loaded once
//!
//! ## Contents
//!
//! - [`DisplayWriter`]: control-character policy, wrapping, scrolling
//! - [`ConsoleError`]: errors for every console crate
//! - [`TextEncoding`]: byte encodings for input and output
//! - [`ConsoleConfig`]: serde-backed console settings

#![no_std]

extern crate alloc;

pub mod config;
pub mod encoding;
pub mod error;
pub mod writer;

pub use config::ConsoleConfig;
pub use encoding::TextEncoding;
pub use error::{ConsoleError, ConsoleResult};
pub use writer::{DisplayWriter, TAB_WIDTH};
