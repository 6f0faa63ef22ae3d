//! # Console Standard I/O
//!
//! The process-wide standard input, output and error of the text console.
//!
//! ## Philosophy
//!
//! - **No ambient singleton**: The [`Console`] is created once at boot and
//!   passed to whoever needs it
//! - **One reader at a time**: Every operation takes `&mut Console`
//! - **Redirection is a binding**: Streams point at the console or at a
//!   caller's source/sink; predicates never touch hardware
//!
//! ## Contents
//!
//! - [`Console`]: line input, screen output, cursor, colors, window, beep
//! - [`ConsoleStream`]: per-stream endpoint with an [`AccessMode`]
//! - [`StdStreams`]: bindings and redirection predicates

#![no_std]

extern crate alloc;

pub mod console;
pub mod redirect;
pub mod stream;

pub use console::Console;
pub use redirect::{
    InputBinding, InputSource, OutputBinding, OutputSink, SharedSink, StdStreams, TextInput,
};
pub use stream::{AccessMode, ConsoleStream, StdStream};
