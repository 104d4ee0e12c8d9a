//! Byte buffer primitives shared by the BJSON codec.
//!
//! BJSON is a little-endian word-oriented format, so both the [`Writer`]
//! and the [`Reader`] speak 32-bit little-endian words natively.

use thiserror::Error;

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Errors raised by bounds-checked buffer reads.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid utf-8 payload")]
    InvalidUtf8,
}
