//! BJSON binary codec: fixed-width record encoder/decoder for JSON-like
//! value trees.
//!
//! Wire layout:
//! - one reserved header word (u32 LE): total node count
//! - one 12-byte record per node, in pre-order (container before
//!   children); the record for pre-order index `i` starts at byte
//!   `(i*3 + 1) * 4`
//! - a trailing interned string table
//!
//! See [`record`] for the record word layout and type tags.

mod decoder;
mod encoder;
mod error;
mod value;

pub mod json;
pub mod record;

pub use decoder::BjsonDecoder;
pub use encoder::BjsonEncoder;
pub use error::{BjsonDecodeError, BjsonEncodeError};
pub use value::BjsonValue;
