//! In-place record patching: the flat-index commit strategy's write path.
//!
//! Each accepted edit rewrites exactly 8 bytes of the original buffer —
//! the type-tag word and the value word of the addressed record. The key
//! slot, every other record, all container framing, and the string table
//! are left bit-identical. Every edit is validated before any byte is
//! written, so a failed commit leaves the buffer untouched.

use bjson_pack::record::{
    float_word, integer_word, record_offset, TAG_BOOLEAN, TAG_FLOAT, TAG_INTEGER,
};
use thiserror::Error;

use crate::edit::Normalized;

/// One staged edit for the patch strategy: the flat sequence index of the
/// leaf and its validated replacement value. The pending table holds at
/// most one entry per index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingEdit {
    pub index: u32,
    pub value: Normalized,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("record {index} at offset {offset} spans past the end of the {len}-byte buffer")]
    RecordOutOfRange {
        index: u32,
        offset: usize,
        len: usize,
    },
    #[error("value for record {index} does not fit a 32-bit record word")]
    ValueOutOfRange { index: u32 },
}

fn record_words(edit: &PendingEdit) -> Result<(u32, u32), PatchError> {
    match edit.value {
        Normalized::Bool(b) => Ok((TAG_BOOLEAN, b as u32)),
        Normalized::Int(i) => integer_word(i)
            .map(|word| (TAG_INTEGER, word))
            .ok_or(PatchError::ValueOutOfRange { index: edit.index }),
        Normalized::Float(f) => float_word(f)
            .map(|word| (TAG_FLOAT, word))
            .ok_or(PatchError::ValueOutOfRange { index: edit.index }),
    }
}

/// Applies staged edits to the buffer in place.
///
/// Validates every edit — record bounds and word representability —
/// before writing anything; on error the buffer is bit-identical to its
/// state at the call.
pub fn apply_patches(buf: &mut [u8], edits: &[PendingEdit]) -> Result<(), PatchError> {
    let mut writes = Vec::with_capacity(edits.len());
    for edit in edits {
        let offset = record_offset(edit.index);
        if offset + 8 > buf.len() {
            return Err(PatchError::RecordOutOfRange {
                index: edit.index,
                offset,
                len: buf.len(),
            });
        }
        let (tag, value) = record_words(edit)?;
        writes.push((offset, tag, value));
    }
    for (offset, tag, value) in writes {
        buf[offset..offset + 4].copy_from_slice(&tag.to_le_bytes());
        buf[offset + 4..offset + 8].copy_from_slice(&value.to_le_bytes());
    }
    Ok(())
}
