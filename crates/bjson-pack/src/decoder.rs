//! `BjsonDecoder` — rebuilds a [`BjsonValue`] tree from the fixed-width
//! record wire format.

use bjson_buffers::Reader;

use crate::error::BjsonDecodeError;
use crate::record::{
    HEADER_BYTES, NO_KEY, RECORD_BYTES, TAG_ARRAY, TAG_BOOLEAN, TAG_FLOAT, TAG_INTEGER, TAG_NULL,
    TAG_OBJECT, TAG_STRING, TAG_UNDEFINED,
};
use crate::value::BjsonValue;

/// One raw 12-byte record as read off the wire.
struct RawRecord {
    tag: u32,
    value: u32,
    key: u32,
}

/// Stateless BJSON decoder.
#[derive(Default)]
pub struct BjsonDecoder;

impl BjsonDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes a byte buffer into a value tree.
    ///
    /// Reads the header word, the record region, and the string table,
    /// then rebuilds the tree from child counts: a container's children
    /// are the records that follow it in pre-order. Wire key order is
    /// preserved verbatim. Trailing bytes after the string table are
    /// ignored.
    pub fn decode(&self, input: &[u8]) -> Result<BjsonValue, BjsonDecodeError> {
        let mut r = Reader::new(input);
        let count = r.u32()? as usize;
        if count == 0 {
            return Err(BjsonDecodeError::EmptyDocument);
        }
        let record_region = count
            .checked_mul(RECORD_BYTES)
            .ok_or(BjsonDecodeError::UnexpectedEof)?;
        if input.len() < HEADER_BYTES + record_region {
            return Err(BjsonDecodeError::UnexpectedEof);
        }

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(RawRecord {
                tag: r.u32()?,
                value: r.u32()?,
                key: r.u32()?,
            });
        }
        let strings = read_string_table(&mut r)?;

        let mut pos = 0usize;
        let root = build(&records, &strings, &mut pos)?;
        if pos != count {
            return Err(BjsonDecodeError::RecordCountMismatch {
                expected: count,
                consumed: pos,
            });
        }
        Ok(root)
    }
}

fn read_string_table(r: &mut Reader) -> Result<Vec<String>, BjsonDecodeError> {
    let count = r.u32()? as usize;
    let mut entries = Vec::with_capacity(count.min(r.remaining()));
    for _ in 0..count {
        let len = r.u32()? as usize;
        entries.push(r.utf8(len)?.to_owned());
    }
    Ok(entries)
}

fn lookup_string(strings: &[String], slot: u32) -> Result<&str, BjsonDecodeError> {
    strings
        .get(slot as usize)
        .map(String::as_str)
        .ok_or(BjsonDecodeError::BadStringIndex(slot))
}

fn build(
    records: &[RawRecord],
    strings: &[String],
    pos: &mut usize,
) -> Result<BjsonValue, BjsonDecodeError> {
    let at = *pos;
    let rec = records
        .get(at)
        .ok_or(BjsonDecodeError::RecordCountMismatch {
            expected: records.len(),
            consumed: at,
        })?;
    *pos += 1;

    match rec.tag {
        TAG_NULL => Ok(BjsonValue::Null),
        TAG_UNDEFINED => Ok(BjsonValue::Undefined),
        TAG_BOOLEAN => match rec.value {
            0 => Ok(BjsonValue::Bool(false)),
            1 => Ok(BjsonValue::Bool(true)),
            other => Err(BjsonDecodeError::InvalidBool(other)),
        },
        TAG_INTEGER => Ok(BjsonValue::Integer(rec.value as i32 as i64)),
        TAG_FLOAT => Ok(BjsonValue::Float(f32::from_bits(rec.value) as f64)),
        TAG_STRING => Ok(BjsonValue::Str(lookup_string(strings, rec.value)?.to_owned())),
        TAG_ARRAY => {
            let len = rec.value as usize;
            let mut items = Vec::with_capacity(len.min(records.len()));
            for _ in 0..len {
                items.push(build(records, strings, pos)?);
            }
            Ok(BjsonValue::Array(items))
        }
        TAG_OBJECT => {
            let len = rec.value as usize;
            let mut fields = Vec::with_capacity(len.min(records.len()));
            for _ in 0..len {
                let member = records
                    .get(*pos)
                    .ok_or(BjsonDecodeError::RecordCountMismatch {
                        expected: records.len(),
                        consumed: *pos,
                    })?;
                if member.key == NO_KEY {
                    return Err(BjsonDecodeError::MissingKey(*pos));
                }
                let key = lookup_string(strings, member.key)?.to_owned();
                if fields.iter().any(|(existing, _)| *existing == key) {
                    return Err(BjsonDecodeError::DuplicateKey(key));
                }
                let val = build(records, strings, pos)?;
                fields.push((key, val));
            }
            Ok(BjsonValue::Object(fields))
        }
        other => Err(BjsonDecodeError::InvalidTag(other, at)),
    }
}
