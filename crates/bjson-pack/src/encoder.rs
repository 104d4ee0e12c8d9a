//! `BjsonEncoder` — serializes a [`BjsonValue`] tree into the fixed-width
//! record wire format.

use std::collections::HashMap;

use bjson_buffers::Writer;

use crate::error::BjsonEncodeError;
use crate::record::{
    float_word, integer_word, NO_KEY, TAG_ARRAY, TAG_BOOLEAN, TAG_FLOAT, TAG_INTEGER, TAG_NULL,
    TAG_OBJECT, TAG_STRING, TAG_UNDEFINED,
};
use crate::value::BjsonValue;

/// Interned string table built on the first encoding pass.
///
/// First use wins: repeated keys and string values share one entry.
#[derive(Default)]
struct StringTable {
    entries: Vec<String>,
    index: HashMap<String, u32>,
}

impl StringTable {
    fn intern(&mut self, s: &str) -> Result<(), BjsonEncodeError> {
        if self.index.contains_key(s) {
            return Ok(());
        }
        let slot =
            u32::try_from(self.entries.len()).map_err(|_| BjsonEncodeError::TooManyStrings)?;
        if slot == NO_KEY {
            return Err(BjsonEncodeError::TooManyStrings);
        }
        self.index.insert(s.to_string(), slot);
        self.entries.push(s.to_string());
        Ok(())
    }

    fn slot(&self, s: &str) -> u32 {
        // Interning happens in the first pass over the same tree, so the
        // entry must exist by the time records are emitted.
        self.index[s]
    }
}

pub struct BjsonEncoder {
    writer: Writer,
}

impl Default for BjsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BjsonEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes a value tree to a fresh byte buffer.
    ///
    /// Two passes: the first interns every key and string value and counts
    /// nodes for the header word; the second emits one record per node in
    /// pre-order, then the string table.
    pub fn encode(&mut self, value: &BjsonValue) -> Result<Vec<u8>, BjsonEncodeError> {
        let mut strings = StringTable::default();
        let mut nodes: u64 = 0;
        collect(value, &mut strings, &mut nodes)?;
        let count = u32::try_from(nodes).map_err(|_| BjsonEncodeError::TooManyNodes)?;

        self.writer.reset();
        self.writer.u32(count);
        self.write_node(value, NO_KEY, &strings)?;
        self.write_string_table(&strings)?;
        Ok(self.writer.flush())
    }

    fn write_node(
        &mut self,
        value: &BjsonValue,
        key_slot: u32,
        strings: &StringTable,
    ) -> Result<(), BjsonEncodeError> {
        match value {
            BjsonValue::Null => self.record(TAG_NULL, 0, key_slot),
            BjsonValue::Undefined => self.record(TAG_UNDEFINED, 0, key_slot),
            BjsonValue::Bool(b) => self.record(TAG_BOOLEAN, *b as u32, key_slot),
            BjsonValue::Integer(i) => {
                let word = integer_word(*i).ok_or(BjsonEncodeError::IntegerOverflow(*i))?;
                self.record(TAG_INTEGER, word, key_slot);
            }
            BjsonValue::Float(f) => {
                let word = float_word(*f).ok_or(BjsonEncodeError::FloatPrecision(*f))?;
                self.record(TAG_FLOAT, word, key_slot);
            }
            BjsonValue::Str(s) => self.record(TAG_STRING, strings.slot(s), key_slot),
            BjsonValue::Array(items) => {
                self.record(TAG_ARRAY, items.len() as u32, key_slot);
                for item in items {
                    self.write_node(item, NO_KEY, strings)?;
                }
            }
            BjsonValue::Object(fields) => {
                self.record(TAG_OBJECT, fields.len() as u32, key_slot);
                for (key, val) in fields {
                    self.write_node(val, strings.slot(key), strings)?;
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn record(&mut self, tag: u32, value: u32, key_slot: u32) {
        self.writer.u32(tag);
        self.writer.u32(value);
        self.writer.u32(key_slot);
    }

    fn write_string_table(&mut self, strings: &StringTable) -> Result<(), BjsonEncodeError> {
        self.writer.u32(strings.entries.len() as u32);
        for entry in &strings.entries {
            let len = u32::try_from(entry.len())
                .map_err(|_| BjsonEncodeError::StringTooLong(entry.len()))?;
            self.writer.u32(len);
            self.writer.utf8(entry);
        }
        Ok(())
    }
}

fn collect(
    value: &BjsonValue,
    strings: &mut StringTable,
    nodes: &mut u64,
) -> Result<(), BjsonEncodeError> {
    *nodes += 1;
    match value {
        BjsonValue::Str(s) => strings.intern(s)?,
        BjsonValue::Array(items) => {
            for item in items {
                collect(item, strings, nodes)?;
            }
        }
        BjsonValue::Object(fields) => {
            for (key, val) in fields {
                strings.intern(key)?;
                collect(val, strings, nodes)?;
            }
        }
        _ => {}
    }
    Ok(())
}
