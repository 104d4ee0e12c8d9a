use bjson_buffers::BufferError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BjsonEncodeError {
    #[error("integer {0} does not fit a 32-bit record")]
    IntegerOverflow(i64),
    #[error("float {0} is not exactly representable in a 32-bit record")]
    FloatPrecision(f64),
    #[error("node count exceeds the header word")]
    TooManyNodes,
    #[error("string table size exceeds the count word")]
    TooManyStrings,
    #[error("string of {0} bytes exceeds the length word")]
    StringTooLong(usize),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BjsonDecodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid utf-8 in string table")]
    InvalidUtf8,
    #[error("document has no nodes")]
    EmptyDocument,
    #[error("invalid type tag {0} in record {1}")]
    InvalidTag(u32, usize),
    #[error("invalid boolean word {0}")]
    InvalidBool(u32),
    #[error("string index {0} out of range")]
    BadStringIndex(u32),
    #[error("object member record {0} has no key slot")]
    MissingKey(usize),
    #[error("duplicate object key {0:?}")]
    DuplicateKey(String),
    #[error("header claims {expected} records, tree consumed {consumed}")]
    RecordCountMismatch { expected: usize, consumed: usize },
}

impl From<BufferError> for BjsonDecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::UnexpectedEof => BjsonDecodeError::UnexpectedEof,
            BufferError::InvalidUtf8 => BjsonDecodeError::InvalidUtf8,
        }
    }
}
