//! JSON bridge: convert between [`BjsonValue`] trees and JSON text.
//!
//! serde_json is built with `preserve_order`, so object key order survives
//! both directions. Used by the CLI tools and tests; the binary codec
//! itself never goes through JSON.

use crate::value::BjsonValue;

/// Serializes a value tree to a compact JSON string.
pub fn to_json_string(value: &BjsonValue) -> Result<String, serde_json::Error> {
    serde_json::to_string(&serde_json::Value::from(value))
}

/// Serializes a value tree to a pretty-printed JSON string.
pub fn to_json_string_pretty(value: &BjsonValue) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::Value::from(value))
}

/// Parses a JSON string into a value tree.
pub fn from_json_str(json: &str) -> Result<BjsonValue, serde_json::Error> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    Ok(BjsonValue::from(parsed))
}
