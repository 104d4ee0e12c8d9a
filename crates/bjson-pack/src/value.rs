//! [`BjsonValue`] — the universal value type the codec decodes into and
//! encodes from.

/// A JSON-like value tree with the shapes BJSON can carry.
///
/// Object fields are ordered key-value pairs; the codec preserves wire
/// order verbatim in both directions, and re-encoding with altered key
/// order is a correctness bug.
///
/// `Undefined` is a reserved wire shape (some producers emit placeholder
/// slots). It round-trips through the codec but is not an editable
/// document value; document construction rejects it.
#[derive(Debug, Clone, PartialEq)]
pub enum BjsonValue {
    Null,
    Undefined,
    Bool(bool),
    /// Signed integer. The wire record holds 32 bits; encoding fails for
    /// values outside i32 range.
    Integer(i64),
    /// Floating-point number. The wire record holds f32 bits; encoding
    /// fails for values that narrowing would change.
    Float(f64),
    Str(String),
    Array(Vec<BjsonValue>),
    /// Ordered key-value pairs.
    Object(Vec<(String, BjsonValue)>),
}

impl BjsonValue {
    /// Short shape name, used in diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            BjsonValue::Null => "null",
            BjsonValue::Undefined => "undefined",
            BjsonValue::Bool(_) => "boolean",
            BjsonValue::Integer(_) => "integer",
            BjsonValue::Float(_) => "float",
            BjsonValue::Str(_) => "string",
            BjsonValue::Array(_) => "array",
            BjsonValue::Object(_) => "object",
        }
    }
}

impl From<serde_json::Value> for BjsonValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => BjsonValue::Null,
            serde_json::Value::Bool(b) => BjsonValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BjsonValue::Integer(i)
                } else {
                    BjsonValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => BjsonValue::Str(s),
            serde_json::Value::Array(arr) => {
                BjsonValue::Array(arr.into_iter().map(BjsonValue::from).collect())
            }
            serde_json::Value::Object(obj) => BjsonValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, BjsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&BjsonValue> for serde_json::Value {
    fn from(v: &BjsonValue) -> Self {
        match v {
            BjsonValue::Null | BjsonValue::Undefined => serde_json::Value::Null,
            BjsonValue::Bool(b) => serde_json::Value::Bool(*b),
            BjsonValue::Integer(i) => serde_json::json!(i),
            BjsonValue::Float(f) => serde_json::Value::from(*f),
            BjsonValue::Str(s) => serde_json::Value::String(s.clone()),
            BjsonValue::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(serde_json::Value::from).collect())
            }
            BjsonValue::Object(obj) => serde_json::Value::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}
