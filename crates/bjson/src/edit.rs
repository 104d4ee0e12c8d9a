//! Edit validation and numeric normalization.
//!
//! The validation contract is shared by both commit strategies: a
//! proposal is parsed and normalized the same way regardless of how it
//! will later be persisted, and a rejected proposal never changes any
//! state. Only `Number` and `Boolean` leaves are editable.

use std::fmt;

use thiserror::Error;

use crate::document::ScalarValue;

/// The declared type of a leaf as presented for editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafType {
    Number,
    Boolean,
    Text,
    Null,
}

impl LeafType {
    /// The leaf type of a scalar. `Integer` and `Float` are both `Number`.
    pub fn of(scalar: &ScalarValue) -> Self {
        match scalar {
            ScalarValue::Integer(_) | ScalarValue::Float(_) => LeafType::Number,
            ScalarValue::Boolean(_) => LeafType::Boolean,
            ScalarValue::Text(_) => LeafType::Text,
            ScalarValue::Null => LeafType::Null,
        }
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeafType::Number => "number",
            LeafType::Boolean => "boolean",
            LeafType::Text => "text",
            LeafType::Null => "null",
        };
        f.write_str(name)
    }
}

/// A validated, normalized edit value.
///
/// Normalization makes the original's implicit coercions explicit: a
/// float equal to its own integer truncation is always narrowed to an
/// integer, so `Float(2.0)` and `Integer(2)` compare equal after
/// normalization and a whole-number candidate is stored as an integer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Normalized {
    /// The scalar this value persists as.
    pub fn to_scalar(&self) -> ScalarValue {
        match self {
            Normalized::Int(i) => ScalarValue::Integer(*i),
            Normalized::Float(f) => ScalarValue::Float(*f),
            Normalized::Bool(b) => ScalarValue::Boolean(*b),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("boolean values only accept 'true' or 'false', got {0:?}")]
    InvalidBooleanLiteral(String),
    #[error("{0:?} is not a valid number")]
    InvalidNumberLiteral(String),
    #[error("declared type {declared} does not match the {actual} leaf")]
    TypeMismatch { declared: LeafType, actual: LeafType },
    #[error("{0} leaves are not editable")]
    TypeNotEditable(LeafType),
}

fn is_whole(f: f64) -> bool {
    f.is_finite() && f.trunc() == f && f >= i64::MIN as f64 && f <= i64::MAX as f64
}

/// Normalizes an existing scalar for comparison. `None` for leaves that
/// have no normalized form (`Text`, `Null`).
pub fn normalize_scalar(scalar: &ScalarValue) -> Option<Normalized> {
    match scalar {
        ScalarValue::Integer(i) => Some(Normalized::Int(*i)),
        ScalarValue::Float(f) if is_whole(*f) => Some(Normalized::Int(*f as i64)),
        ScalarValue::Float(f) => Some(Normalized::Float(*f)),
        ScalarValue::Boolean(b) => Some(Normalized::Bool(*b)),
        ScalarValue::Text(_) | ScalarValue::Null => None,
    }
}

/// Parses a raw candidate string against a declared type.
///
/// # Errors
///
/// - `Boolean`: anything but the exact literals `true`/`false` is
///   [`EditError::InvalidBooleanLiteral`].
/// - `Number`: unparseable or non-finite input is
///   [`EditError::InvalidNumberLiteral`]; a parsed float equal to its
///   truncation narrows to [`Normalized::Int`].
/// - `Text`/`Null`: always [`EditError::TypeNotEditable`].
pub fn parse_candidate(declared: LeafType, raw: &str) -> Result<Normalized, EditError> {
    match declared {
        LeafType::Boolean => match raw {
            "true" => Ok(Normalized::Bool(true)),
            "false" => Ok(Normalized::Bool(false)),
            _ => Err(EditError::InvalidBooleanLiteral(raw.to_string())),
        },
        LeafType::Number => {
            let parsed: f64 = raw
                .parse()
                .map_err(|_| EditError::InvalidNumberLiteral(raw.to_string()))?;
            if !parsed.is_finite() {
                return Err(EditError::InvalidNumberLiteral(raw.to_string()));
            }
            if is_whole(parsed) {
                Ok(Normalized::Int(parsed as i64))
            } else {
                Ok(Normalized::Float(parsed))
            }
        }
        LeafType::Text | LeafType::Null => Err(EditError::TypeNotEditable(declared)),
    }
}

/// Validates a proposed edit against the addressed leaf.
///
/// Returns `Ok(None)` when the normalized candidate equals the normalized
/// current value (no-op suppression: success, zero side effects) and
/// `Ok(Some(_))` for an accepted replacement value.
pub fn propose(
    declared: LeafType,
    current: &ScalarValue,
    raw: &str,
) -> Result<Option<Normalized>, EditError> {
    if matches!(declared, LeafType::Text | LeafType::Null) {
        return Err(EditError::TypeNotEditable(declared));
    }
    let actual = LeafType::of(current);
    if actual != declared {
        return Err(EditError::TypeMismatch { declared, actual });
    }
    let candidate = parse_candidate(declared, raw)?;
    match normalize_scalar(current) {
        Some(existing) if existing == candidate => Ok(None),
        _ => Ok(Some(candidate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_literals_are_exact() {
        assert_eq!(
            parse_candidate(LeafType::Boolean, "true"),
            Ok(Normalized::Bool(true))
        );
        assert_eq!(
            parse_candidate(LeafType::Boolean, "false"),
            Ok(Normalized::Bool(false))
        );
        for bad in ["True", "FALSE", "1", "yes", ""] {
            assert!(matches!(
                parse_candidate(LeafType::Boolean, bad),
                Err(EditError::InvalidBooleanLiteral(_))
            ));
        }
    }

    #[test]
    fn test_number_parsing_and_narrowing() {
        assert_eq!(parse_candidate(LeafType::Number, "2"), Ok(Normalized::Int(2)));
        assert_eq!(
            parse_candidate(LeafType::Number, "2.0"),
            Ok(Normalized::Int(2))
        );
        assert_eq!(
            parse_candidate(LeafType::Number, "-14"),
            Ok(Normalized::Int(-14))
        );
        assert_eq!(
            parse_candidate(LeafType::Number, "3.5"),
            Ok(Normalized::Float(3.5))
        );
        for bad in ["abc", "", "1.2.3", "inf", "NaN"] {
            assert!(matches!(
                parse_candidate(LeafType::Number, bad),
                Err(EditError::InvalidNumberLiteral(_))
            ));
        }
    }

    #[test]
    fn test_text_and_null_are_not_editable() {
        for declared in [LeafType::Text, LeafType::Null] {
            assert_eq!(
                parse_candidate(declared, "anything"),
                Err(EditError::TypeNotEditable(declared))
            );
        }
        assert_eq!(
            propose(LeafType::Text, &ScalarValue::Text("s".into()), "other"),
            Err(EditError::TypeNotEditable(LeafType::Text))
        );
        assert_eq!(
            propose(LeafType::Null, &ScalarValue::Null, "null"),
            Err(EditError::TypeNotEditable(LeafType::Null))
        );
    }

    #[test]
    fn test_normalize_scalar_narrows_whole_floats() {
        assert_eq!(
            normalize_scalar(&ScalarValue::Float(2.0)),
            Some(Normalized::Int(2))
        );
        assert_eq!(
            normalize_scalar(&ScalarValue::Float(2.5)),
            Some(Normalized::Float(2.5))
        );
        assert_eq!(
            normalize_scalar(&ScalarValue::Integer(2)),
            Some(Normalized::Int(2))
        );
        assert_eq!(normalize_scalar(&ScalarValue::Null), None);
    }

    #[test]
    fn test_noop_suppression() {
        // Integer 2 vs candidate "2.0": both normalize to Int(2).
        assert_eq!(
            propose(LeafType::Number, &ScalarValue::Integer(2), "2.0"),
            Ok(None)
        );
        // Whole float 2.0 vs candidate "2".
        assert_eq!(
            propose(LeafType::Number, &ScalarValue::Float(2.0), "2"),
            Ok(None)
        );
        assert_eq!(
            propose(LeafType::Boolean, &ScalarValue::Boolean(true), "true"),
            Ok(None)
        );
    }

    #[test]
    fn test_accepted_edits() {
        assert_eq!(
            propose(LeafType::Number, &ScalarValue::Integer(10), "3.5"),
            Ok(Some(Normalized::Float(3.5)))
        );
        assert_eq!(
            propose(LeafType::Boolean, &ScalarValue::Boolean(true), "false"),
            Ok(Some(Normalized::Bool(false)))
        );
    }

    #[test]
    fn test_type_mismatch_against_node() {
        assert_eq!(
            propose(LeafType::Number, &ScalarValue::Boolean(true), "1"),
            Err(EditError::TypeMismatch {
                declared: LeafType::Number,
                actual: LeafType::Boolean,
            })
        );
        assert_eq!(
            propose(LeafType::Boolean, &ScalarValue::Integer(1), "true"),
            Err(EditError::TypeMismatch {
                declared: LeafType::Boolean,
                actual: LeafType::Number,
            })
        );
    }
}
