//! Hierarchical path addressing for BJSON documents.
//!
//! A pointer names a node by its root-relative path: a `/`-separated
//! sequence of segments, where each segment is an object key or a decimal
//! array index. The root is the empty pointer. Key segments are escaped so
//! that key content can never collide with the segment separator:
//! `~` becomes `~0` and `/` becomes `~1`.
//!
//! # Example
//!
//! ```
//! use bjson_pointer::{format_pointer, parse_pointer};
//!
//! let path = parse_pointer("/items/0/a~1b");
//! assert_eq!(path, vec!["items".to_string(), "0".to_string(), "a/b".to_string()]);
//! assert_eq!(format_pointer(&path), "/items/0/a~1b");
//! ```

use thiserror::Error;

/// A single path segment: an object key or a decimal array index.
pub type Segment = String;

/// A root-relative path. The root is the empty path.
pub type Path = Vec<Segment>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("path has no parent")]
    NoParent,
    #[error("invalid array index segment")]
    InvalidIndex,
}

/// Unescapes a pointer segment: `~1` becomes `/`, `~0` becomes `~`.
///
/// The exact left inverse of [`escape_segment`] for all inputs.
///
/// # Example
///
/// ```
/// use bjson_pointer::unescape_segment;
///
/// assert_eq!(unescape_segment("a~0b"), "a~b");
/// assert_eq!(unescape_segment("c~1d"), "c/d");
/// ```
pub fn unescape_segment(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }
    // Order matters: ~1 must be replaced before ~0
    segment.replace("~1", "/").replace("~0", "~")
}

/// Escapes a pointer segment: `~` becomes `~0`, `/` becomes `~1`.
///
/// # Example
///
/// ```
/// use bjson_pointer::escape_segment;
///
/// assert_eq!(escape_segment("a~b"), "a~0b");
/// assert_eq!(escape_segment("c/d"), "c~1d");
/// ```
pub fn escape_segment(segment: &str) -> String {
    if !segment.contains('/') && !segment.contains('~') {
        return segment.to_string();
    }
    // Order matters: ~ must be escaped before /
    segment.replace('~', "~0").replace('/', "~1")
}

/// Parses a pointer string into path segments.
///
/// The empty string is the root path. Otherwise the leading `/` is
/// stripped, the remainder is split on `/`, and each segment is
/// unescaped. A pointer without a leading `/` is accepted as relative to
/// the root.
///
/// # Example
///
/// ```
/// use bjson_pointer::parse_pointer;
///
/// assert_eq!(parse_pointer(""), Vec::<String>::new());
/// assert_eq!(parse_pointer("/"), vec![""]);
/// assert_eq!(parse_pointer("/foo/0"), vec!["foo", "0"]);
/// assert_eq!(parse_pointer("foo/0"), vec!["foo", "0"]);
/// ```
pub fn parse_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    let rest = pointer.strip_prefix('/').unwrap_or(pointer);
    rest.split('/').map(unescape_segment).collect()
}

/// Formats path segments into a pointer string.
///
/// The inverse of [`parse_pointer`]; the root path formats as the empty
/// string.
pub fn format_pointer(path: &[Segment]) -> String {
    let mut out = String::new();
    for segment in path {
        out.push('/');
        out.push_str(&escape_segment(segment));
    }
    out
}

/// Checks whether a path names the root.
pub fn is_root(path: &[Segment]) -> bool {
    path.is_empty()
}

/// Checks whether `parent` strictly contains `child`.
pub fn is_child(parent: &[Segment], child: &[Segment]) -> bool {
    parent.len() < child.len() && child[..parent.len()] == *parent
}

/// Returns the parent of a path.
///
/// # Errors
///
/// Fails with [`PointerError::NoParent`] for the root path.
pub fn parent(path: &[Segment]) -> Result<Path, PointerError> {
    if path.is_empty() {
        return Err(PointerError::NoParent);
    }
    Ok(path[..path.len() - 1].to_vec())
}

/// Checks whether a segment is a valid array index: decimal digits only,
/// no leading zero (except `"0"` itself).
///
/// # Example
///
/// ```
/// use bjson_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("42"));
/// assert!(!is_valid_index("007"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index(""));
/// ```
pub fn is_valid_index(segment: &str) -> bool {
    if segment.is_empty() {
        return false;
    }
    let bytes = segment.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_segment() {
        assert_eq!(escape_segment("plain"), "plain");
        assert_eq!(escape_segment(""), "");
        assert_eq!(escape_segment("a~b"), "a~0b");
        assert_eq!(escape_segment("c/d"), "c~1d");
        assert_eq!(escape_segment("~/"), "~0~1");
        assert_eq!(escape_segment("//"), "~1~1");
    }

    #[test]
    fn test_unescape_segment() {
        assert_eq!(unescape_segment("plain"), "plain");
        assert_eq!(unescape_segment("a~0b"), "a~b");
        assert_eq!(unescape_segment("c~1d"), "c/d");
        assert_eq!(unescape_segment("~0~1"), "~/");
        assert_eq!(unescape_segment("~1~1"), "//");
    }

    #[test]
    fn test_segment_roundtrip_vectors() {
        for s in ["", "key", "a~b", "c/d", "~/~/", "über/straße", "日本語~キー"] {
            assert_eq!(unescape_segment(&escape_segment(s)), s, "segment {s:?}");
        }
    }

    #[test]
    fn test_parse_pointer() {
        assert_eq!(parse_pointer(""), Vec::<String>::new());
        assert_eq!(parse_pointer("/"), vec![""]);
        assert_eq!(parse_pointer("/foo/bar"), vec!["foo", "bar"]);
        assert_eq!(parse_pointer("/a~0b/c~1d"), vec!["a~b", "c/d"]);
        assert_eq!(parse_pointer("/items/3"), vec!["items", "3"]);
    }

    #[test]
    fn test_format_pointer() {
        assert_eq!(format_pointer(&[]), "");
        assert_eq!(format_pointer(&["foo".to_string()]), "/foo");
        assert_eq!(
            format_pointer(&["a~b".to_string(), "c/d".to_string()]),
            "/a~0b/c~1d"
        );
        assert_eq!(format_pointer(&["".to_string()]), "/");
    }

    #[test]
    fn test_pointer_roundtrip() {
        for pointer in ["", "/", "/foo", "/foo/0", "/a~0b/c~1d", "/foo///"] {
            assert_eq!(format_pointer(&parse_pointer(pointer)), pointer);
        }
    }

    #[test]
    fn test_is_root() {
        assert!(is_root(&[]));
        assert!(!is_root(&["x".to_string()]));
    }

    #[test]
    fn test_is_child() {
        let parent_path = vec!["a".to_string()];
        let child_path = vec!["a".to_string(), "b".to_string()];
        assert!(is_child(&parent_path, &child_path));
        assert!(!is_child(&child_path, &parent_path));
        assert!(!is_child(&parent_path, &parent_path));
        assert!(!is_child(&parent_path, &["c".to_string()]));
    }

    #[test]
    fn test_parent() {
        let path = vec!["a".to_string(), "b".to_string()];
        assert_eq!(parent(&path).unwrap(), vec!["a"]);
        assert_eq!(parent(&["a".to_string()]).unwrap(), Vec::<String>::new());
        assert_eq!(parent(&[]), Err(PointerError::NoParent));
    }

    #[test]
    fn test_is_valid_index() {
        assert!(is_valid_index("0"));
        assert!(is_valid_index("10"));
        assert!(!is_valid_index("01"));
        assert!(!is_valid_index("-1"));
        assert!(!is_valid_index("1.5"));
        assert!(!is_valid_index("abc"));
        assert!(!is_valid_index(""));
    }
}
