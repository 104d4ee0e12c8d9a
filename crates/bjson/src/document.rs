//! The addressable document tree.
//!
//! A [`Document`] is built once per load from the decoded value tree and
//! the raw bytes it came from. Construction walks the tree a single time,
//! assigning every node both of its addresses: a flat pre-order sequence
//! index (container before children, root = 0) and a root-relative
//! pointer path. The index-to-path table built during that walk makes
//! flat lookup O(1) for the document's lifetime.
//!
//! The tree's structure is immutable after construction; only scalar leaf
//! values may be replaced (by the rebuild strategy). Flat indices
//! therefore stay valid as long as the document lives.

use std::path::{Path as FsPath, PathBuf};

use bjson_pack::BjsonValue;
use bjson_pointer::{format_pointer, is_valid_index, Path};
use thiserror::Error;

/// A tagged scalar leaf value. Replaced wholesale on edit, never mutated
/// in place.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Null,
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Ordered mapping from unique key to child node.
    Object(Vec<(String, Node)>),
    /// Ordered, 0-based sequence of child nodes.
    Array(Vec<Node>),
    /// A leaf.
    Scalar(ScalarValue),
}

impl Node {
    /// The scalar payload, if this node is a leaf.
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Converts the subtree back into a codec value, preserving key and
    /// element order exactly.
    pub fn to_value(&self) -> BjsonValue {
        match self {
            Node::Object(fields) => BjsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
            Node::Array(items) => BjsonValue::Array(items.iter().map(Node::to_value).collect()),
            Node::Scalar(ScalarValue::Integer(i)) => BjsonValue::Integer(*i),
            Node::Scalar(ScalarValue::Float(f)) => BjsonValue::Float(*f),
            Node::Scalar(ScalarValue::Text(s)) => BjsonValue::Str(s.clone()),
            Node::Scalar(ScalarValue::Boolean(b)) => BjsonValue::Bool(*b),
            Node::Scalar(ScalarValue::Null) => BjsonValue::Null,
        }
    }
}

/// A decoded value used a shape the document model cannot represent.
/// Fatal to the load; the caller keeps its previous document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("unsupported {shape} value at {pointer:?}")]
    Unsupported {
        shape: &'static str,
        pointer: String,
    },
}

/// An address failed to resolve against this document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("no node with sequence index {0}")]
    UnknownIndex(u32),
    #[error("sequence index {0:?} is not a number")]
    InvalidFlatIndex(String),
    #[error("object has no key {0:?}")]
    UnknownKey(String),
    #[error("array index {index} out of bounds (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("segment {0:?} is not a valid array index")]
    InvalidIndex(String),
    #[error("cannot descend into a scalar")]
    NotAContainer,
    #[error("address does not name a scalar leaf")]
    NotAScalar,
}

/// A loaded document: the node tree, the bytes it was decoded from, the
/// path it was loaded from, and the flat-index address table.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
    bytes: Vec<u8>,
    source: PathBuf,
    paths: Vec<Path>,
}

impl Document {
    /// Builds a document from a decoded value tree and its wire bytes.
    ///
    /// # Errors
    ///
    /// Fails with [`ShapeError`] if the value tree contains a shape the
    /// document model does not carry (`Undefined`); nothing is silently
    /// dropped.
    pub fn build(value: BjsonValue, bytes: Vec<u8>, source: PathBuf) -> Result<Self, ShapeError> {
        let mut paths = Vec::new();
        let mut trail: Vec<String> = Vec::new();
        let root = build_node(value, &mut trail, &mut paths)?;
        Ok(Self {
            root,
            bytes,
            source,
            paths,
        })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The original wire bytes this document was decoded from.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn source(&self) -> &FsPath {
        &self.source
    }

    /// Total node count (containers included).
    pub fn node_count(&self) -> usize {
        self.paths.len()
    }

    /// The pointer path of the node with the given flat sequence index.
    pub fn path_of(&self, index: u32) -> Option<&Path> {
        self.paths.get(index as usize)
    }

    /// Resolves a pointer path to a node.
    pub fn node_at_path(&self, path: &[String]) -> Result<&Node, AddressError> {
        let mut current = &self.root;
        for segment in path {
            current = match current {
                Node::Object(fields) => fields
                    .iter()
                    .find(|(key, _)| key == segment)
                    .map(|(_, child)| child)
                    .ok_or_else(|| AddressError::UnknownKey(segment.clone()))?,
                Node::Array(items) => {
                    if !is_valid_index(segment) {
                        return Err(AddressError::InvalidIndex(segment.clone()));
                    }
                    let index: usize = segment
                        .parse()
                        .map_err(|_| AddressError::InvalidIndex(segment.clone()))?;
                    let len = items.len();
                    items
                        .get(index)
                        .ok_or(AddressError::IndexOutOfBounds { index, len })?
                }
                Node::Scalar(_) => return Err(AddressError::NotAContainer),
            };
        }
        Ok(current)
    }

    /// Resolves a pointer path to a mutable node.
    pub fn node_at_path_mut(&mut self, path: &[String]) -> Result<&mut Node, AddressError> {
        let mut current = &mut self.root;
        for segment in path {
            current = match current {
                Node::Object(fields) => fields
                    .iter_mut()
                    .find(|(key, _)| key == segment)
                    .map(|(_, child)| child)
                    .ok_or_else(|| AddressError::UnknownKey(segment.clone()))?,
                Node::Array(items) => {
                    if !is_valid_index(segment) {
                        return Err(AddressError::InvalidIndex(segment.clone()));
                    }
                    let index: usize = segment
                        .parse()
                        .map_err(|_| AddressError::InvalidIndex(segment.clone()))?;
                    let len = items.len();
                    items
                        .get_mut(index)
                        .ok_or(AddressError::IndexOutOfBounds { index, len })?
                }
                Node::Scalar(_) => return Err(AddressError::NotAContainer),
            };
        }
        Ok(current)
    }

    /// Resolves a flat sequence index to a node.
    pub fn node_at_index(&self, index: u32) -> Result<&Node, AddressError> {
        let path = self
            .paths
            .get(index as usize)
            .ok_or(AddressError::UnknownIndex(index))?;
        self.node_at_path(path)
    }

    /// Converts the whole tree back into a codec value.
    pub fn to_value(&self) -> BjsonValue {
        self.root.to_value()
    }
}

fn build_node(
    value: BjsonValue,
    trail: &mut Vec<String>,
    paths: &mut Vec<Path>,
) -> Result<Node, ShapeError> {
    // Pre-order: this node claims the next sequence index before any child.
    paths.push(trail.clone());
    match value {
        BjsonValue::Null => Ok(Node::Scalar(ScalarValue::Null)),
        BjsonValue::Bool(b) => Ok(Node::Scalar(ScalarValue::Boolean(b))),
        BjsonValue::Integer(i) => Ok(Node::Scalar(ScalarValue::Integer(i))),
        BjsonValue::Float(f) => Ok(Node::Scalar(ScalarValue::Float(f))),
        BjsonValue::Str(s) => Ok(Node::Scalar(ScalarValue::Text(s))),
        BjsonValue::Undefined => Err(ShapeError::Unsupported {
            shape: "undefined",
            pointer: format_pointer(trail),
        }),
        BjsonValue::Array(items) => {
            let mut children = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                trail.push(i.to_string());
                children.push(build_node(item, trail, paths)?);
                trail.pop();
            }
            Ok(Node::Array(children))
        }
        BjsonValue::Object(fields) => {
            let mut children = Vec::with_capacity(fields.len());
            for (key, val) in fields {
                trail.push(key.clone());
                let child = build_node(val, trail, paths)?;
                trail.pop();
                children.push((key, child));
            }
            Ok(Node::Object(children))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        // {"a": 1, "b": [true, null]}
        let value = BjsonValue::Object(vec![
            ("a".to_string(), BjsonValue::Integer(1)),
            (
                "b".to_string(),
                BjsonValue::Array(vec![BjsonValue::Bool(true), BjsonValue::Null]),
            ),
        ]);
        Document::build(value, Vec::new(), PathBuf::from("test.bjson")).unwrap()
    }

    #[test]
    fn test_preorder_index_assignment() {
        let doc = sample();
        assert_eq!(doc.node_count(), 5);
        assert_eq!(doc.path_of(0).unwrap(), &Vec::<String>::new());
        assert_eq!(doc.path_of(1).unwrap(), &vec!["a".to_string()]);
        assert_eq!(doc.path_of(2).unwrap(), &vec!["b".to_string()]);
        assert_eq!(
            doc.path_of(3).unwrap(),
            &vec!["b".to_string(), "0".to_string()]
        );
        assert_eq!(
            doc.path_of(4).unwrap(),
            &vec!["b".to_string(), "1".to_string()]
        );
        assert!(doc.path_of(5).is_none());
    }

    #[test]
    fn test_node_at_index() {
        let doc = sample();
        assert_eq!(
            doc.node_at_index(1).unwrap().as_scalar(),
            Some(&ScalarValue::Integer(1))
        );
        assert_eq!(
            doc.node_at_index(3).unwrap().as_scalar(),
            Some(&ScalarValue::Boolean(true))
        );
        assert_eq!(
            doc.node_at_index(9),
            Err(AddressError::UnknownIndex(9))
        );
    }

    #[test]
    fn test_node_at_path() {
        let doc = sample();
        let path = vec!["b".to_string(), "1".to_string()];
        assert_eq!(
            doc.node_at_path(&path).unwrap().as_scalar(),
            Some(&ScalarValue::Null)
        );
        // Root path resolves to the root node.
        assert!(matches!(doc.node_at_path(&[]).unwrap(), Node::Object(_)));
    }

    #[test]
    fn test_node_at_path_failures() {
        let doc = sample();
        assert_eq!(
            doc.node_at_path(&["missing".to_string()]),
            Err(AddressError::UnknownKey("missing".to_string()))
        );
        assert_eq!(
            doc.node_at_path(&["b".to_string(), "7".to_string()]),
            Err(AddressError::IndexOutOfBounds { index: 7, len: 2 })
        );
        assert_eq!(
            doc.node_at_path(&["b".to_string(), "x".to_string()]),
            Err(AddressError::InvalidIndex("x".to_string()))
        );
        assert_eq!(
            doc.node_at_path(&["a".to_string(), "deep".to_string()]),
            Err(AddressError::NotAContainer)
        );
    }

    #[test]
    fn test_build_rejects_undefined() {
        let value = BjsonValue::Object(vec![("slot".to_string(), BjsonValue::Undefined)]);
        let err = Document::build(value, Vec::new(), PathBuf::from("t.bjson")).unwrap_err();
        assert_eq!(
            err,
            ShapeError::Unsupported {
                shape: "undefined",
                pointer: "/slot".to_string(),
            }
        );
    }

    #[test]
    fn test_to_value_preserves_order() {
        let value = BjsonValue::Object(vec![
            ("z".to_string(), BjsonValue::Integer(1)),
            ("a".to_string(), BjsonValue::Str("s".to_string())),
        ]);
        let doc = Document::build(value.clone(), Vec::new(), PathBuf::from("t.bjson")).unwrap();
        assert_eq!(doc.to_value(), value);
    }

    #[test]
    fn test_key_containing_separator_is_addressable() {
        let value = BjsonValue::Object(vec![("a/b".to_string(), BjsonValue::Integer(7))]);
        let doc = Document::build(value, Vec::new(), PathBuf::from("t.bjson")).unwrap();
        // The path table stores raw segments; escaping only applies to
        // pointer strings.
        assert_eq!(doc.path_of(1).unwrap(), &vec!["a/b".to_string()]);
        assert_eq!(
            doc.node_at_path(&["a/b".to_string()]).unwrap().as_scalar(),
            Some(&ScalarValue::Integer(7))
        );
    }
}
