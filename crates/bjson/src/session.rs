//! The editing session: one loaded document, one addressing mode, and the
//! unsaved-changes state.
//!
//! The addressing mode is fixed when the session is created and selects
//! the whole mutation/persistence strategy:
//!
//! - [`AddressMode::Patch`] — addresses are flat pre-order sequence
//!   indices. The tree stays read-only; accepted edits accumulate in a
//!   pending table (one entry per index, last write wins) and commit
//!   patches the fixed-width records inside a copy of the original
//!   buffer.
//! - [`AddressMode::Rebuild`] — addresses are pointer paths. Accepted
//!   edits replace the leaf value in the tree immediately and commit
//!   re-encodes the whole tree.
//!
//! The session is a plain single-owner value with no interior locking.
//! Decoding is the only long-running step; callers that need a responsive
//! front end run [`EditSession::load`] on a worker thread and move the
//! session afterwards.

use std::io;
use std::path::{Path, PathBuf};

use bjson_pack::{BjsonDecodeError, BjsonDecoder, BjsonEncodeError, BjsonEncoder};
use bjson_pointer::parse_pointer;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::{AddressError, Document, Node, ShapeError};
use crate::edit::{self, LeafType};
use crate::patch::{apply_patches, PatchError, PendingEdit};

/// The addressing and persistence strategy of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    /// Flat sequence indices; commit patches records in place.
    Patch,
    /// Pointer paths; commit re-encodes the whole document.
    Rebuild,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read document: {0}")]
    Io(#[from] io::Error),
    #[error("could not decode document: {0}")]
    Decode(#[from] BjsonDecodeError),
    #[error("could not load document: {0}")]
    Shape(#[from] ShapeError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    Edit(#[from] crate::edit::EditError),
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error("patch failed: {0}")]
    Patch(#[from] PatchError),
    #[error("re-encode failed: {0}")]
    Encode(#[from] BjsonEncodeError),
    #[error("committed buffer failed verification: {0}")]
    Verify(#[from] BjsonDecodeError),
    #[error("committed buffer failed verification: {0}")]
    VerifyShape(#[from] ShapeError),
    #[error("could not write document: {0}")]
    Io(#[from] io::Error),
}

/// One loaded document plus its editing state.
pub struct EditSession {
    document: Document,
    mode: AddressMode,
    pending: Vec<PendingEdit>,
    dirty: bool,
}

impl EditSession {
    /// Reads and decodes a document from disk.
    ///
    /// Any failure leaves no session behind; the caller keeps whatever it
    /// had before.
    pub fn load(path: impl AsRef<Path>, mode: AddressMode) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes, path.to_path_buf(), mode)
    }

    /// Builds a session from an in-memory buffer.
    pub fn from_bytes(
        bytes: Vec<u8>,
        source: PathBuf,
        mode: AddressMode,
    ) -> Result<Self, LoadError> {
        let value = BjsonDecoder::new().decode(&bytes)?;
        let document = Document::build(value, bytes, source)?;
        debug!(
            source = %document.source().display(),
            nodes = document.node_count(),
            ?mode,
            "document loaded"
        );
        Ok(Self {
            document,
            mode,
            pending: Vec::new(),
            dirty: false,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn mode(&self) -> AddressMode {
        self.mode
    }

    /// Whether any edit is pending/applied but not yet persisted. Set
    /// only by an accepted edit, cleared only by a successful commit.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// The staged edits of a `Patch` session; always empty in `Rebuild`
    /// mode, where edits land in the tree instead.
    pub fn pending_edits(&self) -> &[PendingEdit] {
        &self.pending
    }

    /// Proposes a new value for the addressed scalar leaf.
    ///
    /// The address string is interpreted per mode: a decimal sequence
    /// index in `Patch`, a pointer in `Rebuild`. Returns `true` for an
    /// accepted edit and `false` for a suppressed no-op; either way a
    /// rejected proposal changes nothing.
    pub fn propose(&mut self, address: &str, raw: &str) -> Result<bool, SessionError> {
        match self.mode {
            AddressMode::Patch => {
                let index: u32 = address
                    .parse()
                    .map_err(|_| AddressError::InvalidFlatIndex(address.to_string()))?;
                let node = self.document.node_at_index(index)?;
                let scalar = node.as_scalar().ok_or(AddressError::NotAScalar)?;
                // A staged edit shadows the tree: the value the user last
                // accepted is the one the next proposal compares against.
                let current = self
                    .pending
                    .iter()
                    .find(|e| e.index == index)
                    .map(|e| e.value.to_scalar())
                    .unwrap_or_else(|| scalar.clone());
                match edit::propose(LeafType::of(&current), &current, raw)? {
                    None => Ok(false),
                    Some(value) => {
                        self.pending.retain(|e| e.index != index);
                        self.pending.push(PendingEdit { index, value });
                        self.dirty = true;
                        Ok(true)
                    }
                }
            }
            AddressMode::Rebuild => {
                let path = parse_pointer(address);
                let node = self.document.node_at_path_mut(&path)?;
                let Node::Scalar(scalar) = node else {
                    return Err(AddressError::NotAScalar.into());
                };
                match edit::propose(LeafType::of(scalar), scalar, raw)? {
                    None => Ok(false),
                    Some(value) => {
                        *scalar = value.to_scalar();
                        self.dirty = true;
                        Ok(true)
                    }
                }
            }
        }
    }

    /// Persists the session to `output` and reloads from the written
    /// bytes.
    ///
    /// The whole buffer is produced and verified (decode + rebuild)
    /// before anything touches disk; a failure at any point leaves the
    /// prior file, document, pending table, and dirty flag untouched.
    /// When `output` equals the source path the write goes through a
    /// sibling temp file and an atomic rename.
    pub fn commit(&mut self, output: impl AsRef<Path>) -> Result<(), CommitError> {
        let result = self.commit_inner(output.as_ref());
        if let Err(err) = &result {
            warn!(error = %err, "commit aborted");
        }
        result
    }

    fn commit_inner(&mut self, output: &Path) -> Result<(), CommitError> {
        let buf = match self.mode {
            AddressMode::Patch => {
                let mut copy = self.document.bytes().to_vec();
                apply_patches(&mut copy, &self.pending)?;
                copy
            }
            AddressMode::Rebuild => BjsonEncoder::new().encode(&self.document.to_value())?,
        };

        let value = BjsonDecoder::new().decode(&buf)?;
        let next = Document::build(value, buf, output.to_path_buf())?;

        write_buffer(output, self.document.source(), next.bytes())?;
        info!(
            output = %output.display(),
            edits = self.pending.len(),
            mode = ?self.mode,
            "commit complete"
        );

        self.document = next;
        self.pending.clear();
        self.dirty = false;
        Ok(())
    }
}

/// Writes the buffer whole. A write over the source file goes to a
/// sibling temp file first and is renamed into place, so a crash cannot
/// leave a half-written document.
fn write_buffer(output: &Path, source: &Path, bytes: &[u8]) -> io::Result<()> {
    if output == source {
        let mut tmp = output.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, output)?;
    } else {
        std::fs::write(output, bytes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bjson_pack::BjsonValue;
    use crate::document::ScalarValue;
    use crate::edit::{EditError, Normalized};

    fn sample_bytes() -> Vec<u8> {
        // {"a": 1, "b": [true, null]}
        let value = BjsonValue::Object(vec![
            ("a".to_string(), BjsonValue::Integer(1)),
            (
                "b".to_string(),
                BjsonValue::Array(vec![BjsonValue::Bool(true), BjsonValue::Null]),
            ),
        ]);
        BjsonEncoder::new().encode(&value).unwrap()
    }

    fn patch_session() -> EditSession {
        EditSession::from_bytes(sample_bytes(), PathBuf::from("t.bjson"), AddressMode::Patch)
            .unwrap()
    }

    fn rebuild_session() -> EditSession {
        EditSession::from_bytes(
            sample_bytes(),
            PathBuf::from("t.bjson"),
            AddressMode::Rebuild,
        )
        .unwrap()
    }

    #[test]
    fn test_patch_mode_stages_edits_without_touching_tree() {
        let mut session = patch_session();
        assert!(session.propose("1", "2").unwrap());
        assert!(session.dirty());
        assert_eq!(
            session.pending_edits(),
            &[PendingEdit {
                index: 1,
                value: Normalized::Int(2),
            }]
        );
        // The tree still shows the original value.
        assert_eq!(
            session.document().node_at_index(1).unwrap().as_scalar(),
            Some(&ScalarValue::Integer(1))
        );
    }

    #[test]
    fn test_patch_mode_last_write_wins() {
        let mut session = patch_session();
        assert!(session.propose("1", "2").unwrap());
        assert!(session.propose("1", "3").unwrap());
        assert_eq!(session.pending_edits().len(), 1);
        assert_eq!(session.pending_edits()[0].value, Normalized::Int(3));
    }

    #[test]
    fn test_patch_mode_noop_against_staged_value() {
        let mut session = patch_session();
        assert!(session.propose("1", "2").unwrap());
        // Re-proposing the staged value is a no-op, not a new edit.
        assert!(!session.propose("1", "2").unwrap());
        assert_eq!(session.pending_edits().len(), 1);
    }

    #[test]
    fn test_rebuild_mode_mutates_tree_eagerly() {
        let mut session = rebuild_session();
        assert!(session.propose("/b/0", "false").unwrap());
        assert!(session.dirty());
        assert!(session.pending_edits().is_empty());
        assert_eq!(
            session
                .document()
                .node_at_path(&["b".to_string(), "0".to_string()])
                .unwrap()
                .as_scalar(),
            Some(&ScalarValue::Boolean(false))
        );
    }

    #[test]
    fn test_rejected_edit_changes_nothing() {
        let mut session = patch_session();
        let err = session.propose("1", "abc").unwrap_err();
        assert_eq!(
            err,
            SessionError::Edit(EditError::InvalidNumberLiteral("abc".to_string()))
        );
        assert!(!session.dirty());
        assert!(session.pending_edits().is_empty());
    }

    #[test]
    fn test_noop_does_not_set_dirty() {
        let mut session = rebuild_session();
        assert!(!session.propose("/a", "1").unwrap());
        assert!(!session.dirty());
    }

    #[test]
    fn test_container_address_is_rejected() {
        let mut session = rebuild_session();
        let err = session.propose("/b", "1").unwrap_err();
        assert_eq!(err, SessionError::Address(AddressError::NotAScalar));

        let mut session = patch_session();
        let err = session.propose("2", "1").unwrap_err();
        assert_eq!(err, SessionError::Address(AddressError::NotAScalar));
    }

    #[test]
    fn test_text_and_null_leaves_are_refused() {
        let mut session = rebuild_session();
        let err = session.propose("/b/1", "0").unwrap_err();
        assert_eq!(
            err,
            SessionError::Edit(EditError::TypeNotEditable(LeafType::Null))
        );
    }

    #[test]
    fn test_bad_flat_address() {
        let mut session = patch_session();
        assert_eq!(
            session.propose("x", "1").unwrap_err(),
            SessionError::Address(AddressError::InvalidFlatIndex("x".to_string()))
        );
        assert_eq!(
            session.propose("99", "1").unwrap_err(),
            SessionError::Address(AddressError::UnknownIndex(99))
        );
    }
}
