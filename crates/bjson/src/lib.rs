//! BJSON document editing core.
//!
//! Loads a BJSON byte buffer into an addressable [`Document`] tree, lets
//! callers edit scalar leaves through validated proposals, and persists
//! the result with one of two strategies:
//!
//! - **Patch** — addresses are flat pre-order sequence indices; accepted
//!   edits accumulate in a pending table and commit rewrites only the
//!   fixed-width records of edited leaves inside the original buffer.
//! - **Rebuild** — addresses are hierarchical pointer paths; accepted
//!   edits mutate the in-memory tree immediately and commit re-encodes
//!   the whole document.
//!
//! The strategy is fixed per [`EditSession`] at load time and never mixed
//! within a session.
//!
//! # Example
//!
//! ```
//! use bjson::{AddressMode, EditSession};
//! use bjson_pack::{BjsonEncoder, BjsonValue};
//!
//! let value = BjsonValue::Object(vec![("a".to_string(), BjsonValue::Integer(1))]);
//! let bytes = BjsonEncoder::new().encode(&value).unwrap();
//! let mut session =
//!     EditSession::from_bytes(bytes, "doc.bjson".into(), AddressMode::Rebuild).unwrap();
//!
//! assert!(session.propose("/a", "2").unwrap());
//! assert!(session.dirty());
//! ```

pub mod document;
pub mod edit;
pub mod patch;
pub mod session;

pub use document::{AddressError, Document, Node, ScalarValue, ShapeError};
pub use edit::{EditError, LeafType, Normalized};
pub use patch::{apply_patches, PatchError, PendingEdit};
pub use session::{AddressMode, CommitError, EditSession, LoadError, SessionError};
