//! Documents and the in-memory document sequence.
//!
//! A [`Document`] is an arbitrary JSON value with no fixed schema. The store
//! imposes no identity field; documents are addressed positionally within
//! the collection or discovered via predicate match.
//!
//! # Ownership
//!
//! Every document stored in a [`DocumentCollection`] is fully owned by the
//! collection. Insertion moves the value in; every read path returns an
//! owned deep copy. A caller can never hold a reference that observes or
//! causes mutation of stored state.
//!
//! ```rust,ignore
//! use icecave::IceCave;
//! use serde_json::json;
//!
//! let db = IceCave::builder().directory("./data").open()?;
//! db.insert(json!({ "foo": "bar", "baz": "buzz" }));
//!
//! let results = db.filter(&json!({
//!     "type": "object",
//!     "properties": { "foo": { "const": "bar" } },
//!     "required": ["foo"]
//! }))?;
//! ```

mod document_collection;

pub use document_collection::DocumentCollection;

/// A schemaless JSON document: object, array, or primitive.
///
/// `Document::clone()` is a structural deep copy at arbitrary depth, which
/// is what upholds the collection's no-aliasing invariant at every boundary
/// crossing.
pub type Document = serde_json::Value;
