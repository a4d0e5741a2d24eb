//! # IceCave - Embedded JSON Document Store
//!
//! IceCave is a lightweight, embedded, in-process document store written in
//! Rust. It keeps an ordered collection of JSON documents in memory,
//! queries and mutates them through declarative JSON Schema predicates, and
//! periodically persists the collection to a single flat file.
//!
//! ## Key Features
//!
//! - **Embedded**: no separate server process, no external database
//! - **Schemaless**: documents are arbitrary JSON values
//! - **Declarative queries**: JSON Schema predicates select documents for
//!   filter, delete, and update
//! - **Patch-based updates**: mutations are RFC 6902 JSON Patch documents
//! - **Durable dumps**: a background timer streams the collection to
//!   `<directory>/<name>.json`; shutdown drains with one final dump
//! - **Memory-only mode**: all disk I/O can be switched off
//! - **Clean API**: a PIMPL façade keeps the document sequence private and
//!   hands out owned copies at every boundary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use icecave::IceCave;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = IceCave::builder().directory("./icecave-data").open()?;
//!
//! db.insert(json!({ "foo": "bar", "baz": "buzz" }));
//!
//! // Select with a JSON Schema predicate
//! let results = db.filter(&json!({
//!     "type": "object",
//!     "properties": { "foo": { "const": "bar" } },
//!     "required": ["foo"]
//! }))?;
//!
//! // Mutate the first match with a JSON Patch
//! db.update(
//!     &json!({
//!         "type": "object",
//!         "properties": { "baz": { "const": "buzz" } },
//!         "required": ["baz"]
//!     }),
//!     &json!([{ "op": "replace", "path": "/baz", "value": "boo" }]),
//! )?;
//!
//! db.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Documents and the in-memory document sequence
//! - [`config`] - Instance configuration
//! - [`errors`] - Error types and result definitions
//! - [`icecave`] - The store façade
//! - [`icecave_builder`] - Fluent builder for opening an instance
//! - [`patch`] - RFC 6902 patch application
//! - [`query`] - Predicate compilation and caching
//! - [`store`] - Flat-file persistence and the dump daemon

pub mod collection;
pub mod config;
pub mod errors;
pub mod icecave;
pub mod icecave_builder;
pub mod patch;
pub mod query;
pub mod store;

pub use collection::Document;
pub use config::IceCaveConfig;
pub use errors::{ErrorKind, IceCaveError, IceCaveResult};
pub use icecave::IceCave;
pub use icecave_builder::IceCaveBuilder;
