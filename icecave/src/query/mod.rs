//! Query predicate compilation and caching.
//!
//! Queries are JSON Schema descriptions. Compiling a schema into a
//! validator is the expensive step, so compilations are memoized in a
//! [`PredicateCache`] keyed by the query's structural value. Callers
//! typically construct a fresh query object on every call with the same
//! logical content, so keying on identity would never hit.

mod cache;
mod predicate;

pub use cache::PredicateCache;
pub use predicate::CompiledPredicate;
