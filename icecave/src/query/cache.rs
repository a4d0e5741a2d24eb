use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::IceCaveResult;
use crate::query::CompiledPredicate;

/// Memoizing cache of compiled query predicates.
///
/// Keys are the compact JSON serialization of the query. `serde_json`'s
/// default map keeps keys ordered, so the serialization is canonical:
/// logically identical queries built with different key orders produce the
/// same key and share one compiled predicate.
///
/// Entries live for the lifetime of the owning instance; there is no
/// eviction. A workload that synthesizes unbounded query variants will grow
/// the cache without limit; the store assumes a small bounded set of
/// distinct query shapes.
pub struct PredicateCache {
    compiled: DashMap<String, Arc<CompiledPredicate>>,
}

impl PredicateCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        PredicateCache {
            compiled: DashMap::new(),
        }
    }

    /// Returns the compiled predicate for `query`, compiling and caching it
    /// on first sight.
    ///
    /// Repeated calls with structurally equal queries return the identical
    /// `Arc`. Compilation failures are returned to the caller and not
    /// cached, so a corrected query with the same shape compiles cleanly.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the query is not a valid JSON Schema.
    pub fn compile(&self, query: &Value) -> IceCaveResult<Arc<CompiledPredicate>> {
        let key = query.to_string();

        if let Some(entry) = self.compiled.get(&key) {
            return Ok(Arc::clone(entry.value()));
        }

        let predicate = Arc::new(CompiledPredicate::compile(query)?);
        // Two racing compilations of the same shape resolve to one winner;
        // both callers observe the same Arc afterwards.
        let entry = self.compiled.entry(key).or_insert(predicate);
        Ok(Arc::clone(entry.value()))
    }

    /// Number of distinct query shapes compiled so far.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

impl Default for PredicateCache {
    fn default() -> Self {
        Self::new()
    }
}
