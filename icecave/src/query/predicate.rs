use jsonschema::Validator;
use serde_json::Value;

use crate::collection::Document;
use crate::errors::{ErrorKind, IceCaveError, IceCaveResult};

/// A query description compiled into a reusable boolean predicate.
///
/// Wraps a compiled JSON Schema validator. The predicate is a pure function
/// of the document: two calls on the same document always agree, and
/// evaluation never mutates anything.
pub struct CompiledPredicate {
    validator: Validator,
}

impl std::fmt::Debug for CompiledPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledPredicate").finish_non_exhaustive()
    }
}

impl CompiledPredicate {
    /// Compiles a JSON Schema query description.
    ///
    /// Compilation is the expensive step; prefer going through
    /// [`PredicateCache`](crate::query::PredicateCache) so structurally
    /// equal queries share one compiled predicate.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the query is not a valid JSON Schema.
    pub fn compile(query: &Value) -> IceCaveResult<Self> {
        let validator = jsonschema::validator_for(query).map_err(|e| {
            log::error!("Failed to compile query schema: {}", e);
            IceCaveError::new(
                &format!("Failed to compile query schema: {}", e),
                ErrorKind::QueryError,
            )
        })?;
        Ok(CompiledPredicate { validator })
    }

    /// Returns true if `document` satisfies the query.
    pub fn matches(&self, document: &Document) -> bool {
        self.validator.is_valid(document)
    }
}
