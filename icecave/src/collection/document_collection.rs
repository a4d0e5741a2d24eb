use crate::collection::Document;
use crate::errors::IceCaveResult;
use crate::patch::apply_patch;
use crate::query::CompiledPredicate;
use serde_json::Value;

/// The ordered in-memory document sequence.
///
/// Insertion order is significant and preserved across operations;
/// deletions do not reorder survivors. All query operations are linear
/// scans over the flat sequence, which is acceptable for the small
/// workloads this store targets.
///
/// `DocumentCollection` is not thread-safe by itself. The [`IceCave`]
/// façade wraps it in an `RwLock` and serializes caller operations.
///
/// [`IceCave`]: crate::IceCave
pub struct DocumentCollection {
    documents: Vec<Document>,
}

impl DocumentCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        DocumentCollection {
            documents: Vec::new(),
        }
    }

    /// Creates a collection seeded with existing documents, preserving
    /// their order.
    pub fn seeded(documents: Vec<Document>) -> Self {
        DocumentCollection { documents }
    }

    /// Appends a document to the end of the sequence.
    ///
    /// Ownership of the value moves into the collection, so the caller
    /// retains no handle to the stored state. Never fails.
    pub fn insert(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Returns copies of every document matching `predicate`, in original
    /// order. Does not mutate the collection.
    pub fn filter(&self, predicate: &CompiledPredicate) -> Vec<Document> {
        self.documents
            .iter()
            .filter(|document| predicate.matches(document))
            .cloned()
            .collect()
    }

    /// Removes every document matching `predicate`, preserving the relative
    /// order of survivors.
    pub fn delete(&mut self, predicate: &CompiledPredicate) {
        self.documents.retain(|document| !predicate.matches(document));
    }

    /// Applies `patch` to the first document matching `predicate` and
    /// returns a copy of the updated document.
    ///
    /// At most one document is affected per call; only the first match in
    /// insertion order is updated, never all matches. Returns `None` if no
    /// document matches. The patch is parsed and applied only once a match
    /// is found, so a malformed patch with no matching document is never
    /// observed.
    ///
    /// # Errors
    ///
    /// Returns `PatchError` if the patch is malformed or fails to apply;
    /// the collection is left unmodified in that case.
    pub fn update(
        &mut self,
        predicate: &CompiledPredicate,
        patch: &Value,
    ) -> IceCaveResult<Option<Document>> {
        for index in 0..self.documents.len() {
            if predicate.matches(&self.documents[index]) {
                let updated = apply_patch(patch, &self.documents[index])?;
                self.documents[index] = updated.clone();
                return Ok(Some(updated));
            }
        }
        Ok(None)
    }

    /// Returns a copy of the first document matching `predicate`.
    pub fn find(&self, predicate: &CompiledPredicate) -> Option<Document> {
        self.documents
            .iter()
            .find(|document| predicate.matches(document))
            .cloned()
    }

    /// Returns the index of the first document matching `predicate`.
    pub fn find_index(&self, predicate: &CompiledPredicate) -> Option<usize> {
        self.documents
            .iter()
            .position(|document| predicate.matches(document))
    }

    /// Returns a copy of the first document in the sequence.
    pub fn first(&self) -> Option<Document> {
        self.documents.first().cloned()
    }

    /// Returns a copy of the last document in the sequence.
    pub fn last(&self) -> Option<Document> {
        self.documents.last().cloned()
    }

    /// Number of documents in the collection.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns a deep copy of the entire sequence.
    ///
    /// The dump path snapshots through this method so that concurrent
    /// inserts during a write are not reflected in the dump and cannot
    /// corrupt it.
    pub fn snapshot(&self) -> Vec<Document> {
        self.documents.clone()
    }
}

impl Default for DocumentCollection {
    fn default() -> Self {
        Self::new()
    }
}
