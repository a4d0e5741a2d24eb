use parking_lot::RwLock;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use crate::collection::{Document, DocumentCollection};
use crate::config::IceCaveConfig;
use crate::errors::IceCaveResult;
use crate::icecave_builder::IceCaveBuilder;
use crate::query::PredicateCache;
use crate::store::{DumpDaemon, FlatFileStore};

/// An embedded, in-process JSON document store.
///
/// `IceCave` holds an ordered collection of JSON documents in memory,
/// queried and mutated via JSON Schema predicates, and asynchronously
/// persisted to a single flat file on a fixed interval. On creation it
/// seeds itself from an existing dump file at `<directory>/<name>.json`
/// (a missing or malformed file just starts an empty collection), performs
/// one immediate dump, and schedules a repeating dump until
/// [`shutdown`](IceCave::shutdown).
///
/// Cloning is cheap: all clones share the same underlying state through an
/// `Arc`, and the handle can be used from multiple threads; caller
/// operations are serialized internally.
///
/// # Examples
///
/// ```rust,ignore
/// use icecave::IceCave;
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let db = IceCave::builder().directory("./icecave-data").open()?;
///
/// db.insert(json!({ "foo": "bar", "baz": "buzz" }));
///
/// let results = db.filter(&json!({
///     "type": "object",
///     "properties": { "foo": { "const": "bar" } },
///     "required": ["foo"]
/// }))?;
/// assert_eq!(results.len(), 1);
///
/// db.shutdown()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct IceCave {
    inner: Arc<IceCaveInner>,
}

impl std::fmt::Debug for IceCave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IceCave").finish_non_exhaustive()
    }
}

impl IceCave {
    /// Opens an instance with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid, in
    /// particular if the target directory does not exist. A failed initial
    /// dump is logged but is not fatal, matching the periodic dump policy.
    pub fn new(config: IceCaveConfig) -> IceCaveResult<Self> {
        Ok(IceCave {
            inner: Arc::new(IceCaveInner::open(config)?),
        })
    }

    /// Returns a builder for fluent configuration.
    pub fn builder() -> IceCaveBuilder {
        IceCaveBuilder::new()
    }

    /// Inserts a document at the end of the collection.
    ///
    /// Ownership of the value moves into the store; the caller keeps no
    /// reference to the stored state. Never fails for JSON values.
    pub fn insert(&self, document: Document) {
        self.inner.insert(document)
    }

    /// Returns copies of every document matching the query, in insertion
    /// order.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the query is not a valid JSON Schema.
    pub fn filter(&self, query: &Value) -> IceCaveResult<Vec<Document>> {
        self.inner.filter(query)
    }

    /// Deletes every document matching the query, preserving the relative
    /// order of survivors.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if the query is not a valid JSON Schema.
    pub fn delete(&self, query: &Value) -> IceCaveResult<()> {
        self.inner.delete(query)
    }

    /// Applies an RFC 6902 patch to the first document matching the query
    /// and returns a copy of the updated document, or `None` if nothing
    /// matches.
    ///
    /// At most one document is updated per call; the operation is never a
    /// bulk update.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` for an invalid query schema, or `PatchError`
    /// if a document matched but the patch was malformed or failed to
    /// apply. On `PatchError` the collection is left unmodified.
    pub fn update(&self, query: &Value, patch: &Value) -> IceCaveResult<Option<Document>> {
        self.inner.update(query, patch)
    }

    /// Returns a copy of the first document matching the query.
    pub fn find(&self, query: &Value) -> IceCaveResult<Option<Document>> {
        self.inner.find(query)
    }

    /// Returns the index of the first document matching the query.
    pub fn find_index(&self, query: &Value) -> IceCaveResult<Option<usize>> {
        self.inner.find_index(query)
    }

    /// Returns a copy of the first document in the collection.
    pub fn first(&self) -> Option<Document> {
        self.inner.first()
    }

    /// Returns a copy of the last document in the collection.
    pub fn last(&self) -> Option<Document> {
        self.inner.last()
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Dumps the collection to the storage file and returns the path
    /// written, or `None` in memory-only mode.
    ///
    /// The dump snapshots the collection by deep copy before writing, so
    /// concurrent inserts during the write are not reflected in the file
    /// and cannot corrupt it.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error on failure (disk full, permission
    /// denied). A failure here does not affect the periodic schedule.
    pub fn dump(&self) -> IceCaveResult<Option<PathBuf>> {
        self.inner.dump()
    }

    /// Stops the periodic dump schedule and performs one final dump,
    /// waiting for it to complete.
    ///
    /// The on-disk artifact then reflects the state at shutdown time, not
    /// up to one interval stale. Calling `shutdown` again after a completed
    /// shutdown is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the final dump if it fails.
    pub fn shutdown(&self) -> IceCaveResult<()> {
        self.inner.shutdown()
    }

    /// The configuration this instance was opened with.
    pub fn config(&self) -> &IceCaveConfig {
        &self.inner.config
    }
}

/// Private implementation of the store façade.
///
/// The document sequence is never exposed by reference; every public
/// operation crosses the boundary with owned values.
struct IceCaveInner {
    config: IceCaveConfig,
    collection: Arc<RwLock<DocumentCollection>>,
    predicates: PredicateCache,
    store: Arc<FlatFileStore>,
    daemon: DumpDaemon,
}

impl IceCaveInner {
    fn open(config: IceCaveConfig) -> IceCaveResult<Self> {
        config.validate()?;

        let store = Arc::new(FlatFileStore::new(&config.directory, &config.name));
        let collection = Arc::new(RwLock::new(DocumentCollection::seeded(store.load())));

        // One immediate dump, then one per interval while running. Periodic
        // failures are logged and self-heal on the next cycle.
        if let Err(e) = periodic_dump(config.memory_only, &store, &collection) {
            log::error!("Initial dump failed: {}", e);
        }
        let daemon = {
            let store = Arc::clone(&store);
            let collection = Arc::clone(&collection);
            let memory_only = config.memory_only;
            DumpDaemon::start(config.dump_interval, move || {
                if let Err(e) = periodic_dump(memory_only, &store, &collection) {
                    log::error!("Periodic dump failed: {}", e);
                }
            })
        };

        Ok(IceCaveInner {
            config,
            collection,
            predicates: PredicateCache::new(),
            store,
            daemon,
        })
    }

    fn insert(&self, document: Document) {
        self.collection.write().insert(document);
    }

    fn filter(&self, query: &Value) -> IceCaveResult<Vec<Document>> {
        let predicate = self.predicates.compile(query)?;
        Ok(self.collection.read().filter(&predicate))
    }

    fn delete(&self, query: &Value) -> IceCaveResult<()> {
        let predicate = self.predicates.compile(query)?;
        self.collection.write().delete(&predicate);
        Ok(())
    }

    fn update(&self, query: &Value, patch: &Value) -> IceCaveResult<Option<Document>> {
        let predicate = self.predicates.compile(query)?;
        self.collection.write().update(&predicate, patch)
    }

    fn find(&self, query: &Value) -> IceCaveResult<Option<Document>> {
        let predicate = self.predicates.compile(query)?;
        Ok(self.collection.read().find(&predicate))
    }

    fn find_index(&self, query: &Value) -> IceCaveResult<Option<usize>> {
        let predicate = self.predicates.compile(query)?;
        Ok(self.collection.read().find_index(&predicate))
    }

    fn first(&self) -> Option<Document> {
        self.collection.read().first()
    }

    fn last(&self) -> Option<Document> {
        self.collection.read().last()
    }

    fn len(&self) -> usize {
        self.collection.read().len()
    }

    fn is_empty(&self) -> bool {
        self.collection.read().is_empty()
    }

    fn dump(&self) -> IceCaveResult<Option<PathBuf>> {
        if self.config.memory_only {
            return Ok(None);
        }
        let snapshot = self.collection.read().snapshot();
        self.store.dump(&snapshot).map(Some)
    }

    fn shutdown(&self) -> IceCaveResult<()> {
        if !self.daemon.stop() {
            // Already shut down; the final dump has run (or is owned by the
            // caller that observed the transition).
            return Ok(());
        }
        self.dump()?;
        Ok(())
    }
}

/// One timer-driven dump cycle: snapshot under the read lock, write with no
/// lock held.
fn periodic_dump(
    memory_only: bool,
    store: &FlatFileStore,
    collection: &RwLock<DocumentCollection>,
) -> IceCaveResult<()> {
    if memory_only {
        return Ok(());
    }
    let snapshot = collection.read().snapshot();
    store.dump(&snapshot)?;
    Ok(())
}
