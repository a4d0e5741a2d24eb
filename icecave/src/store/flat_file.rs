use parking_lot::Mutex;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::collection::Document;
use crate::errors::IceCaveResult;

/// Flat-file persistence for one document collection.
///
/// A store exclusively owns its `<directory>/<name>.json` target path for
/// the lifetime of the owning instance. Dumps are serialized by an internal
/// lock so an explicit `dump()` call can never interleave its writes with a
/// timer-driven dump.
pub struct FlatFileStore {
    path: PathBuf,
    dump_lock: Mutex<()>,
}

impl FlatFileStore {
    /// Creates a store targeting `<directory>/<name>.json`.
    pub fn new(directory: &Path, name: &str) -> Self {
        FlatFileStore {
            path: directory.join(format!("{}.json", name)),
            dump_lock: Mutex::new(()),
        }
    }

    /// The target file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the seed documents from the target path.
    ///
    /// A missing, unreadable, or malformed file yields an empty collection;
    /// load failures are never fatal.
    pub fn load(&self) -> Vec<Document> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => {
                log::info!(
                    "No storage file found at {:?}, starting a new collection",
                    self.path
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(documents)) => {
                log::info!(
                    "Loaded {} documents from {:?}",
                    documents.len(),
                    self.path
                );
                documents
            }
            Ok(_) => {
                log::warn!(
                    "Storage file {:?} is not a JSON array, starting a new collection",
                    self.path
                );
                Vec::new()
            }
            Err(e) => {
                log::warn!(
                    "Storage file {:?} is unparsable ({}), starting a new collection",
                    self.path,
                    e
                );
                Vec::new()
            }
        }
    }

    /// Writes `snapshot` to the target path as a JSON array.
    ///
    /// An empty snapshot is written as the literal `[]` in one shot.
    /// Otherwise the array is streamed through a buffered writer (`[`,
    /// each document's JSON followed by `,` on its own line, the last
    /// document, then `]`), so a large collection never has to be
    /// serialized into one giant in-memory string.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O or encoding error (disk full, permission
    /// denied, unserializable value). The file may be partially written in
    /// that case; the next successful dump replaces it.
    pub fn dump(&self, snapshot: &[Document]) -> IceCaveResult<PathBuf> {
        let _guard = self.dump_lock.lock();

        if snapshot.is_empty() {
            std::fs::write(&self.path, b"[]")?;
            return Ok(self.path.clone());
        }

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(b"[\n")?;
        let last = snapshot.len() - 1;
        for document in &snapshot[..last] {
            serde_json::to_writer(&mut writer, document)?;
            writer.write_all(b",\n")?;
        }
        serde_json::to_writer(&mut writer, &snapshot[last])?;
        writer.write_all(b"\n]")?;
        writer.flush()?;

        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::{env, fs};
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = env::temp_dir().join(format!("icecave-store-test-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_path_is_directory_join_name() {
        let store = FlatFileStore::new(Path::new("/tmp/data"), "friends");
        assert_eq!(store.path(), Path::new("/tmp/data/friends.json"));
    }

    #[test]
    fn test_dump_empty_snapshot_writes_literal_empty_array() {
        let dir = temp_dir();
        let store = FlatFileStore::new(&dir, "icecave");

        let path = store.dump(&[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_dump_streams_newline_separated_array() {
        let dir = temp_dir();
        let store = FlatFileStore::new(&dir, "icecave");

        let snapshot = vec![json!({ "foo": "bar" }), json!({ "bar": "foo" })];
        let path = store.dump(&snapshot).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "[\n{\"foo\":\"bar\"},\n{\"bar\":\"foo\"}\n]");

        // The file must always parse as a standard JSON array.
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, json!([{ "foo": "bar" }, { "bar": "foo" }]));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_dump_single_document() {
        let dir = temp_dir();
        let store = FlatFileStore::new(&dir, "icecave");

        let path = store.dump(&[json!(42)]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[\n42\n]");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_repeated_dumps_are_identical() {
        let dir = temp_dir();
        let store = FlatFileStore::new(&dir, "icecave");
        let snapshot = vec![json!({ "id": 1 }), json!({ "id": 2 })];

        store.dump(&snapshot).unwrap();
        let first = fs::read_to_string(store.path()).unwrap();
        store.dump(&snapshot).unwrap();
        let second = fs::read_to_string(store.path()).unwrap();

        assert_eq!(first, second);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_dump_then_load_round_trips() {
        let dir = temp_dir();
        let store = FlatFileStore::new(&dir, "icecave");

        let snapshot = vec![
            json!({ "nested": { "deep": [1, 2, 3] } }),
            json!("plain string"),
            json!(null),
        ];
        store.dump(&snapshot).unwrap();
        assert_eq!(store.load(), snapshot);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = temp_dir();
        let store = FlatFileStore::new(&dir, "never-written");
        assert!(store.load().is_empty());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_malformed_file_starts_empty() {
        let dir = temp_dir();
        let store = FlatFileStore::new(&dir, "icecave");
        fs::write(store.path(), "{ not json at all").unwrap();
        assert!(store.load().is_empty());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_non_array_file_starts_empty() {
        let dir = temp_dir();
        let store = FlatFileStore::new(&dir, "icecave");
        fs::write(store.path(), "{\"not\": \"an array\"}").unwrap();
        assert!(store.load().is_empty());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_dump_into_missing_directory_fails() {
        let missing = env::temp_dir().join(format!("icecave-missing-{}", Uuid::new_v4()));
        let store = FlatFileStore::new(&missing, "icecave");
        assert!(store.dump(&[json!(1)]).is_err());
    }
}
