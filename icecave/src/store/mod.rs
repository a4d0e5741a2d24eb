//! Flat-file persistence and the periodic dump daemon.
//!
//! Persistence is a single JSON array per instance, written to
//! `<directory>/<name>.json`. The file is always loadable by a standard
//! JSON parser; a missing or malformed file is never a startup error, it
//! just seeds an empty collection.
//!
//! Dumps are best-effort snapshots taken on a per-instance timer. The
//! [`DumpDaemon`] owns the schedule and its Running/Stopped lifecycle; the
//! [`FlatFileStore`] owns the target path and the streaming writer.

mod dump_daemon;
mod flat_file;

pub use dump_daemon::DumpDaemon;
pub use flat_file::FlatFileStore;
