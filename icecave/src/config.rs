//! Configuration for an IceCave instance.

use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{ErrorKind, IceCaveError, IceCaveResult};

/// Default directory where instance data is stored.
pub const DEFAULT_DIRECTORY: &str = "./icecave-data";

/// Default instance name; also the stem of the storage file name.
pub const DEFAULT_NAME: &str = "icecave";

/// Default interval between periodic dumps.
pub const DEFAULT_DUMP_INTERVAL: Duration = Duration::from_millis(5000);

/// Configuration for an IceCave instance.
///
/// Immutable for the lifetime of the instance. The `(directory, name)` pair
/// determines the storage file path and must be exclusively owned by one
/// instance at a time; concurrent writers to the same file are unsynchronized
/// and would corrupt it.
///
/// # Examples
///
/// ```rust,ignore
/// use icecave::IceCaveConfig;
///
/// let config = IceCaveConfig {
///     directory: "./data".into(),
///     name: "friends".to_string(),
///     ..IceCaveConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct IceCaveConfig {
    /// Directory where the storage file is written. Must exist.
    pub directory: PathBuf,
    /// Instance name; the storage file is `<directory>/<name>.json`.
    pub name: String,
    /// When true, all disk I/O is skipped and the store lives purely in memory.
    pub memory_only: bool,
    /// Interval between periodic dumps.
    pub dump_interval: Duration,
}

impl Default for IceCaveConfig {
    fn default() -> Self {
        IceCaveConfig {
            directory: PathBuf::from(DEFAULT_DIRECTORY),
            name: DEFAULT_NAME.to_string(),
            memory_only: false,
            dump_interval: DEFAULT_DUMP_INTERVAL,
        }
    }
}

impl IceCaveConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the name is empty, the dump interval
    /// is zero, or the target directory does not exist.
    pub fn validate(&self) -> IceCaveResult<()> {
        if self.name.is_empty() {
            log::error!("Instance name cannot be empty");
            return Err(IceCaveError::new(
                "Instance name cannot be empty",
                ErrorKind::ConfigurationError,
            ));
        }

        if self.dump_interval.is_zero() {
            log::error!("Dump interval must be greater than zero");
            return Err(IceCaveError::new(
                "Dump interval must be greater than zero",
                ErrorKind::ConfigurationError,
            ));
        }

        if !self.directory.is_dir() {
            log::error!("Storage directory {:?} does not exist", self.directory);
            return Err(IceCaveError::new(
                &format!(
                    "The directory {:?} does not exist. Please create it and try again.",
                    self.directory
                ),
                ErrorKind::ConfigurationError,
            ));
        }

        Ok(())
    }

    /// Returns the path of the storage file for this configuration.
    pub fn db_path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.name))
    }
}
