use std::path::PathBuf;
use std::time::Duration;

use crate::config::IceCaveConfig;
use crate::errors::{ErrorKind, IceCaveError, IceCaveResult};
use crate::icecave::IceCave;

/// Builder for creating and configuring an [`IceCave`] instance.
///
/// Provides a fluent API over [`IceCaveConfig`]. Configuration errors are
/// captured as they occur and propagated when calling
/// [`open`](IceCaveBuilder::open), so chained calls never panic.
///
/// # Examples
///
/// ```rust,ignore
/// use icecave::IceCave;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let db = IceCave::builder()
///     .directory("./icecave-data")
///     .name("friends")
///     .open()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct IceCaveBuilder {
    error: Option<IceCaveError>,
    config: IceCaveConfig,
}

impl IceCaveBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        IceCaveBuilder {
            error: None,
            config: IceCaveConfig::new(),
        }
    }

    /// Sets the directory where the storage file is written.
    ///
    /// The directory must exist; that is checked at `open()`.
    pub fn directory<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.config.directory = directory.into();
        self
    }

    /// Sets the instance name, which determines the storage file name
    /// `<name>.json`. An empty name is captured as a configuration error.
    pub fn name(mut self, name: &str) -> Self {
        if self.error.is_none() && name.is_empty() {
            self.error = Some(IceCaveError::new(
                "Instance name cannot be empty",
                ErrorKind::ConfigurationError,
            ));
        }
        self.config.name = name.to_string();
        self
    }

    /// Disables all disk I/O; the store lives purely in memory.
    pub fn memory_only(mut self, memory_only: bool) -> Self {
        self.config.memory_only = memory_only;
        self
    }

    /// Sets the interval between periodic dumps. A zero interval is
    /// captured as a configuration error.
    pub fn dump_interval(mut self, interval: Duration) -> Self {
        if self.error.is_none() && interval.is_zero() {
            self.error = Some(IceCaveError::new(
                "Dump interval must be greater than zero",
                ErrorKind::ConfigurationError,
            ));
        }
        self.config.dump_interval = interval;
        self
    }

    /// Opens the instance.
    ///
    /// # Errors
    ///
    /// Returns the first captured configuration error, or any validation
    /// error from [`IceCave::new`] (in particular a missing directory).
    pub fn open(self) -> IceCaveResult<IceCave> {
        if let Some(error) = self.error {
            return Err(error);
        }
        IceCave::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = env::temp_dir().join(format!("icecave-builder-test-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_builder_defaults() {
        let builder = IceCaveBuilder::new();
        assert_eq!(builder.config.name, "icecave");
        assert!(!builder.config.memory_only);
        assert!(builder.error.is_none());
    }

    #[test]
    fn test_builder_opens_with_existing_directory() {
        let dir = temp_dir();
        let db = IceCave::builder()
            .directory(&dir)
            .name("friends")
            .dump_interval(Duration::from_secs(60))
            .open()
            .unwrap();

        assert_eq!(db.config().name, "friends");
        assert_eq!(db.config().db_path(), dir.join("friends.json"));

        db.shutdown().unwrap();
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_builder_captures_empty_name() {
        let dir = temp_dir();
        let result = IceCave::builder().directory(&dir).name("").open();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::ConfigurationError);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_builder_captures_zero_interval() {
        let dir = temp_dir();
        let result = IceCave::builder()
            .directory(&dir)
            .dump_interval(Duration::ZERO)
            .open();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::ConfigurationError);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_builder_keeps_first_error() {
        let dir = temp_dir();
        let result = IceCave::builder()
            .directory(&dir)
            .name("")
            .dump_interval(Duration::ZERO)
            .open();
        let error = result.unwrap_err();
        assert_eq!(error.message(), "Instance name cannot be empty");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_builder_rejects_missing_directory_at_open() {
        let missing = env::temp_dir().join(format!("icecave-missing-{}", Uuid::new_v4()));
        let result = IceCave::builder().directory(missing).open();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::ConfigurationError);
    }
}
