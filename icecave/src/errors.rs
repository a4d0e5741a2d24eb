use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

/// Error kinds for IceCave operations.
///
/// Each kind describes a category of failure, enabling precise error
/// handling at the call site.
///
/// # Examples
///
/// ```rust,ignore
/// use icecave::errors::{ErrorKind, IceCaveError, IceCaveResult};
///
/// fn example() -> IceCaveResult<()> {
///     Err(IceCaveError::new("Storage directory missing", ErrorKind::ConfigurationError))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// Invalid configuration detected at construction time
    ConfigurationError,

    /// A query description failed to compile into a predicate
    QueryError,
    /// A patch document was malformed or could not be applied
    PatchError,

    /// Generic IO error during a dump
    IOError,
    /// The target file or directory was not found
    FileNotFound,
    /// Permission denied for a file operation
    PermissionDenied,
    /// Error encoding a document during serialization
    EncodingError,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConfigurationError => write!(f, "Configuration error"),
            ErrorKind::QueryError => write!(f, "Query error"),
            ErrorKind::PatchError => write!(f, "Patch error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom IceCave error type.
///
/// `IceCaveError` carries the error message, its kind, and an optional
/// cause, supporting error chaining and backtraces for debugging.
#[derive(Clone)]
pub struct IceCaveError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<IceCaveError>>,
    backtrace: Backtrace,
}

impl IceCaveError {
    /// Creates a new `IceCaveError` with the specified message and kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        IceCaveError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Backtrace::new(),
        }
    }

    /// Creates a new `IceCaveError` with a cause error attached.
    ///
    /// This creates an error chain where the cause is preserved for
    /// debugging.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: IceCaveError) -> Self {
        IceCaveError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Backtrace::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&IceCaveError> {
        self.cause.as_deref()
    }
}

impl Display for IceCaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for IceCaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for IceCaveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for IceCave operations.
///
/// `IceCaveResult<T>` is shorthand for `Result<T, IceCaveError>`.
/// All fallible IceCave operations return this type.
pub type IceCaveResult<T> = Result<T, IceCaveError>;

// From trait implementations for automatic error conversion
impl From<std::io::Error> for IceCaveError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        IceCaveError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<serde_json::Error> for IceCaveError {
    fn from(err: serde_json::Error) -> Self {
        IceCaveError::new(
            &format!("JSON encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icecave_error_new_creates_error() {
        let error = IceCaveError::new("An error occurred", ErrorKind::IOError);
        assert_eq!(error.message(), "An error occurred");
        assert_eq!(error.kind(), &ErrorKind::IOError);
        assert!(error.cause().is_none());
    }

    #[test]
    fn icecave_error_new_with_cause_creates_error() {
        let cause = IceCaveError::new("Disk unplugged", ErrorKind::IOError);
        let error = IceCaveError::new_with_cause("Dump failed", ErrorKind::IOError, cause);
        assert_eq!(error.message(), "Dump failed");
        assert!(error.cause().is_some());
        assert_eq!(error.cause().unwrap().message(), "Disk unplugged");
    }

    #[test]
    fn icecave_error_display_formats_correctly() {
        let error = IceCaveError::new("An error occurred", ErrorKind::IOError);
        assert_eq!(format!("{}", error), "An error occurred");
    }

    #[test]
    fn icecave_error_debug_contains_message() {
        let error = IceCaveError::new("An error occurred", ErrorKind::IOError);
        assert!(format!("{:?}", error).contains("An error occurred"));
    }

    #[test]
    fn icecave_error_source_returns_cause() {
        let cause = IceCaveError::new("inner", ErrorKind::InternalError);
        let error = IceCaveError::new_with_cause("outer", ErrorKind::IOError, cause);
        assert!(error.source().is_some());

        let error = IceCaveError::new("no cause", ErrorKind::IOError);
        assert!(error.source().is_none());
    }

    #[test]
    fn io_error_not_found_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: IceCaveError = io.into();
        assert_eq!(error.kind(), &ErrorKind::FileNotFound);
    }

    #[test]
    fn io_error_permission_denied_maps_to_permission_denied() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: IceCaveError = io.into();
        assert_eq!(error.kind(), &ErrorKind::PermissionDenied);
    }

    #[test]
    fn io_error_other_maps_to_io_error() {
        let io = std::io::Error::other("boom");
        let error: IceCaveError = io.into();
        assert_eq!(error.kind(), &ErrorKind::IOError);
    }

    #[test]
    fn serde_json_error_maps_to_encoding_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: IceCaveError = parse_err.into();
        assert_eq!(error.kind(), &ErrorKind::EncodingError);
    }

    #[test]
    fn error_kind_display_is_human_readable() {
        assert_eq!(format!("{}", ErrorKind::ConfigurationError), "Configuration error");
        assert_eq!(format!("{}", ErrorKind::QueryError), "Query error");
        assert_eq!(format!("{}", ErrorKind::PatchError), "Patch error");
    }
}
