use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for typestore operations.
///
/// Each kind names one category of failure so callers can branch on
/// [`StoreError::kind`] without parsing messages.
///
/// # Examples
///
/// ```rust
/// use typestore::errors::{ErrorKind, StoreError, StoreResult};
///
/// fn example() -> StoreResult<()> {
///     Err(StoreError::new("collection path is empty", ErrorKind::ResolutionError))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::ResolutionError);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Staging errors, raised synchronously at the call site
    /// A write target could not be resolved to a valid document reference
    ResolutionError,
    /// A value could not be converted to its wire representation
    EncodingError,
    /// Mapping a typed model to or from a value failed
    ObjectMappingError,
    /// A value violated a domain constraint (e.g. latitude out of range)
    ValidationError,

    // Lifecycle errors
    /// The operation is not valid in the current state
    InvalidOperation,

    // Transport errors, reported by the underlying store
    /// Generic transport failure
    TransportError,
    /// The atomic commit was rejected; the transport error is the cause
    CommitFailed,
    /// The transport refused a document id
    InvalidId,
    /// A document required by the operation does not exist
    NotFound,
    /// The transport denied the write
    PermissionDenied,

    // Extension errors, for third-party transports
    /// Error raised by an extension transport, tagged with its name
    Extension(String),

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ResolutionError => write!(f, "Resolution error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::TransportError => write!(f, "Transport error"),
            ErrorKind::CommitFailed => write!(f, "Commit failed"),
            ErrorKind::InvalidId => write!(f, "Invalid ID"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::Extension(name) => write!(f, "{} error", name),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// The error type of every fallible typestore operation.
///
/// `StoreError` carries a message, an [`ErrorKind`], an optional cause and the
/// backtrace captured at construction. A commit rejected by the transport is
/// reported as [`ErrorKind::CommitFailed`] with the transport's own error kept
/// verbatim as the cause.
///
/// # Examples
///
/// ```rust
/// use typestore::errors::{ErrorKind, StoreError};
///
/// let cause = StoreError::new("quota exceeded", ErrorKind::TransportError);
/// let err = StoreError::new_with_cause("batch commit failed", ErrorKind::CommitFailed, cause);
///
/// assert_eq!(err.kind(), &ErrorKind::CommitFailed);
/// assert_eq!(err.cause().unwrap().kind(), &ErrorKind::TransportError);
/// ```
#[derive(Clone)]
pub struct StoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<StoreError>>,
    backtrace: Atomic<Backtrace>,
}

impl StoreError {
    /// Creates a new `StoreError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `StoreError` that wraps `cause`.
    ///
    /// The cause is kept as-is so the original kind and message stay
    /// reachable through [`StoreError::cause`] and [`Error::source`].
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: StoreError) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&StoreError> {
        self.cause.as_deref()
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for typestore operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(feature = "serde")]
impl serde::de::Error for StoreError {
    fn custom<T: Display>(msg: T) -> Self {
        StoreError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for StoreError {
    fn custom<T: Display>(msg: T) -> Self {
        StoreError::new(&msg.to_string(), ErrorKind::ObjectMappingError)
    }
}

impl From<std::fmt::Error> for StoreError {
    fn from(err: std::fmt::Error) -> Self {
        StoreError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}

impl From<std::num::ParseIntError> for StoreError {
    fn from(err: std::num::ParseIntError) -> Self {
        StoreError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<String> for StoreError {
    fn from(msg: String) -> Self {
        StoreError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for StoreError {
    fn from(msg: &str) -> Self {
        StoreError::new(msg, ErrorKind::InternalError)
    }
}
