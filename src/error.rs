//! Error types for the mailing list registry.

use thiserror::Error;

/// Common error type for the mailing list registry.
#[derive(Error, Debug)]
pub enum MailError {
    /// Database error.
    ///
    /// Query failures, row decoding failures and constraint violations
    /// other than uniqueness end up here.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// An email address that is already registered.
    #[error("duplicate email: {0}")]
    Duplicate(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// gRPC transport error.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Coarse failure classes that the adapters render in their own wire
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is unacceptable.
    Validation,
    /// The request conflicts with existing state (duplicate email).
    Conflict,
    /// A referenced resource does not exist.
    NotFound,
    /// Storage, I/O or infrastructure failure.
    Storage,
}

impl MailError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MailError::Validation(_) => ErrorKind::Validation,
            MailError::Duplicate(_) => ErrorKind::Conflict,
            MailError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Storage,
        }
    }
}

// Conversion from sqlx errors
impl From<sqlx::Error> for MailError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                MailError::Duplicate(db_err.message().to_string())
            }
            _ => MailError::Database(e.to_string()),
        }
    }
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, MailError>;
