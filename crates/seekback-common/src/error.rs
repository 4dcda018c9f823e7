//! Common error types used throughout seekback.
//!
//! This module provides a unified error type that covers common failure cases
//! such as missing samples, store failures, and filesystem I/O.

/// Common error type for seekback.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested sample was not found.
    #[error("Sample not found: {0}")]
    NotFound(String),

    /// A database operation failed.
    ///
    /// The message is prefixed with the operation that failed
    /// (`select`, `insert`, `update`, `delete`, `fts rebuild`, ...).
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error means the sample does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("2024-01-01T00:00:00+00:00");
        assert_eq!(
            err.to_string(),
            "Sample not found: 2024-01-01T00:00:00+00:00"
        );

        let err = Error::database("insert: constraint failed");
        assert_eq!(err.to_string(), "Database error: insert: constraint failed");

        let err = Error::invalid_input("bad timestamp");
        assert_eq!(err.to_string(), "Invalid input: bad timestamp");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::not_found("x").is_not_found());
        assert!(!Error::database("select: boom").is_not_found());
    }
}
