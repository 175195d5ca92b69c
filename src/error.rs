//! Error types for Materials Hub.

use thiserror::Error;

/// Common error type for Materials Hub.
#[derive(Error, Debug)]
pub enum HubError {
    /// Database error.
    ///
    /// Wraps errors from the database backend. Errors from sqlx are
    /// converted automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Object storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for HubError {
    fn from(e: sqlx::Error) -> Self {
        HubError::Database(e.to_string())
    }
}

/// Result type alias for Materials Hub operations.
pub type Result<T> = std::result::Result<T, HubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = HubError::Auth("invalid password".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid password");
    }

    #[test]
    fn test_validation_error_display() {
        let err = HubError::Validation("title is empty".to_string());
        assert_eq!(err.to_string(), "validation error: title is empty");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = HubError::NotFound("material".to_string());
        assert_eq!(err.to_string(), "material not found");
    }

    #[test]
    fn test_storage_error_display() {
        let err = HubError::Storage("object missing".to_string());
        assert_eq!(err.to_string(), "storage error: object missing");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: HubError = io_err.into();
        assert!(matches!(err, HubError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(HubError::Auth("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
