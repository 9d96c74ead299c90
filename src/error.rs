//! Error types for Dewdrop.

use thiserror::Error;

/// Common error type for Dewdrop.
#[derive(Error, Debug)]
pub enum DewdropError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feed fetch or parse error.
    #[error("feed error: {0}")]
    Feed(String),

    /// WordPress API error.
    #[error("WordPress error: {0}")]
    WordPress(String),

    /// Validation error for user input or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Export error.
    #[error("export error: {0}")]
    Export(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for Dewdrop operations.
pub type Result<T> = std::result::Result<T, DewdropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_error_display() {
        let err = DewdropError::Feed("connection refused".to_string());
        assert_eq!(err.to_string(), "feed error: connection refused");
    }

    #[test]
    fn test_wordpress_error_display() {
        let err = DewdropError::WordPress("HTTP 401 Unauthorized".to_string());
        assert_eq!(err.to_string(), "WordPress error: HTTP 401 Unauthorized");
    }

    #[test]
    fn test_validation_error_display() {
        let err = DewdropError::Validation("site_url is not set".to_string());
        assert_eq!(err.to_string(), "validation error: site_url is not set");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = DewdropError::NotFound("digest file".to_string());
        assert_eq!(err.to_string(), "digest file not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DewdropError = io_err.into();
        assert!(matches!(err, DewdropError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(DewdropError::Feed("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
