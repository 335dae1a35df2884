use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Credentials file missing, unreadable or malformed
    #[error("Credentials error: {0}")]
    CredentialsError(String),
    /// Object store listing failed (authentication, network, missing bucket)
    #[error("Storage error: {0}")]
    StorageError(String),
    /// HTTP download failed
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Response body is not a readable zip archive
    #[error("Archive error: {0}")]
    ArchiveError(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::ArchiveError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn test_credentials_error_display() {
        let err = AppError::CredentialsError("expected at least 2 lines".to_string());
        assert!(err.to_string().contains("Credentials error"));
        assert!(err.to_string().contains("expected at least 2 lines"));
    }

    #[test]
    fn test_storage_error_display() {
        let err = AppError::StorageError("NoSuchBucket".to_string());
        assert!(err.to_string().contains("Storage error"));
        assert!(err.to_string().contains("NoSuchBucket"));
    }

    #[test]
    fn test_archive_error_display() {
        let err = AppError::ArchiveError("invalid Zip archive".to_string());
        assert!(err.to_string().contains("Archive error"));
    }

    #[test]
    fn test_zip_error_converts_to_archive_error() {
        let err: AppError = zip::result::ZipError::InvalidArchive("bad header").into();
        assert!(matches!(err, AppError::ArchiveError(_)));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::IoError(msg) if msg.contains("missing")));
    }

    #[test]
    fn test_app_error_implements_error_trait() {
        use std::error::Error;
        let err: Box<dyn Error> = Box::new(AppError::NetworkError("test".to_string()));
        assert!(!err.to_string().is_empty());
    }
}
