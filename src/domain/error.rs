use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    ValidationError(String),
    ParseError(String),
    NetworkError(String),
    ConfigError(String),
    AssertionFailed(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::AssertionFailed(msg) => write!(f, "Assertion failed: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::ValidationError(format!("Invalid URL: {}", err))
    }
}

impl AppError {
    /// Both network and malformed-response failures collapse into the one
    /// user-visible processing error.
    pub fn is_processing_failure(&self) -> bool {
        matches!(self, AppError::NetworkError(_) | AppError::ParseError(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = AppError::AssertionFailed("url should include /classify".to_string());
        assert_eq!(err.to_string(), "Assertion failed: url should include /classify");
    }

    #[test]
    fn test_processing_failures() {
        assert!(AppError::NetworkError("offline".into()).is_processing_failure());
        assert!(AppError::ParseError("not json".into()).is_processing_failure());
        assert!(!AppError::ConfigError("bad".into()).is_processing_failure());
    }

    #[test]
    fn test_serde_json_error_maps_to_parse() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::ParseError(_)));
    }
}
