//! Error types for the newsdesk concierge pipeline
//!
//! Provider failures are normally absorbed at the call site (logged and
//! substituted with empty results); these variants cover the paths that
//! do surface to callers.

use thiserror::Error;

/// Main error type for the concierge system
#[derive(Error, Debug)]
pub enum ConciergeError {
    /// News search provider errors
    #[error("Search provider error: {0}")]
    SearchProvider(String),

    /// Keyword extraction errors
    #[error("Keyword extraction failed: {0}")]
    KeywordExtraction(String),

    /// Text generation provider errors
    #[error("Generation provider error: {0}")]
    GenerationProvider(String),

    /// Streaming errors
    #[error("Streaming error: {0}")]
    StreamingError(String),

    /// Request validation errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid date window errors
    #[error("Invalid date range: {from} .. {to}")]
    InvalidDateRange { from: String, to: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic errors with context
    #[error("Concierge error: {0}")]
    Generic(String),
}

/// Result type alias for concierge operations
pub type Result<T> = std::result::Result<T, ConciergeError>;

/// Convert anyhow errors to ConciergeError
impl From<anyhow::Error> for ConciergeError {
    fn from(err: anyhow::Error) -> Self {
        ConciergeError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConciergeError::SearchProvider("timeout".to_string());
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_invalid_date_range_display() {
        let err = ConciergeError::InvalidDateRange {
            from: "2026-01-10".to_string(),
            to: "2026-01-01".to_string(),
        };
        assert!(err.to_string().contains("2026-01-10"));
        assert!(err.to_string().contains("2026-01-01"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: ConciergeError = anyhow::anyhow!("wrapped").into();
        assert!(matches!(err, ConciergeError::Generic(_)));
    }
}
