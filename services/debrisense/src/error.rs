//! Error types for the debrisense dashboard

/// Errors that can occur in the debrisense dashboard
#[derive(Debug, thiserror::Error)]
pub enum DebrisenseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Preference store error: {0}")]
    Preferences(String),
}

/// Result type alias for debrisense operations
pub type Result<T> = std::result::Result<T, DebrisenseError>;
