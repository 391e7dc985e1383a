//! occon-chart error types

use std::time::Duration;

/// occon-chart error types
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    // Upstream/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("site not found: {0}")]
    SiteNotFound(String),

    /// The ajax module connector answered, but with a non-"ok" status.
    #[error("module error ({status}): {message}")]
    Module { status: String, message: String },

    // Data errors
    #[error("failed to parse upstream response: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ChartError {
    /// Whether the error originated from the content source.
    ///
    /// The HTTP layer reports these as a bad gateway rather than an
    /// internal failure.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Api { .. }
                | Self::RateLimited { .. }
                | Self::SiteNotFound(_)
                | Self::Module { .. }
                | Self::Parse(_)
        )
    }
}

/// Result type alias for occon-chart operations
pub type Result<T> = std::result::Result<T, ChartError>;
