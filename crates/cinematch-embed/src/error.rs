use cinematch_core::CatalogError;
use thiserror::Error;

/// Failures of the embedding provider call.
///
/// Every variant is surfaced to the caller unchanged; nothing is retried
/// internally.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider configuration is invalid.
    #[error("invalid embedding configuration: {0}")]
    Config(String),

    /// The request did not complete within the configured timeout.
    #[error("embedding request timed out after {secs}s")]
    Timeout {
        /// Configured timeout in seconds.
        secs: u64,
    },

    /// Connection or transport failure.
    #[error("embedding request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-success status.
    #[error("embedding provider returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The response body could not be parsed.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    /// The response contained no embedding.
    #[error("embedding response contained no vector")]
    EmptyResponse,

    /// The returned vector has the wrong dimensionality.
    #[error("embedding has {actual} dimensions, expected {expected}")]
    InvalidDimensions {
        /// Configured dimensionality.
        expected: usize,
        /// Length of the returned vector.
        actual: usize,
    },
}

impl ProviderError {
    /// Returns `true` if the caller may reasonably retry the request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Config(_)
            | Self::InvalidResponse(_)
            | Self::EmptyResponse
            | Self::InvalidDimensions { .. } => false,
        }
    }
}

/// Errors from a semantic catalog search.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The query could not be embedded.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The catalog could not be read.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result type alias for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Result type alias for semantic search.
pub type Result<T> = std::result::Result<T, MatchError>;
