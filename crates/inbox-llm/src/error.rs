//! LLM error types.

/// Errors from a text generator.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Endpoint could not be reached (connection refused, DNS failure).
    #[error("LLM unavailable: {0}")]
    Unavailable(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("LLM request timed out")]
    Timeout,
}

impl LlmError {
    /// Classify a transport error: timeouts and refused connections get their own variants.
    #[must_use]
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}
