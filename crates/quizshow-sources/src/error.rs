//! Source error types.

use thiserror::Error;

/// Errors that can occur when talking to a bank source or speech backend.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested bank (or folder) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Credentials were rejected.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The remote refused the request because of rate limiting.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The remote returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// A bank name that would escape the source's folder.
    #[error("invalid bank name: {0}")]
    InvalidName(String),
}

impl SourceError {
    /// Returns `true` if retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SourceError::NotFound(_)
                | SourceError::AuthenticationFailed(_)
                | SourceError::InvalidName(_)
        )
    }

    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            SourceError::Timeout(timeout_secs)
        } else {
            SourceError::NetworkError(e.to_string())
        }
    }
}

/// Bank names are plain file names inside the source's folder.
pub(crate) fn check_bank_name(name: &str) -> Result<(), SourceError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(SourceError::InvalidName(name.to_string()));
    }
    Ok(())
}
