//! Reqcache error types

/// Reqcache error types
#[derive(Debug, thiserror::Error)]
pub enum ReqcacheError {
    /// Malformed descriptor or configuration value, reported before any I/O.
    #[error("invalid [{field}]: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network failure reaching the target server. Never cached.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Cache backend failure. The orchestrator absorbs these wherever a
    /// correct fresh answer can still be returned.
    #[error("store error: {0}")]
    Store(String),
}

impl ReqcacheError {
    /// Shorthand for a [`Validation`](Self::Validation) error.
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<redis::RedisError> for ReqcacheError {
    fn from(err: redis::RedisError) -> Self {
        ReqcacheError::Store(err.to_string())
    }
}

/// Result type alias for reqcache operations
pub type Result<T> = std::result::Result<T, ReqcacheError>;
