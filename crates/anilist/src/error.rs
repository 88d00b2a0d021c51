//! Error types for the anilist crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching or caching AniList data
#[derive(Error, Debug)]
pub enum AnilistError {
    /// Transport-level failure (connection, TLS, malformed body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// AniList answered with a non-success status
    #[error("AniList returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The GraphQL layer reported errors inside a response
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The requested user does not exist on AniList
    #[error("AniList user '{0}' not found")]
    UserNotFound(String),

    /// The service rate limited the request
    ///
    /// Carries the server-suggested wait so the retry loop can honor it.
    #[error("rate limited by AniList")]
    RateLimited { retry_after: Option<u64> },

    /// I/O error while reading or writing cache files
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cache file exists but does not hold a valid entry list
    #[error("cache file {} is corrupt: {source}", .path.display())]
    CorruptCache {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An entry list could not be serialized for caching
    #[error("failed to encode cache for '{user}': {source}")]
    EncodeCache {
        user: String,
        source: serde_json::Error,
    },
}

impl AnilistError {
    /// Whether a failed fetch attempt is worth repeating.
    ///
    /// Rate limits and transient HTTP trouble are; a missing user or a
    /// GraphQL validation error will not get better on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnilistError::RateLimited { .. } | AnilistError::Http(_) | AnilistError::Api { .. }
        )
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, AnilistError>;
