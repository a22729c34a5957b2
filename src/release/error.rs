use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),
}

/// Failure of one sub-fetch of a refresh cycle
///
/// Carries the rendered remote error so snapshots can keep a record of it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Commits unavailable: {0}")]
    CommitsUnavailable(String),

    #[error("Tags unavailable: {0}")]
    TagsUnavailable(String),
}
