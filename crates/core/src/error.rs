//! Unified error types for keydash.
//!
//! Every failure class the favicon pipeline can produce lives here; the
//! acquisition coordinator collapses all of them into an absent icon at
//! its boundary.

use tokio_rusqlite::rusqlite;

/// Unified error types for the keydash workspace.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Source URL could not be parsed into icon candidates.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Fetch timed out and the transfer was aborted.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// HTTP error response (network failure or non-2xx status).
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Response carried a zero-length body.
    #[error("EMPTY_RESPONSE: {0}")]
    EmptyBody(String),

    /// The background bridge is gone; no fetches can be serviced.
    #[error("BRIDGE_CLOSED: background bridge is not reachable")]
    BridgeClosed,
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::HttpError("status 404 Not Found".to_string());
        assert!(err.to_string().contains("HTTP_ERROR"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::FetchTimeout("https://example.com/favicon.ico".to_string());
        assert!(err.to_string().starts_with("FETCH_TIMEOUT"));
    }

    #[test]
    fn test_bridge_closed_display() {
        assert!(Error::BridgeClosed.to_string().contains("BRIDGE_CLOSED"));
    }
}
