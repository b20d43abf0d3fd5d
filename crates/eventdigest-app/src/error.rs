//! Application error types.

use std::io;
use thiserror::Error;

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced by the application layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("photo library error: {0}")]
    Library(#[from] LibraryError),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl AppError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Errors of the session manager.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session was created or restored.
    #[error("no active session")]
    NoSession,

    /// The calendar is not one of the session's calendars.
    #[error("calendar {id} is not part of the session")]
    UnknownCalendar { id: String },

    /// The session changed but could not be persisted.
    #[error("failed to persist session: {0}")]
    Persist(#[from] CacheError),
}

/// Errors of album visibility changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LibraryError {
    #[error("album {id} not found")]
    AlbumNotFound { id: String },

    #[error("album {id} is already hidden")]
    AlbumAlreadyHidden { id: String },

    #[error("album {id} is already visible")]
    AlbumAlreadyVisible { id: String },
}

/// Errors of the key-value cache backends.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Only booleans, numbers and strings can be stored without encoding.
    #[error("value for {key} is not a scalar")]
    NotScalar { key: String },

    /// The file backend stores text only.
    #[error("value for {key} is not valid UTF-8")]
    NotText { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = AppError::from(SessionError::UnknownCalendar { id: "42".into() });
        assert_eq!(err.to_string(), "session error: calendar 42 is not part of the session");

        let err = AppError::from(LibraryError::AlbumAlreadyHidden { id: "al-1".into() });
        assert_eq!(err.to_string(), "photo library error: album al-1 is already hidden");

        assert_eq!(
            AppError::config("bad page size").to_string(),
            "configuration error: bad page size"
        );
    }
}
