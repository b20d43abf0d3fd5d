//! CLI error types.

use eventdigest_app::{AppError, CacheError, LibraryError, SessionError};
use thiserror::Error;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    App(#[from] AppError),

    /// No session, or the provider sign in expired.
    #[error("not logged in: run `eventdigest login <provider>`")]
    NotLoggedIn,

    /// A provider call failed; details were logged.
    #[error("provider error: {0}")]
    Provider(String),

    /// The command cannot run with the given arguments or state.
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }
}

impl From<CacheError> for CliError {
    fn from(err: CacheError) -> Self {
        Self::App(err.into())
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        Self::App(err.into())
    }
}

impl From<LibraryError> for CliError {
    fn from(err: LibraryError) -> Self {
        Self::App(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            CliError::provider("events unavailable").to_string(),
            "provider error: events unavailable"
        );
        assert!(CliError::NotLoggedIn.to_string().contains("eventdigest login"));
        assert_eq!(
            CliError::from(AppError::config("bad")).to_string(),
            "configuration error: bad"
        );
    }
}
