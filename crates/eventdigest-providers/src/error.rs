//! Error types for provider operations.
//!
//! Clients return [`ProviderResult`]. The collaborator layer in
//! [`crate::provider`] logs these errors and collapses them to `None` or an
//! empty page, so callers of the traits never see them.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// No access token is available, or the provider rejected it.
    MissingCredential,
    /// The provider answered with an unexpected status or shape.
    InvalidResponse,
    /// The response body could not be decoded.
    ParseFailure,
    /// Connection failed, timed out or was interrupted.
    Network,
    /// The provider returned a 5xx status.
    Server,
    /// Anything else.
    Unknown,
}

impl ProviderErrorCode {
    /// Returns the stable name of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidResponse => "invalid_response",
            Self::ParseFailure => "parse_failure",
            Self::Network => "network",
            Self::Server => "server",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error raised while talking to a provider.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// Provider that raised the error (e.g. "facebook", "google").
    provider: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates an error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider: None,
            source: None,
        }
    }

    /// No usable access token.
    pub fn missing_credential(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::MissingCredential, message)
    }

    /// Unexpected status or payload shape.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Undecodable body.
    pub fn parse_failure(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ParseFailure, message)
    }

    /// Transport failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Network, message)
    }

    /// Provider-side failure.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Server, message)
    }

    /// Unclassified failure.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::Unknown, message)
    }

    /// Sets the provider name.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the underlying error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref provider) = self.provider {
            write!(f, "[{}] ", provider)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
