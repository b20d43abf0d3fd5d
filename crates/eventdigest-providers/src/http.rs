//! HTTP plumbing shared by the provider clients.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{ProviderError, ProviderResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the HTTP client used by every provider client.
pub(crate) fn build_client(timeout: Duration) -> ProviderResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::unknown("failed to create HTTP client").with_source(e))
}

/// Sends a request and decodes a successful JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> ProviderResult<T> {
    let response = request.send().await.map_err(request_error)?;
    let status = response.status();

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    trace!(%status, bytes = body.len(), "response received");
    serde_json::from_str(&body)
        .map_err(|e| ProviderError::parse_failure(format!("failed to parse response: {}", e)))
}

fn request_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::network("request timeout")
    } else if err.is_connect() {
        ProviderError::network(format!("connection failed: {}", err))
    } else {
        ProviderError::network(format!("request failed: {}", err))
    }
}

/// Classifies a non-success status.
pub(crate) fn status_error(status: StatusCode, body: &str) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::missing_credential("access token expired or invalid")
        }
        status if status.is_server_error() => {
            ProviderError::server(format!("API error ({}): {}", status, body))
        }
        status => ProviderError::invalid_response(format!("API error ({}): {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    #[test]
    fn status_classification() {
        assert_eq!(
            status_error(StatusCode::UNAUTHORIZED, "").code(),
            ProviderErrorCode::MissingCredential
        );
        assert_eq!(
            status_error(StatusCode::FORBIDDEN, "").code(),
            ProviderErrorCode::MissingCredential
        );
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY, "").code(),
            ProviderErrorCode::Server
        );

        let err = status_error(StatusCode::BAD_REQUEST, "{\"error\":\"bad\"}");
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(err.message().contains("400"));
    }

    #[test]
    fn client_builds() {
        assert!(build_client(DEFAULT_TIMEOUT).is_ok());
    }
}
