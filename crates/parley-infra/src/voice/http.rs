//! Shared reqwest plumbing for provider clients.

use std::time::Duration;

use parley_types::error::ProviderError;

/// Transport timeout for every provider call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn http_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ProviderError::Provider {
            message: format!("failed to create HTTP client: {e}"),
        })
}

pub(crate) fn request_failed(err: reqwest::Error) -> ProviderError {
    ProviderError::Provider {
        message: format!("HTTP request failed: {err}"),
    }
}

/// Pass successful responses through; map error statuses to `ProviderError`.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        401 => ProviderError::AuthenticationFailed,
        429 => ProviderError::RateLimited,
        _ => ProviderError::Provider {
            message: format!("HTTP {status}: {error_body}"),
        },
    })
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
