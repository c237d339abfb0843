//! HTTP transport for the GitHub REST API.
//!
//! `GhClient` owns the connection pool and GitHub's required headers.
//! It knows nothing about session state or retries; that policy lives in
//! [`super::session`].

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::auth::Secret;

use super::ApiError;

/// Base URL for the GitHub REST API v3.
pub const API_BASE_URL: &str = "https://api.github.com";

/// Media type GitHub expects on every request.
const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// REST API version pin.
const API_VERSION: &str = "2022-11-28";

/// HTTP request timeout in seconds. GitHub rejects unauthenticated slow
/// crawls well before this; 30s bounds blocking on a dead connection.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP transport with GitHub's protocol headers baked in.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling.
#[derive(Clone)]
pub struct GhClient {
    client: Client,
    base_url: String,
}

impl GhClient {
    /// Create a client against the production API.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Create a client against an arbitrary endpoint (mock servers in
    /// tests, GitHub Enterprise hosts).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("octoterm/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Issue a single request with the token attached, classifying any
    /// non-2xx status into an [`ApiError`].
    ///
    /// The request log line carries method, path, and status only - the
    /// `Authorization` header value is never traced.
    pub async fn dispatch<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        token: &Secret,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::AUTHORIZATION, auth_header(token)?);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, path, status = status.as_u16(), "GitHub request");

        Self::check_response(response, status).await
    }

    /// Check if a response is successful, consuming the body into an
    /// error otherwise.
    async fn check_response(response: Response, status: StatusCode) -> Result<Response, ApiError> {
        if status.is_success() {
            return Ok(response);
        }

        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &headers, &body))
    }
}

/// Build the `Authorization` header value.
///
/// Marked sensitive so reqwest's own debug output redacts it.
fn auth_header(token: &Secret) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(&format!("token {}", token.expose()))
        .map_err(|_| ApiError::Remote {
            status: 0,
            message: "token contains characters not valid in a header".to_string(),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_header_is_sensitive() {
        let token = Secret::new("ghp_example");
        let value = auth_header(&token).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "token ghp_example");
    }

    #[test]
    fn test_auth_header_rejects_control_characters() {
        let token = Secret::new("bad\ntoken");
        assert!(auth_header(&token).is_err());
    }
}
