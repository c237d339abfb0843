use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Secondary rate-limit headers sent by GitHub alongside 403 responses.
const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATELIMIT_RESET: &str = "x-ratelimit-reset";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - check your username and token")]
    Unauthorized,

    #[error("Rate limited{}", retry_after_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GitHub returned {status}: {message}")]
    Remote { status: u16, message: String },
}

fn retry_after_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(" - retry after {}s", d.as_secs()),
        None => " - please wait before retrying".to_string(),
    }
}

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data in
    /// error messages.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = body
                .char_indices()
                .take_while(|(i, _)| *i < MAX_ERROR_BODY_LENGTH)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..cut],
                body.len()
            )
        }
    }

    /// Classify a non-2xx response.
    ///
    /// 401 is terminal for the session. 429, and 403 with the rate-limit
    /// quota exhausted, surface as `RateLimited` with the retry interval
    /// parsed from the response headers when GitHub provides one.
    pub fn from_status(status: reqwest::StatusCode, headers: &HeaderMap, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            429 => ApiError::RateLimited {
                retry_after: parse_retry_after(headers),
            },
            403 if ratelimit_exhausted(headers) => ApiError::RateLimited {
                retry_after: parse_retry_after(headers),
            },
            _ => ApiError::Remote {
                status: status.as_u16(),
                message: Self::truncate_body(body),
            },
        }
    }

    /// True for transport-level failures, the only class of error that is
    /// safe to retry (and then only for idempotent requests).
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

fn ratelimit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get(RATELIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "0")
        .unwrap_or(false)
}

/// Extract a retry interval from `Retry-After` (seconds) or, failing
/// that, from `x-ratelimit-reset` (epoch seconds).
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    if let Some(secs) = headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
    {
        return Some(Duration::from_secs(secs));
    }

    let reset = headers
        .get(RATELIMIT_RESET)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())?;
    let now = chrono::Utc::now().timestamp();
    if reset > now {
        Some(Duration::from_secs((reset - now) as u64))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use reqwest::StatusCode;

    #[test]
    fn test_unauthorized_classification() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, &HeaderMap::new(), "nope");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("42"));
        let err = ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, &headers, "");
        match err {
            ApiError::RateLimited { retry_after } => {
                assert_eq!(retry_after, Some(Duration::from_secs(42)));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_forbidden_with_exhausted_quota_is_rate_limited() {
        let mut headers = HeaderMap::new();
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from_static("0"));
        let err = ApiError::from_status(StatusCode::FORBIDDEN, &headers, "");
        assert!(matches!(err, ApiError::RateLimited { .. }));
    }

    #[test]
    fn test_plain_forbidden_is_remote() {
        let err = ApiError::from_status(StatusCode::FORBIDDEN, &HeaderMap::new(), "no scope");
        match err {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "no scope");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn test_error_body_truncation() {
        let long = "x".repeat(2_000);
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &HeaderMap::new(), &long);
        match err {
            ApiError::Remote { message, .. } => {
                assert!(message.len() < 600);
                assert!(message.contains("truncated"));
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }
}
