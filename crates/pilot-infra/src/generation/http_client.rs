//! HTTP client factory for the generation backends.

use std::time::Duration;

use pilot_core::ports::GenerationError;

const USER_AGENT: &str = concat!("socialpilot/", env!("CARGO_PKG_VERSION"));

/// Build a `reqwest::Client` for backend calls.
///
/// `None` leaves the transport's default (no overall timeout).
pub fn build_http_client(timeout: Option<Duration>) -> Result<reqwest::Client, GenerationError> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| GenerationError::Configuration(format!("HTTP client: {e}")))
}

/// Map a non-2xx response to a transport error, keeping a short excerpt of the
/// body for the log.
pub(crate) fn status_error(backend: &str, status: reqwest::StatusCode, body: &str) -> GenerationError {
    let excerpt: String = body.chars().take(200).collect();
    GenerationError::Transport(format!("{backend} returned {status}: {excerpt}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(None).is_ok());
        assert!(build_http_client(Some(Duration::from_secs(30))).is_ok());
    }

    #[test]
    fn test_status_error_truncates_body() {
        let err = status_error("byok", reqwest::StatusCode::BAD_GATEWAY, &"x".repeat(500));
        let GenerationError::Transport(msg) = err else {
            panic!("expected transport error");
        };
        assert!(msg.starts_with("byok returned 502 Bad Gateway: "));
        assert!(msg.len() < 300);
    }
}
