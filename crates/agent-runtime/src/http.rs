//! HTTP plumbing shared by the providers

use std::time::Duration;

use agent_core::error::{AgentError, Result};
use reqwest::{Client, Response, StatusCode};

pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AgentError::Config(format!("Failed to create HTTP client: {e}")))
}

/// Map a transport failure (connect, timeout, ...) to an agent error
pub(crate) fn transport_error(err: &reqwest::Error) -> AgentError {
    if err.is_timeout() || err.is_connect() {
        AgentError::ProviderUnavailable(err.to_string())
    } else {
        AgentError::Provider(err.to_string())
    }
}

/// Read the body of a response, turning non-2xx statuses into errors
pub(crate) async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await.map_err(|e| transport_error(&e))?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(status_error(status, &body))
    }
}

pub(crate) fn status_error(status: StatusCode, body: &str) -> AgentError {
    let detail = error_detail(body);
    tracing::warn!(%status, %detail, "Completion service returned an error");

    match status.as_u16() {
        401 | 403 => AgentError::Auth(detail),
        429 => AgentError::RateLimited(detail),
        500..=599 => AgentError::ProviderUnavailable(format!("{status}: {detail}")),
        _ => AgentError::Provider(format!("{status}: {detail}")),
    }
}

/// `error.message` from a JSON error body, otherwise the (shortened) body
pub(crate) fn error_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(ToString::to_string))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let body = r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#;
        match status_error(StatusCode::UNAUTHORIZED, body) {
            AgentError::Auth(msg) => assert_eq!(msg, "invalid x-api-key"),
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            AgentError::RateLimited(_)
        ));
        assert!(matches!(
            status_error(StatusCode::from_u16(529).unwrap(), "overloaded"),
            AgentError::ProviderUnavailable(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "nope"),
            AgentError::Provider(_)
        ));
    }
}
