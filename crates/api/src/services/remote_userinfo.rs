//! Client for providers that expose a userinfo endpoint.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors from calling a provider's userinfo endpoint.
#[derive(Error, Debug)]
pub enum RemoteUserInfoError {
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Userinfo endpoint returned status {0}")]
    Status(u16),
}

/// HTTP client for userinfo calls, shared across requests.
#[derive(Debug, Clone)]
pub struct RemoteUserInfoClient {
    client: Client,
    timeout_ms: u64,
}

impl RemoteUserInfoClient {
    pub fn new(timeout_ms: u64) -> Result<Self, RemoteUserInfoError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self { client, timeout_ms })
    }

    /// Fetches the raw profile with the access token as bearer credential.
    pub async fn fetch_profile(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<Value, RemoteUserInfoError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Userinfo endpoint rejected request");
            return Err(RemoteUserInfoError::Status(status.as_u16()));
        }

        let profile = response.json::<Value>().await.map_err(|e| self.classify(e))?;
        tracing::debug!(url = %url, "Fetched remote user profile");
        Ok(profile)
    }

    fn classify(&self, err: reqwest::Error) -> RemoteUserInfoError {
        if err.is_timeout() {
            RemoteUserInfoError::Timeout(self.timeout_ms)
        } else {
            RemoteUserInfoError::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(RemoteUserInfoClient::new(1000).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let client = RemoteUserInfoClient::new(2000).unwrap();
        // Port 9 (discard) is not listening on loopback in test environments.
        let result = client
            .fetch_profile("http://127.0.0.1:9/userinfo", "token")
            .await;
        assert!(matches!(
            result,
            Err(RemoteUserInfoError::Http(_)) | Err(RemoteUserInfoError::Timeout(_))
        ));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RemoteUserInfoError::Status(401).to_string(),
            "Userinfo endpoint returned status 401"
        );
        assert_eq!(
            RemoteUserInfoError::Timeout(500).to_string(),
            "Request timeout after 500ms"
        );
    }
}
