//! HTTP client utilities.

use reqwest::header::{CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::sources::SourceError;
use crate::utils::{with_retry, RetryConfig};

/// Shared HTTP client used by every upstream adapter
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    retry: RetryConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&HttpConfig::default())
    }

    /// Create a client with the timeouts, user agent and attempt count from config
    pub fn from_config(config: &HttpConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(config.user_agent_header())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SourceError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            retry: RetryConfig::with_attempts(config.max_attempts),
        })
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry
    }

    /// GET `url` and return the body of a successful response
    pub async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let client = &self.client;
        with_retry(self.retry, || async move {
            tracing::debug!("GET {}", url);
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| SourceError::Network(format!("Failed to reach {}: {}", url, e)))?;
            read_body(url, response).await
        })
        .await
    }

    /// GET `url` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let body = self.get_text(url).await?;
        decode_json(url, &body)
    }

    /// POST `body` as plain text and decode the JSON response
    pub async fn post_text_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &str,
    ) -> Result<T, SourceError> {
        let client = &self.client;
        let text = with_retry(self.retry, || async move {
            tracing::debug!("POST {} ({} bytes)", url, body.len());
            let response = client
                .post(url)
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(body.to_string())
                .send()
                .await
                .map_err(|e| SourceError::Network(format!("Failed to reach {}: {}", url, e)))?;
            read_body(url, response).await
        })
        .await?;

        decode_json(url, &text)
    }
}

async fn read_body(url: &str, response: Response) -> Result<String, SourceError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        return Err(SourceError::RateLimit(retry_after));
    }

    if status.is_server_error() {
        return Err(SourceError::Api(format!(
            "{} returned server error {}",
            url, status
        )));
    }

    if !status.is_success() {
        return Err(SourceError::Api(format!("{} returned status {}", url, status)));
    }

    response
        .text()
        .await
        .map_err(|e| SourceError::Network(format!("Failed to read response from {}: {}", url, e)))
}

fn decode_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body)
        .map_err(|e| SourceError::Parse(format!("Failed to parse JSON from {}: {}", url, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        ok: bool,
    }

    #[tokio::test]
    async fn test_get_json_decodes_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/probe")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let probe: Probe = client
            .get_json(&format!("{}/probe", server.url()))
            .await
            .unwrap();

        assert!(probe.ok);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/limited")
            .with_status(429)
            .with_header("retry-after", "7")
            .create_async()
            .await;
        server
            .mock("GET", "/garbage")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();

        let err = client
            .get_json::<Probe>(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Api(_)));

        let err = client
            .get_json::<Probe>(&format!("{}/limited", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::RateLimit(Some(7))));

        let err = client
            .get_json::<Probe>(&format!("{}/garbage", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[tokio::test]
    async fn test_post_text_json_sends_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_body("John Smith in Boston")
            .with_status(200)
            .with_body(r#"{"ok": false}"#)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let probe: Probe = client
            .post_text_json(&format!("{}/", server.url()), "John Smith in Boston")
            .await
            .unwrap();

        assert!(!probe.ok);
        mock.assert_async().await;
    }
}
