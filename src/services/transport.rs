use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;

/// API-key header used by the BFL.ai endpoints.
const API_KEY_HEADER: &str = "x-key";

/// HTTPS request/response capability the edit job client is built over.
///
/// The production implementation is [`ReqwestTransport`]; tests script a
/// fake to drive the poll loop without a live server. Implementations must
/// be safe for concurrent use, since every in-flight edit shares one
/// transport.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body, expecting a 2xx JSON response.
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError>;

    /// GET a JSON resource with the API-key header.
    async fn get_json(&self, url: &str, api_key: &str)
        -> Result<serde_json::Value, TransportError>;

    /// GET a raw resource without authentication (result downloads).
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(request_timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(request_timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn get_json(
        &self,
        url: &str,
        api_key: &str,
    ) -> Result<serde_json::Value, TransportError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Used by test doubles to simulate connection-level failures.
    #[error("connection failed: {0}")]
    Connection(String),
}
