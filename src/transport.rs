use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;

/// Decoded JSON body of a successful (2xx) response.
pub type RawResponse = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    Timeout,
    Connect,
    Reset,
    Other,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error ({kind:?}): {message}")]
    Network { kind: NetworkKind, message: String },
    #[error("HTTP {status} for {path}")]
    Http { status: u16, path: String },
    #[error("invalid response body for {path}: {message}")]
    Decode { path: String, message: String },
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// Only connection-level failures are worth another attempt.
    pub fn is_network(&self) -> bool { matches!(self, TransportError::Network { .. }) }

    pub fn timeout(message: impl Into<String>) -> Self {
        TransportError::Network { kind: NetworkKind::Timeout, message: message.into() }
    }

    fn from_reqwest(e: reqwest::Error, path: &str) -> Self {
        let message = e.to_string();
        let lower = message.to_ascii_lowercase();
        if e.is_timeout() || lower.contains("timeout") || lower.contains("timed out") {
            return TransportError::Network { kind: NetworkKind::Timeout, message };
        }
        if lower.contains("connection reset") || lower.contains("econnreset") {
            return TransportError::Network { kind: NetworkKind::Reset, message };
        }
        if e.is_connect() {
            return TransportError::Network { kind: NetworkKind::Connect, message };
        }
        if e.is_request() || e.is_body() || lower.contains("network error") {
            return TransportError::Network { kind: NetworkKind::Other, message };
        }
        if let Some(status) = e.status() {
            return TransportError::Http { status: status.as_u16(), path: path.to_string() };
        }
        TransportError::Decode { path: path.to_string(), message }
    }
}

/// Executes one request against the upstream API. Implementations must map
/// non-2xx responses to `Http` and connection/timeout failures to `Network`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, method: Method, path: &str, params: &[(&str, String)]) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport with a fixed base URL, timeout and default headers.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid base URL: {}", config.base_url))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .with_context(|| format!("invalid user agent: {}", config.user_agent))?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url { &self.base_url }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{}/{}", base, path.trim_start_matches('/'));
        Url::parse(&full).map_err(|e| TransportError::InvalidUrl(format!("{full}: {e}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: Method, path: &str, params: &[(&str, String)]) -> Result<RawResponse, TransportError> {
        let url = self.endpoint(path)?;
        let response = self.client
            .request(method, url)
            .query(params)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, path))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http { status: status.as_u16(), path: path.to_string() });
        }

        let body = response.bytes().await.map_err(|e| TransportError::from_reqwest(e, path))?;
        serde_json::from_slice(&body)
            .map_err(|e| TransportError::Decode { path: path.to_string(), message: e.to_string() })
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn request(&self, method: Method, path: &str, params: &[(&str, String)]) -> Result<RawResponse, TransportError> {
        (**self).request(method, path, params).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_path() {
        let t = HttpTransport::new(&ClientConfig::default()).unwrap();
        let url = t.endpoint("/comic/chapter/one-piece-chapter-1").unwrap();
        assert_eq!(url.as_str(), "https://www.sankavollerei.com/comic/chapter/one-piece-chapter-1");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_on_base() {
        let cfg = ClientConfig { base_url: "https://api.example.com/".into(), ..ClientConfig::default() };
        let t = HttpTransport::new(&cfg).unwrap();
        assert_eq!(t.endpoint("comic/terbaru").unwrap().as_str(), "https://api.example.com/comic/terbaru");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let cfg = ClientConfig { base_url: "not a url".into(), ..ClientConfig::default() };
        assert!(HttpTransport::new(&cfg).is_err());
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(TransportError::timeout("timeout of 30000ms exceeded").is_network());
        assert!(!TransportError::Http { status: 503, path: "/comic/terbaru".into() }.is_network());
        assert!(!TransportError::Decode { path: "/x".into(), message: "eof".into() }.is_network());
    }
}
