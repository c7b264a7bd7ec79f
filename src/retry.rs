use async_trait::async_trait;
use reqwest::Method;
use std::time::Duration;
use tracing::warn;

use crate::config::RetryConfig;
use crate::transport::{RawResponse, Transport, TransportError};

/// Bounded exponential backoff: the delay before retry `n` (1-based) is `base * 2^n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self { Self::from(&RetryConfig::default()) }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self { max_retries: cfg.max_retries, base_delay: Duration::from_millis(cfg.base_delay_ms) }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Wraps a transport and retries network failures. HTTP status errors and
/// undecodable bodies pass straight through.
pub struct Retrying<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> Retrying<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self { Self { inner, policy } }

    pub fn policy(&self) -> RetryPolicy { self.policy }

    pub fn inner(&self) -> &T { &self.inner }
}

#[async_trait]
impl<T: Transport> Transport for Retrying<T> {
    async fn request(&self, method: Method, path: &str, params: &[(&str, String)]) -> Result<RawResponse, TransportError> {
        let mut retry = 0;
        loop {
            match self.inner.request(method.clone(), path, params).await {
                Err(e) if e.is_network() && retry < self.policy.max_retries => {
                    retry += 1;
                    let delay = self.policy.delay_for(retry);
                    warn!(path, retry, max = self.policy.max_retries, ?delay, error = %e, "request failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                outcome => return outcome,
            }
        }
    }
}
