//! HTTP client configuration
//!
//! Connection pooling and timeout settings for the shared reqwest client.
//! One client instance is built at startup and reused for every request so
//! connections to the backend are pooled.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::constants::http;
use crate::errors::ConfigResult;

/// Settings applied when building the shared HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Overall per-request timeout
    pub request_timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// How long idle pooled connections are kept
    pub pool_idle_timeout: Duration,
    /// Maximum pooled connections per host
    pub pool_max_per_host: usize,
    /// User agent header value
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: http::POOL_IDLE_TIMEOUT,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Build the reqwest client from these settings
    pub fn build_http_client(&self) -> ConfigResult<Client> {
        let client = Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_per_host)
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .build()?;

        debug!(
            timeout_secs = self.request_timeout.as_secs(),
            pool_max_per_host = self.pool_max_per_host,
            "Built HTTP client"
        );
        Ok(client)
    }
}
