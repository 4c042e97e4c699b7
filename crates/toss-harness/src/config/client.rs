//! Outbound HTTP client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Whole-request timeout in milliseconds; `null` leaves it unbounded
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: Option<u64>,
    /// Idle keep-alive connections kept per host (0 disables pooling so a
    /// stopped mock port is never reached through a stale connection)
    #[serde(default)]
    pub pool_idle_per_host: usize,
}

fn default_timeout_ms() -> Option<u64> {
    Some(30_000)
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Build the shared outbound client
    pub fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(self.pool_idle_per_host);
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            pool_idle_per_host: 0,
        }
    }
}
