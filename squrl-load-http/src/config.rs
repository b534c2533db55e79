//! HTTP client configuration

use serde::{Deserialize, Serialize};
use squrl_load_config::TargetConfig;
use std::time::Duration;

/// Settings for the probe's HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL; endpoint paths are appended to it
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Whether to verify SSL certificates
    pub verify_ssl: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        TargetConfig::default().into()
    }
}

impl From<TargetConfig> for ClientConfig {
    fn from(config: TargetConfig) -> Self {
        Self {
            base_url: config.base_url,
            timeout: config.timeout,
            verify_ssl: config.verify_ssl,
        }
    }
}
