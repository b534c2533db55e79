//! HTTP client that turns request descriptors into real calls

use crate::config::ClientConfig;
use crate::errors::HttpError;
use reqwest::{redirect, Client};
use serde_json::Value as JsonValue;
use squrl_load_core::{RequestDescriptor, ResponseDescriptor};
use std::time::Instant;
use tracing::debug;

/// Issues requests against the service under test.
///
/// Redirects are never followed, so 301/302 responses reach the classifier
/// with their `Location` header intact.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    client: Client,
    base_url: String,
}

impl ProbeClient {
    pub fn new(config: ClientConfig) -> Result<Self, HttpError> {
        let parsed = url::Url::parse(&config.base_url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HttpError::ConfigError(format!(
                "base_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        debug!(
            "Creating ProbeClient for {} with timeout: {}s",
            config.base_url,
            config.timeout.as_secs()
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path, keeping any base path prefix
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request and capture status, headers, body and end-to-end time
    pub async fn execute(
        &self,
        request: &RequestDescriptor,
        body: Option<&JsonValue>,
    ) -> Result<ResponseDescriptor, HttpError> {
        let url = if request.url.starts_with("http://") || request.url.starts_with("https://") {
            request.url.clone()
        } else {
            self.url_for(&request.url)
        };

        debug!("Sending {} request to {}", request.method, url);
        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .headers(request.headers.clone());

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await?;
        let elapsed = started.elapsed();

        debug!(
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Response received from {}",
            url
        );

        Ok(ResponseDescriptor {
            status,
            headers,
            body: text,
            elapsed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
            verify_ssl: true,
        }
    }

    #[test]
    fn test_url_for_keeps_base_path() {
        let client = ProbeClient::new(config("https://api.squrl.dev/prod/")).unwrap();
        assert_eq!(client.base_url(), "https://api.squrl.dev/prod");
        assert_eq!(client.url_for("/create"), "https://api.squrl.dev/prod/create");
        assert_eq!(client.url_for("stats/abc123"), "https://api.squrl.dev/prod/stats/abc123");
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            ProbeClient::new(config("not a url")),
            Err(HttpError::InvalidUrl(_))
        ));
        assert!(matches!(
            ProbeClient::new(config("ftp://squrl.dev")),
            Err(HttpError::ConfigError(_))
        ));
    }
}
