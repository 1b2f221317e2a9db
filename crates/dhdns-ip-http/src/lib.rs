// # HTTP IP Source
//
// This crate provides the IP-echo source for dhdns.
//
// ## Architecture
//
// Asks an external service that answers with the caller's address as plain
// text (e.g. api.ipify.org, icanhazip.com). One request per lookup, no cache:
// the engine looks the IP up once per cycle and owns the fallback logic.
//
// The returned address is only parsed here. Classification (public, private,
// ...) is the engine's job.

use dhdns_core::config::IpSourceConfig;
use dhdns_core::traits::IpSource;
use dhdns_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Parse an IP-echo response body
///
/// Surrounding whitespace (the trailing newline most services add) is ignored.
pub fn parse_ip(body: &str) -> Result<IpAddr> {
    let text = body.trim();
    if text.is_empty() {
        return Err(Error::ip_source("Empty response from IP service"));
    }
    text.parse()
        .map_err(|_| Error::ip_source(format!("Invalid IP address: {:?}", truncate(text, 64))))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// HTTP-based IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client with the configured timeout
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://api.ipify.org")
    /// - `timeout`: Per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create an IP source from validated configuration
    pub fn from_config(config: &IpSourceConfig) -> Result<Self> {
        config.validate()?;
        match config {
            IpSourceConfig::Http { url, timeout_secs } => {
                Self::new(url.clone(), Duration::from_secs(*timeout_secs))
            }
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "{} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response: {}", e)))?;

        let ip = parse_ip(&body)?;
        tracing::debug!("{} reported IP [{}]", self.url, ip);
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
