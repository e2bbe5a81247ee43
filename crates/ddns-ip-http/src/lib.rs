// # HTTP IP Source
//
// This crate looks up the host's public IP address over HTTP.
//
// ## Architecture
//
// One GET to a plain-text "what is my IP" service (icanhazip.com by
// default). The response must be `200 OK` with a `text/plain` content type;
// the trimmed body must parse as an IPv4 or IPv6 address. There is no
// polling and no retry: the daemon calls this once per run, and only when no
// explicit record content is configured.

use ddns_core::{Error, Result};
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

/// Default public IP lookup service
pub const DEFAULT_IP_SERVICE: &str = ddns_core::config::DEFAULT_IP_PROVIDER;

/// HTTP timeout for the lookup
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based public IP lookup
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: service returning the caller's IP as plain text
    ///   (e.g., "https://icanhazip.com")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(url, client))
    }

    /// Create with an existing client
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// The lookup URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current public IP
    pub async fn current(&self) -> Result<IpAddr> {
        debug!("GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("GET {} failed: {}", self.url, e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(|e| {
            Error::transport(format!("Failed to read response from {}: {}", self.url, e))
        })?;

        let ip = parse_ip_response(&self.url, status, content_type.as_deref(), &body)?;
        debug!("Public IP from {}: {}", self.url, ip);
        Ok(ip)
    }
}

/// Validate a lookup response and extract the IP
///
/// Requires status 200 and a `text/plain` media type (parameters such as
/// `charset` are ignored). Surrounding whitespace in the body is trimmed.
pub fn parse_ip_response(
    url: &str,
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> Result<IpAddr> {
    if status != 200 {
        return Err(Error::unexpected_status(url, status));
    }

    let content_type = content_type.unwrap_or_default();
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    if !media_type.eq_ignore_ascii_case("text/plain") {
        return Err(Error::unexpected_content_type(url, content_type));
    }

    let text = body.trim();
    text.parse().map_err(|_| {
        Error::invalid_input(format!("{} returned an invalid IP address: {:?}", url, text))
    })
}
