//! Configuration types for the DDNS system
//!
//! Configuration comes from environment variables. Loading goes through a
//! lookup function so tests can supply their own environment.

use crate::error::{Error, Result};
use crate::record::RecordKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Comma-separated record names
pub const ENV_RECORDS: &str = "DDNS_RECORDS";
/// Cloudflare auth: API token or `email:key`
pub const ENV_CLOUDFLARE_AUTH: &str = "DDNS_CLOUDFLARE_AUTH";
/// Cloudflare API base URL
pub const ENV_CLOUDFLARE_API: &str = "DDNS_CLOUDFLARE_API";
/// Record TTL
pub const ENV_TTL: &str = "DDNS_TTL";
/// Explicit record type
pub const ENV_RECORD_TYPE: &str = "DDNS_RECORD_TYPE";
/// Explicit record content
pub const ENV_CONTENT: &str = "DDNS_CONTENT";
/// Public IP lookup URL
pub const ENV_IP_PROVIDER: &str = "DDNS_IP_PROVIDER";
/// Log level
pub const ENV_LOG_LEVEL: &str = "DDNS_LOG_LEVEL";

/// Default Cloudflare API v4 base URL
pub const DEFAULT_CLOUDFLARE_API: &str = "https://api.cloudflare.com/client/v4";
/// Default public IP lookup service
pub const DEFAULT_IP_PROVIDER: &str = "https://icanhazip.com";

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS providers, in dispatch order
    pub providers: Vec<ProviderConfig>,

    /// DNS record names to update, in order
    pub records: Vec<String>,

    /// Record type; inferred from the content when `None`
    #[serde(default)]
    pub record_kind: Option<RecordKind>,

    /// Record content; looked up from `ip_provider` when `None`
    #[serde(default)]
    pub content: Option<String>,

    /// TTL to apply (zero means automatic)
    #[serde(default)]
    pub ttl: Duration,

    /// Public IP lookup URL
    #[serde(default = "default_ip_provider")]
    pub ip_provider: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl DdnsConfig {
    /// Load configuration from the process environment
    ///
    /// `extra_records` (e.g. positional arguments) are appended to
    /// `DDNS_RECORDS`.
    pub fn from_env(extra_records: &[String]) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), extra_records)
    }

    /// Load configuration through `lookup`
    pub fn from_lookup<F>(lookup: F, extra_records: &[String]) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut records: Vec<String> = get(ENV_RECORDS)
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        records.extend(
            extra_records
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        );

        let record_kind = get(ENV_RECORD_TYPE)
            .map(|s| s.trim().parse::<RecordKind>())
            .transpose()?;

        let ttl = match get(ENV_TTL) {
            Some(raw) => parse_ttl(&raw)?,
            None => Duration::ZERO,
        };

        let cloudflare = ProviderConfig::Cloudflare {
            auth: lookup(ENV_CLOUDFLARE_AUTH).unwrap_or_default(),
            base_url: get(ENV_CLOUDFLARE_API)
                .unwrap_or_else(|| DEFAULT_CLOUDFLARE_API.to_string()),
        };

        Ok(Self {
            providers: vec![cloudflare],
            records,
            record_kind,
            content: get(ENV_CONTENT).map(|s| s.trim().to_string()),
            ttl,
            ip_provider: get(ENV_IP_PROVIDER).unwrap_or_else(default_ip_provider),
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(default_log_level),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(Error::config(format!(
                "No records configured. Set {} or pass record names as arguments",
                ENV_RECORDS
            )));
        }

        for record in &self.records {
            validate_domain_name(record)?;
        }

        if self.providers.is_empty() {
            return Err(Error::config("No providers configured"));
        }
        for provider in &self.providers {
            provider.validate()?;
        }

        if self.content.is_none() && self.ip_provider.is_empty() {
            return Err(Error::config(format!(
                "{} cannot be empty when {} is unset",
                ENV_IP_PROVIDER, ENV_CONTENT
            )));
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config(format!(
                    "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                    ENV_LOG_LEVEL, self.log_level
                )));
            }
        }

        Ok(())
    }
}

fn default_ip_provider() -> String {
    DEFAULT_IP_PROVIDER.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Cloudflare provider
    Cloudflare {
        /// API token or `email:key`; may be empty (environment fallback)
        #[serde(default)]
        auth: String,
        /// API base URL
        #[serde(default = "default_cloudflare_api")]
        base_url: String,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

fn default_cloudflare_api() -> String {
    DEFAULT_CLOUDFLARE_API.to_string()
}

impl ProviderConfig {
    /// Validate the provider configuration
    ///
    /// An empty Cloudflare auth is accepted: the provider then reports that
    /// it owns nothing.
    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::Cloudflare { base_url, .. } => {
                if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
                    return Err(Error::config(format!(
                        "Cloudflare API URL must use HTTP or HTTPS scheme. Got: {}",
                        base_url
                    )));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(Error::config("Custom provider factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(Error::config("Custom provider config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::Cloudflare { .. } => "cloudflare",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Parse a TTL
///
/// Accepts bare seconds (`300`) or a sequence of decimal numbers with
/// units `ms`, `s`, `m`, `h` (`90s`, `1.5s`, `1h30m`).
pub fn parse_ttl(raw: &str) -> Result<Duration> {
    let s = raw.trim();
    let invalid = || Error::config(format!("Invalid TTL '{}'", raw));

    if s.is_empty() {
        return Err(invalid());
    }
    if let Ok(seconds) = s.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    let mut total = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if number_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..number_len].parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "ms" => 0.001,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];
        total += value * scale;
    }

    Duration::try_from_secs_f64(total).map_err(|_| invalid())
}

/// Validate that a string is a valid domain name
///
/// Basic RFC 1035 checks: total length, label length, characters and
/// hyphen placement. A `*` label is allowed for wildcard records.
pub fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::config("Domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if label == "*" {
            continue;
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}
