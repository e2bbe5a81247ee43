//! DNS record types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// TTL value that providers read as "automatic"
pub const AUTOMATIC_TTL: u32 = 1;

/// Supported record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// IPv4 address
    #[serde(rename = "A")]
    A,
    /// IPv6 address
    #[serde(rename = "AAAA")]
    Aaaa,
    /// Canonical name
    #[serde(rename = "CNAME")]
    Cname,
}

impl RecordKind {
    /// Infer the record type from its content: IPv4 → A, IPv6 → AAAA,
    /// anything else → CNAME.
    pub fn detect(content: &str) -> Self {
        match content.parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) => RecordKind::A,
            Ok(IpAddr::V6(_)) => RecordKind::Aaaa,
            Err(_) => RecordKind::Cname,
        }
    }

    /// Wire name of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::A => "A",
            RecordKind::Aaaa => "AAAA",
            RecordKind::Cname => "CNAME",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RecordKind::A),
            "AAAA" => Ok(RecordKind::Aaaa),
            "CNAME" => Ok(RecordKind::Cname),
            _ => Err(Error::invalid_input(format!(
                "unsupported record type '{}' (expected A, AAAA or CNAME)",
                s
            ))),
        }
    }
}

/// A record as listed by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Provider record ID
    pub id: String,
    /// Fully-qualified record name
    pub name: String,
    /// Record type
    pub kind: RecordKind,
    /// Record value
    pub content: String,
    /// Time to live
    pub ttl: Duration,
    /// Whether the provider proxies traffic for this record
    pub proxied: bool,
    /// Zone the record belongs to
    pub zone_id: String,
}

/// Body of a create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDraft {
    /// Fully-qualified record name
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub kind: RecordKind,
    /// Record value
    pub content: String,
    /// TTL in seconds, already normalized
    pub ttl: u32,
    /// Always `false` for records created here
    pub proxied: bool,
}

/// Body of an update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPatch {
    /// New record value
    pub content: String,
    /// TTL in seconds, already normalized
    pub ttl: u32,
    /// Always `false` for records updated here
    pub proxied: bool,
}

/// Convert a TTL to whole seconds, rounding to the nearest second.
///
/// A result of 0 becomes [`AUTOMATIC_TTL`], so "0" and "1 second" are
/// indistinguishable on the wire.
pub fn normalize_ttl(ttl: Duration) -> u32 {
    let mut seconds = ttl.as_secs();
    if ttl.subsec_nanos() >= 500_000_000 {
        seconds = seconds.saturating_add(1);
    }
    match u32::try_from(seconds) {
        Ok(0) => AUTOMATIC_TTL,
        Ok(seconds) => seconds,
        Err(_) => u32::MAX,
    }
}
