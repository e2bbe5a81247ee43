//! Cloudflare API v4 wire types

use ddns_core::{ApiMessage, PageInfo, Record, RecordKind};
use serde::Deserialize;
use std::time::Duration;

/// The envelope wrapped around every Cloudflare response
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    pub result: Option<T>,
    pub result_info: Option<PageInfo>,
}

/// A DNS record as listed by `GET /zones/:id/dns_records`
#[derive(Debug, Deserialize)]
pub struct WireRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub ttl: u64,
    #[serde(default)]
    pub proxied: bool,
}

impl WireRecord {
    /// Convert to a core record; `None` for types this system never writes
    pub fn into_record(self, zone_id: &str) -> Option<Record> {
        let kind: RecordKind = self.record_type.parse().ok()?;
        Some(Record {
            id: self.id,
            name: self.name,
            kind,
            content: self.content,
            ttl: Duration::from_secs(self.ttl),
            proxied: self.proxied,
            zone_id: zone_id.to_string(),
        })
    }
}
