//! Test doubles and common utilities for contract tests
//!
//! The doubles share their call logs through `Arc`s so a test can keep a
//! handle after the provider has been moved into a `Dispatcher`.

#![allow(dead_code)]

use async_trait::async_trait;
use ddns_core::error::{Error, Result};
use ddns_core::pagination::{Page, PageInfo};
use ddns_core::record::{Record, RecordDraft, RecordKind, RecordPatch};
use ddns_core::traits::{DnsProvider, ReconcileOutcome, ZoneApi};
use ddns_core::zone::Zone;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Ordered, shareable log of calls made against the doubles
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_matching(&self, prefix: &str) -> usize {
        self.entries()
            .iter()
            .filter(|e| e.starts_with(prefix))
            .count()
    }
}

/// A scripted DnsProvider
///
/// Owns every name ending in one of its suffixes. Ownership checks and
/// reconciles can be made to fail.
pub struct MockDnsProvider {
    name: String,
    suffixes: Vec<String>,
    fail_ownership: bool,
    fail_reconcile: bool,
    log: CallLog,
}

impl MockDnsProvider {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            suffixes: Vec::new(),
            fail_ownership: false,
            fail_reconcile: false,
            log: log.clone(),
        }
    }

    pub fn owning(mut self, suffix: &str) -> Self {
        self.suffixes.push(suffix.to_string());
        self
    }

    pub fn failing_ownership(mut self) -> Self {
        self.fail_ownership = true;
        self
    }

    pub fn failing_reconcile(mut self) -> Self {
        self.fail_reconcile = true;
        self
    }

    pub fn boxed(self) -> Box<dyn DnsProvider> {
        Box::new(self)
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    async fn owns_record(&mut self, name: &str) -> Result<bool> {
        self.log.push(format!("{}.owns {}", self.name, name));
        if self.fail_ownership {
            return Err(Error::transport(format!("{} is unreachable", self.name)));
        }
        Ok(self.suffixes.iter().any(|s| name.ends_with(s.as_str())))
    }

    async fn reconcile(
        &mut self,
        name: &str,
        kind: RecordKind,
        content: &str,
        ttl: Duration,
    ) -> Result<ReconcileOutcome> {
        self.log
            .push(format!("{}.reconcile {} {} {}", self.name, name, kind, content));
        if self.fail_reconcile {
            return Err(Error::provider(
                format!("https://{}.invalid/zones", self.name),
                Vec::new(),
            ));
        }
        Ok(ReconcileOutcome::Created {
            zone_id: format!("{}-zone", self.name),
            content: content.to_string(),
            ttl: ddns_core::normalize_ttl(ttl),
        })
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}

/// Zones `a.com`, `example.com` on page 1 and `other.org` on page 2
///
/// Page requests `0` and `1` are answered with page 1, `2` with page 2.
pub fn two_page_zones() -> Vec<Vec<Zone>> {
    vec![
        vec![Zone::new("z-a", "a.com"), Zone::new("z-ex", "example.com")],
        vec![Zone::new("z-other", "other.org")],
    ]
}

/// In-memory, paginated provider account
///
/// Records are served 100 per page unless [`PagedZoneApi::with_record_page_size`]
/// says otherwise; creates and updates are applied so later listings see them.
pub struct PagedZoneApi {
    configured: bool,
    zone_pages: Vec<Vec<Zone>>,
    record_page_size: usize,
    records: Arc<Mutex<Vec<Record>>>,
    log: CallLog,
}

impl PagedZoneApi {
    pub fn new(zone_pages: Vec<Vec<Zone>>, log: &CallLog) -> Self {
        Self {
            configured: true,
            zone_pages,
            record_page_size: 100,
            records: Arc::new(Mutex::new(Vec::new())),
            log: log.clone(),
        }
    }

    pub fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Split record listings into pages of `size`
    pub fn with_record_page_size(mut self, size: usize) -> Self {
        self.record_page_size = size.max(1);
        self
    }

    pub fn with_record(self, record: Record) -> Self {
        self.records.lock().unwrap().push(record);
        self
    }

    /// Shared handle to the account's records
    pub fn records_handle(&self) -> Arc<Mutex<Vec<Record>>> {
        Arc::clone(&self.records)
    }

    fn total_zones(&self) -> u64 {
        self.zone_pages.iter().map(|p| p.len() as u64).sum()
    }
}

#[async_trait]
impl ZoneApi for PagedZoneApi {
    fn provider_name(&self) -> &str {
        "paged"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn list_zones(&self, page: u64) -> Result<Page<Zone>> {
        self.log.push(format!("list_zones {}", page));
        let number = page.max(1);
        let items = self
            .zone_pages
            .get((number - 1) as usize)
            .cloned()
            .unwrap_or_default();
        let per_page = self.zone_pages.first().map_or(0, |p| p.len() as u64);
        let info = PageInfo {
            page: number,
            per_page,
            count: items.len() as u64,
            total_count: self.total_zones(),
        };
        Ok(Page::new(items, Some(info)))
    }

    async fn list_records(&self, zone_id: &str, page: u64) -> Result<Page<Record>> {
        self.log.push(format!("list_records {} {}", zone_id, page));
        let in_zone: Vec<Record> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.zone_id == zone_id)
            .cloned()
            .collect();
        let total_count = in_zone.len() as u64;

        let number = page.max(1);
        let items: Vec<Record> = in_zone
            .into_iter()
            .skip((number - 1) as usize * self.record_page_size)
            .take(self.record_page_size)
            .collect();
        let info = PageInfo {
            page: number,
            per_page: self.record_page_size as u64,
            count: items.len() as u64,
            total_count,
        };
        Ok(Page::new(items, Some(info)))
    }

    async fn create_record(&self, zone_id: &str, draft: &RecordDraft) -> Result<()> {
        self.log.push(format!(
            "create {} {} {} {} ttl={}",
            zone_id, draft.name, draft.kind, draft.content, draft.ttl
        ));
        let mut records = self.records.lock().unwrap();
        let id = format!("rec-{}", records.len() + 1);
        records.push(Record {
            id,
            name: draft.name.clone(),
            kind: draft.kind,
            content: draft.content.clone(),
            ttl: Duration::from_secs(u64::from(draft.ttl)),
            proxied: draft.proxied,
            zone_id: zone_id.to_string(),
        });
        Ok(())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        patch: &RecordPatch,
    ) -> Result<()> {
        self.log.push(format!(
            "update {} {} {} ttl={}",
            zone_id, record_id, patch.content, patch.ttl
        ));
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.id == record_id) {
            record.content = patch.content.clone();
            record.ttl = Duration::from_secs(u64::from(patch.ttl));
        }
        Ok(())
    }
}

/// A record in `zone_id`
pub fn record(id: &str, name: &str, kind: RecordKind, content: &str, zone_id: &str) -> Record {
    Record {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        content: content.to_string(),
        ttl: Duration::from_secs(300),
        proxied: false,
        zone_id: zone_id.to_string(),
    }
}

/// Box any provider for a `Dispatcher`
pub fn boxed<P: DnsProvider + 'static>(provider: P) -> Box<dyn DnsProvider> {
    Box::new(provider)
}
