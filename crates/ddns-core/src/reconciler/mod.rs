//! Record reconciliation
//!
//! [`ZoneReconciler`] turns any [`ZoneApi`] into a [`DnsProvider`]:
//!
//! ```text
//! owns_record(name)                 reconcile(name, kind, content, ttl)
//!        │                                        │
//!        ▼                                        ▼
//!   zones (paginated, cached) ──► find_owning_zone ──► records (paginated, cached)
//!                                                          │
//!                                       ┌──────────────────┴─────────────────┐
//!                                       ▼                                    ▼
//!                              name+kind found: update              not found: create
//!                                       └──────────► evict zone's records ◄──┘
//! ```
//!
//! The zone list is cached for the reconciler's lifetime. A zone's record
//! list is cached until a create or update succeeds in that zone, so the
//! next reconcile sees the record it just wrote.

use crate::error::{Error, Result};
use crate::pagination::PageCache;
use crate::record::{normalize_ttl, Record, RecordDraft, RecordKind, RecordPatch};
use crate::traits::{DnsProvider, ReconcileOutcome, ZoneApi};
use crate::zone::{find_owning_zone, Zone};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Cache key for the account-wide zone list
const ZONES_KEY: &str = "zones";

/// Create-or-update engine over one provider account
pub struct ZoneReconciler<A> {
    api: A,
    zones: PageCache<Zone>,
    records: PageCache<Record>,
}

impl<A: ZoneApi> ZoneReconciler<A> {
    /// Wrap `api` with empty caches
    pub fn new(api: A) -> Self {
        Self {
            api,
            zones: PageCache::new(),
            records: PageCache::new(),
        }
    }

    /// The wrapped API
    pub fn api(&self) -> &A {
        &self.api
    }

    /// All zones of the account, in provider order
    pub async fn zones(&mut self) -> Result<Vec<Zone>> {
        let api = &self.api;
        self.zones
            .fetch_all(ZONES_KEY, move |page| api.list_zones(page))
            .await
    }

    /// All records of `zone_id`, in provider order
    pub async fn records(&mut self, zone_id: &str) -> Result<Vec<Record>> {
        let api = &self.api;
        self.records
            .fetch_all(zone_id, move |page| api.list_records(zone_id, page))
            .await
    }

    /// Records of `zone_id` if a complete listing is cached
    pub fn cached_records(&self, zone_id: &str) -> Option<&[Record]> {
        self.records.get(zone_id)
    }

    /// Drop the cached record listing of `zone_id`
    pub fn evict_records(&mut self, zone_id: &str) -> bool {
        self.records.evict(zone_id)
    }

    /// The first zone, in provider order, that owns `name`
    pub async fn owning_zone(&mut self, name: &str) -> Result<Option<Zone>> {
        let zones = self.zones().await?;
        Ok(find_owning_zone(name, &zones).cloned())
    }

    /// Create or update the `kind` record called `name` inside `zone`
    ///
    /// The first record matching `name` and `kind` exactly is updated; if
    /// there is none, a record is created. Either way the zone's cached
    /// record listing is evicted once the provider confirms the change.
    pub async fn reconcile_in_zone(
        &mut self,
        zone: &Zone,
        name: &str,
        kind: RecordKind,
        content: &str,
        ttl: Duration,
    ) -> Result<ReconcileOutcome> {
        let ttl = normalize_ttl(ttl);
        let records = self.records(&zone.id).await?;

        let existing = records
            .iter()
            .find(|record| record.name == name && record.kind == kind);

        let outcome = match existing {
            Some(record) => {
                info!(
                    "Updating {} record {} in zone {} ({}): {} -> {} (ttl={})",
                    kind, name, zone.name, record.id, record.content, content, ttl
                );
                let patch = RecordPatch {
                    content: content.to_string(),
                    ttl,
                    proxied: false,
                };
                self.api.update_record(&zone.id, &record.id, &patch).await?;
                ReconcileOutcome::Updated {
                    zone_id: zone.id.clone(),
                    record_id: record.id.clone(),
                    previous_content: record.content.clone(),
                    content: patch.content,
                    ttl,
                }
            }
            None => {
                info!(
                    "Creating {} record {} in zone {}: {} (ttl={})",
                    kind, name, zone.name, content, ttl
                );
                let draft = RecordDraft {
                    name: name.to_string(),
                    kind,
                    content: content.to_string(),
                    ttl,
                    proxied: false,
                };
                self.api.create_record(&zone.id, &draft).await?;
                ReconcileOutcome::Created {
                    zone_id: zone.id.clone(),
                    content: draft.content,
                    ttl,
                }
            }
        };

        self.evict_records(&zone.id);
        Ok(outcome)
    }
}

#[async_trait]
impl<A: ZoneApi> DnsProvider for ZoneReconciler<A> {
    async fn owns_record(&mut self, name: &str) -> Result<bool> {
        if !self.api.is_configured() {
            warn!(
                "Provider {} has no credential, skipping ownership check for {}",
                self.api.provider_name(),
                name
            );
            return Ok(false);
        }

        let owned = self.owning_zone(name).await?.is_some();
        debug!(
            "Provider {} {} {}",
            self.api.provider_name(),
            if owned { "owns" } else { "does not own" },
            name
        );
        Ok(owned)
    }

    async fn reconcile(
        &mut self,
        name: &str,
        kind: RecordKind,
        content: &str,
        ttl: Duration,
    ) -> Result<ReconcileOutcome> {
        if !self.api.is_configured() {
            return Err(Error::unconfigured(self.api.provider_name()));
        }

        let zone = self
            .owning_zone(name)
            .await?
            .ok_or_else(|| Error::NoOwningZone(name.to_string()))?;

        self.reconcile_in_zone(&zone, name, kind, content, ttl).await
    }

    fn provider_name(&self) -> &str {
        self.api.provider_name()
    }
}
