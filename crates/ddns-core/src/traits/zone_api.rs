// # Zone API Trait
//
// The four calls a provider account needs to expose for reconciliation:
// list zones, list a zone's records, create a record, update a record.
// Each call is a single network attempt; list calls return one page.

use crate::pagination::Page;
use crate::record::{Record, RecordDraft, RecordPatch};
use crate::zone::Zone;
use async_trait::async_trait;

/// Single-page, single-attempt access to a provider account
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Provider name (for logging/debugging)
    fn provider_name(&self) -> &str;

    /// Whether a credential is available
    fn is_configured(&self) -> bool;

    /// List one page of zones. Page 0 means "first page".
    async fn list_zones(&self, page: u64) -> Result<Page<Zone>, crate::Error>;

    /// List one page of records in `zone_id`. Page 0 means "first page".
    async fn list_records(&self, zone_id: &str, page: u64) -> Result<Page<Record>, crate::Error>;

    /// Create a record in `zone_id`
    async fn create_record(&self, zone_id: &str, draft: &RecordDraft) -> Result<(), crate::Error>;

    /// Update record `record_id` in `zone_id`
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        patch: &RecordPatch,
    ) -> Result<(), crate::Error>;
}
