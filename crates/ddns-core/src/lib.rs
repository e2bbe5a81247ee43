// # ddns-core
//
// Core library for the DDNS record reconciler.
//
// ## Architecture Overview
//
// This library keeps DNS records pointed at a desired value:
// - **Dispatcher**: routes each record name to the first provider that owns it
// - **DnsProvider**: trait for claiming names and reconciling records
// - **ZoneApi**: trait for the list/create/update calls of a provider account
// - **ZoneReconciler**: create-or-update engine over any `ZoneApi`
// - **PageCache**: paginated fetch with a per-key, complete-or-nothing cache
// - **ProviderRegistry**: plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: reconciliation logic is independent of the wire protocol
// 2. **Plugin-Based**: providers are registered by name, no hard-coded if-else
// 3. **Library-First**: the daemon is a thin layer over this crate
// 4. **Idempotency**: reconciling the same state twice updates instead of duplicating

pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod pagination;
pub mod reconciler;
pub mod record;
pub mod registry;
pub mod traits;
pub mod zone;

// Re-export core types for convenience
pub use auth::{resolve_credential, Credential};
pub use config::{DdnsConfig, ProviderConfig};
pub use dispatcher::{Dispatcher, UpdateReport, UpdateRequest};
pub use error::{ApiMessage, Error, Result};
pub use pagination::{Page, PageCache, PageInfo};
pub use reconciler::ZoneReconciler;
pub use record::{normalize_ttl, Record, RecordDraft, RecordKind, RecordPatch, AUTOMATIC_TTL};
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, DnsProviderFactory, ReconcileOutcome, ZoneApi};
pub use zone::{find_owning_zone, Zone};
