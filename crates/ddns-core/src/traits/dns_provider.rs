// # DNS Provider Trait
//
// Defines the interface the dispatcher uses to find the account that manages
// a name and to bring that name's record to the desired state.
//
// ## Implementations
//
// - Any `ZoneApi` wrapped in a `ZoneReconciler` (see `crate::reconciler`)
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, RecordKind};
// use std::time::Duration;
//
// let mut provider = /* DnsProvider implementation */;
//
// if provider.owns_record("home.example.com").await? {
//     provider
//         .reconcile("home.example.com", RecordKind::A, "203.0.113.7", Duration::ZERO)
//         .await?;
// }
// ```

use crate::record::RecordKind;
use async_trait::async_trait;
use std::time::Duration;

/// Result of a successful reconcile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No record of that name and type existed; one was created
    Created {
        /// Zone the record was created in
        zone_id: String,
        /// The content written
        content: String,
        /// TTL sent to the provider, in seconds
        ttl: u32,
    },
    /// An existing record was updated in place
    Updated {
        /// Zone the record lives in
        zone_id: String,
        /// Provider record ID
        record_id: String,
        /// Content before the update
        previous_content: String,
        /// The content written
        content: String,
        /// TTL sent to the provider, in seconds
        ttl: u32,
    },
}

impl ReconcileOutcome {
    /// Content written by the reconcile
    pub fn content(&self) -> &str {
        match self {
            ReconcileOutcome::Created { content, .. }
            | ReconcileOutcome::Updated { content, .. } => content,
        }
    }
}

/// Trait for DNS provider implementations
///
/// A provider wraps one account. It is asked, in registration order, whether
/// it owns a name; the first that does is asked to reconcile it.
///
/// # Caching
///
/// Implementations may cache zone and record listings for their own
/// lifetime. Methods take `&mut self`: a provider's caches are never shared
/// between concurrent callers.
///
/// # No Retries
///
/// Every failure is returned to the caller on the first attempt.
#[async_trait]
pub trait DnsProvider: Send {
    /// Whether one of this provider's zones is a suffix of `name`
    ///
    /// An unconfigured provider owns nothing and returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Any failure while discovering zones (transport, status, envelope).
    async fn owns_record(&mut self, name: &str) -> Result<bool, crate::Error>;

    /// Create or update the `kind` record called `name` so it holds `content`
    ///
    /// # Idempotency
    ///
    /// Calling this twice with the same arguments results in one create
    /// followed by one update, never two creates.
    ///
    /// # Errors
    ///
    /// - `Unconfigured` if no credential is available
    /// - `NoOwningZone` if none of the provider's zones owns `name`
    /// - any transport, status, content-type or envelope failure
    async fn reconcile(
        &mut self,
        name: &str,
        kind: RecordKind,
        content: &str,
        ttl: Duration,
    ) -> Result<ReconcileOutcome, crate::Error>;

    /// Provider name (for logging/debugging)
    fn provider_name(&self) -> &str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this provider
    ///
    /// # Returns
    ///
    /// A boxed DnsProvider trait object
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
