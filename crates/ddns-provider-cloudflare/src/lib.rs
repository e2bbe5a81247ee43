// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare DNS provider for the DDNS system.
//
// ## Behaviour
//
// - Zones and records are discovered through the paginated list endpoints
//   and cached by the core reconciler
// - A name is owned if any zone of the account is a suffix of it
// - Existing records are updated with PATCH, missing ones created with POST
// - Every response must be `200 OK`, `application/json` and `success: true`
// - One HTTP attempt per call (30 second timeout), no retries
//
// ## Security Requirements
//
// - The API token / key NEVER appears in logs or `Debug` output
// - The credential comes from configuration or `DDNS_CLOUDFLARE_AUTH`
// - Without a credential the provider owns nothing
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?page=N`
// - List DNS Records: GET `/zones/:zone_id/dns_records?page=N`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`

pub mod api;
pub mod transport;
pub mod wire;

pub use api::{CloudflareApi, PROVIDER_NAME};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};

use ddns_core::config::ProviderConfig;
use ddns_core::traits::{DnsProvider, DnsProviderFactory};
use ddns_core::{Error, ProviderRegistry, Result, ZoneReconciler};

/// Cloudflare DNS provider: the core reconciler over the Cloudflare API
pub type CloudflareProvider = ZoneReconciler<CloudflareApi>;

/// Factory for creating Cloudflare providers
pub struct CloudflareFactory;

impl DnsProviderFactory for CloudflareFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        match config {
            ProviderConfig::Cloudflare { auth, base_url } => {
                let api = CloudflareApi::new(auth.clone(), base_url.clone())?;
                if api.credential().is_none() {
                    tracing::warn!(
                        "Cloudflare provider has no credential; it will not claim any record"
                    );
                }
                Ok(Box::new(CloudflareProvider::new(api)))
            }
            _ => Err(Error::config("Invalid config for Cloudflare provider")),
        }
    }
}

/// Register the Cloudflare provider with a registry
///
/// # Example
///
/// ```rust
/// use ddns_core::ProviderRegistry;
///
/// let mut registry = ProviderRegistry::new();
/// ddns_provider_cloudflare::register(&mut registry);
/// assert!(registry.has_provider("cloudflare"));
/// ```
pub fn register(registry: &mut ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(CloudflareFactory));
}
