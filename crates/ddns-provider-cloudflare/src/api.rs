//! Cloudflare API v4 client
//!
//! One method per endpoint, one request per call. Every response must be
//! `200 OK` with a JSON content type and a successful envelope.

use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
use crate::wire::{Envelope, WireRecord};
use async_trait::async_trait;
use ddns_core::config::{DEFAULT_CLOUDFLARE_API, ENV_CLOUDFLARE_AUTH};
use ddns_core::traits::ZoneApi;
use ddns_core::{
    resolve_credential, Credential, Error, Page, Record, RecordDraft, RecordPatch, Result, Zone,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// Provider name used in logs and the registry
pub const PROVIDER_NAME: &str = "cloudflare";

type EnvFallback = Box<dyn Fn() -> Option<String> + Send + Sync>;

/// Cloudflare account access
///
/// The credential is resolved from the configured auth string (or the
/// `DDNS_CLOUDFLARE_AUTH` fallback) the first time it is needed and then kept
/// for the life of the client. An empty result is not kept, so a later call
/// tries again.
pub struct CloudflareApi {
    base_url: String,
    /// Raw auth string
    /// ⚠️ NEVER log this value
    auth: String,
    credential: OnceLock<Credential>,
    env_fallback: EnvFallback,
    transport: Box<dyn HttpTransport>,
}

// Custom Debug implementation that hides the credential
impl fmt::Debug for CloudflareApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareApi")
            .field("base_url", &self.base_url)
            .field("auth", &"<REDACTED>")
            .field("credential", &self.credential.get())
            .finish()
    }
}

impl CloudflareApi {
    /// Create a client that talks to `base_url` over HTTPS
    ///
    /// An empty `base_url` selects the public Cloudflare API.
    pub fn new(auth: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_transport(
            auth,
            base_url,
            Box::new(ReqwestTransport::new()?),
        ))
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(
        auth: impl Into<String>,
        base_url: impl Into<String>,
        transport: Box<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url.into();
        let base_url = if base_url.is_empty() {
            DEFAULT_CLOUDFLARE_API.to_string()
        } else {
            base_url.trim_end_matches('/').to_string()
        };

        Self {
            base_url,
            auth: auth.into(),
            credential: OnceLock::new(),
            env_fallback: Box::new(|| std::env::var(ENV_CLOUDFLARE_AUTH).ok()),
            transport,
        }
    }

    /// Replace the environment lookup used when the auth string is empty
    pub fn with_env_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.env_fallback = Box::new(fallback);
        self
    }

    /// API base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The resolved credential, if any
    pub fn credential(&self) -> Option<&Credential> {
        if let Some(credential) = self.credential.get() {
            return Some(credential);
        }
        let resolved = resolve_credential(&self.auth, || (self.env_fallback)())?;
        Some(self.credential.get_or_init(|| resolved))
    }

    fn url(&self, resource: &str, page: u64) -> String {
        if page == 0 {
            format!("{}/{}", self.base_url, resource)
        } else {
            format!("{}/{}?page={}", self.base_url, resource, page)
        }
    }

    fn request(&self, method: Method, url: String, body: Option<String>) -> Result<ApiRequest> {
        let credential = self
            .credential()
            .ok_or_else(|| Error::unconfigured(PROVIDER_NAME))?;

        let mut headers = Vec::with_capacity(3);
        match credential {
            Credential::Token(token) => {
                headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
            }
            Credential::BasicAuth { username, password } => {
                headers.push(("X-Auth-Email".to_string(), username.clone()));
                headers.push(("X-Auth-Key".to_string(), password.clone()));
            }
        }
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        } else {
            headers.push(("Accept".to_string(), "application/json".to_string()));
        }

        Ok(ApiRequest {
            method,
            url,
            headers,
            body,
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<Envelope<T>> {
        let request = self.request(method, url.clone(), body)?;
        debug!("{} {}", method, url);
        let response = self.transport.send(request).await?;
        decode(&url, response)
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, page: u64) -> Result<Envelope<T>> {
        self.call(Method::Get, self.url(resource, page), None).await
    }

    async fn send_json<B: Serialize + Sync>(
        &self,
        method: Method,
        resource: &str,
        body: &B,
    ) -> Result<()> {
        let body = serde_json::to_string(body)?;
        self.call::<serde_json::Value>(method, self.url(resource, 0), Some(body))
            .await?;
        Ok(())
    }
}

/// Check status, content type and envelope of a response
fn decode<T: DeserializeOwned>(url: &str, response: ApiResponse) -> Result<Envelope<T>> {
    if response.status != 200 {
        return Err(Error::unexpected_status(url, response.status));
    }

    let content_type = response.content_type.unwrap_or_default();
    if !is_json(&content_type) {
        return Err(Error::unexpected_content_type(url, content_type));
    }

    let envelope: Envelope<T> = serde_json::from_str(&response.body)?;
    if !envelope.success {
        return Err(Error::provider(url, envelope.errors));
    }
    Ok(envelope)
}

/// `application/json`, ignoring parameters such as `charset`
fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

#[async_trait]
impl ZoneApi for CloudflareApi {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_configured(&self) -> bool {
        self.credential().is_some()
    }

    async fn list_zones(&self, page: u64) -> Result<Page<Zone>> {
        let envelope: Envelope<Vec<Zone>> = self.get("zones", page).await?;
        Ok(Page::new(
            envelope.result.unwrap_or_default(),
            envelope.result_info,
        ))
    }

    async fn list_records(&self, zone_id: &str, page: u64) -> Result<Page<Record>> {
        let resource = format!("zones/{}/dns_records", zone_id);
        let envelope: Envelope<Vec<WireRecord>> = self.get(&resource, page).await?;

        let wire = envelope.result.unwrap_or_default();
        let listed = wire.len();
        let records: Vec<Record> = wire
            .into_iter()
            .filter_map(|r| r.into_record(zone_id))
            .collect();
        if records.len() != listed {
            debug!(
                "Skipped {} record(s) of other types in zone {}",
                listed - records.len(),
                zone_id
            );
        }

        Ok(Page::new(records, envelope.result_info))
    }

    async fn create_record(&self, zone_id: &str, draft: &RecordDraft) -> Result<()> {
        let resource = format!("zones/{}/dns_records", zone_id);
        self.send_json(Method::Post, &resource, draft).await
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        patch: &RecordPatch,
    ) -> Result<()> {
        let resource = format!("zones/{}/dns_records/{}", zone_id, record_id);
        self.send_json(Method::Patch, &resource, patch).await
    }
}
