//! Provider dispatch
//!
//! The [`Dispatcher`] owns an ordered list of providers and routes each name
//! to the first one that claims it.
//!
//! ## Flow
//!
//! ```text
//! update_name(request)
//!    │
//!    ├─► P1.owns_record(name) ── false ─┐
//!    │                                  ▼
//!    ├─► P2.owns_record(name) ── true ──► P2.reconcile(...) ──► result
//!    │
//!    └─► nobody owns it ──► NoOwningProvider
//! ```
//!
//! ## Failure policy
//!
//! - An error from `owns_record` stops the search immediately; later
//!   providers are never asked.
//! - The claiming provider's reconcile result is final; there is no
//!   fallback to later providers.
//! - [`Dispatcher::update_names`] stops at the first failing name.

use crate::error::{Error, Result};
use crate::record::RecordKind;
use crate::traits::{DnsProvider, ReconcileOutcome};
use std::time::Duration;
use tracing::{debug, info};

/// Desired state for one name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Fully-qualified record name
    pub name: String,
    /// Record type; inferred from `content` when `None`
    pub kind: Option<RecordKind>,
    /// Record value (an IP address, or a target name for CNAME)
    pub content: String,
    /// Time to live
    pub ttl: Duration,
}

impl UpdateRequest {
    /// Request with an inferred record type
    pub fn new(name: impl Into<String>, content: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            kind: None,
            content: content.into(),
            ttl,
        }
    }

    /// Set an explicit record type
    pub fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// The explicit type, or the one inferred from the content
    pub fn resolved_kind(&self) -> RecordKind {
        self.kind.unwrap_or_else(|| RecordKind::detect(&self.content))
    }
}

/// What happened to one name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Record name
    pub name: String,
    /// Record type used
    pub kind: RecordKind,
    /// Provider that handled the name
    pub provider: String,
    /// Create or update
    pub outcome: ReconcileOutcome,
}

/// Ordered provider list with first-owner-wins dispatch
pub struct Dispatcher {
    providers: Vec<Box<dyn DnsProvider>>,
}

impl Dispatcher {
    /// Create a dispatcher over `providers`, tried in the given order
    pub fn new(providers: Vec<Box<dyn DnsProvider>>) -> Self {
        Self { providers }
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether there are no providers
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in dispatch order
    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.provider_name().to_string())
            .collect()
    }

    /// Reconcile one name with the first provider that owns it
    ///
    /// # Errors
    ///
    /// - the first `owns_record` error, verbatim
    /// - the owning provider's reconcile error, verbatim
    /// - `NoOwningProvider` if nobody claims the name
    pub async fn update_name(&mut self, request: &UpdateRequest) -> Result<UpdateReport> {
        let kind = request.resolved_kind();

        for provider in self.providers.iter_mut() {
            if !provider.owns_record(&request.name).await? {
                debug!(
                    "Provider {} does not own {}, trying next",
                    provider.provider_name(),
                    request.name
                );
                continue;
            }

            let outcome = provider
                .reconcile(&request.name, kind, &request.content, request.ttl)
                .await?;

            info!(
                "{} {} record {} -> {} via {}",
                match outcome {
                    ReconcileOutcome::Created { .. } => "Created",
                    ReconcileOutcome::Updated { .. } => "Updated",
                },
                kind,
                request.name,
                request.content,
                provider.provider_name()
            );

            return Ok(UpdateReport {
                name: request.name.clone(),
                kind,
                provider: provider.provider_name().to_string(),
                outcome,
            });
        }

        Err(Error::NoOwningProvider(request.name.clone()))
    }

    /// Reconcile names one at a time, in order, stopping at the first failure
    ///
    /// The failing name's error is returned unlogged; reporting it is up to
    /// the caller.
    pub async fn update_names(&mut self, requests: &[UpdateRequest]) -> Result<Vec<UpdateReport>> {
        let mut reports = Vec::with_capacity(requests.len());

        for request in requests {
            match self.update_name(request).await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    debug!(
                        "Batch stopped at {} ({} of {} processed)",
                        request.name,
                        reports.len(),
                        requests.len()
                    );
                    return Err(e);
                }
            }
        }

        Ok(reports)
    }
}
