//! Core traits for the DDNS system
//!
//! - [`DnsProvider`]: claims ownership of names and reconciles records
//! - [`ZoneApi`]: the list/create/update calls a provider account exposes

pub mod dns_provider;
pub mod zone_api;

pub use dns_provider::{DnsProvider, DnsProviderFactory, ReconcileOutcome};
pub use zone_api::ZoneApi;
