//! Plugin-based provider registry
//!
//! The registry maps provider type names to factories so providers can be
//! built from configuration without hardcoded if-else chains. It is a plain
//! value: build one, register factories, create the ordered provider list
//! and hand it to a [`Dispatcher`](crate::Dispatcher).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddns_core::{Dispatcher, ProviderRegistry};
//!
//! let mut registry = ProviderRegistry::new();
//! ddns_provider_cloudflare::register(&mut registry);
//!
//! let providers = registry.create_providers(&config.providers)?;
//! let mut dispatcher = Dispatcher::new(providers);
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, DnsProviderFactory};
use std::collections::HashMap;

/// Provider registry for plugin-based DNS provider creation
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered DNS provider factories
    providers: HashMap<String, Box<dyn DnsProviderFactory>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "cloudflare")
    /// - `factory`: Factory object for creating provider instances
    ///
    /// Registering the same name twice replaces the earlier factory.
    pub fn register_provider(
        &mut self,
        name: impl Into<String>,
        factory: Box<dyn DnsProviderFactory>,
    ) {
        self.providers.insert(name.into(), factory);
    }

    /// Create a DNS provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsProvider>)`: Created provider instance
    /// - `Err(Error)`: If provider type is not registered or creation fails
    pub fn create_provider(&self, config: &ProviderConfig) -> Result<Box<dyn DnsProvider>> {
        let provider_type = config.type_name();

        let factory = self
            .providers
            .get(provider_type)
            .ok_or_else(|| Error::config(format!("Unknown provider type: {}", provider_type)))?;

        factory.create(config)
    }

    /// Create one provider per configuration entry, preserving order
    pub fn create_providers(
        &self,
        configs: &[ProviderConfig],
    ) -> Result<Vec<Box<dyn DnsProvider>>> {
        configs.iter().map(|c| self.create_provider(c)).collect()
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }
}
