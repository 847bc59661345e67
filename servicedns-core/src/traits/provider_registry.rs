//! Provider registry
//!
//! Maps a provider variant to the factory that builds it from an order
//! configuration. Lookups are by exact variant name; no fallback variant.

use std::collections::HashMap;
use std::sync::Arc;

use servicedns_provider::{DnsProvider, ProviderType, create_provider};

use crate::error::{CoreError, CoreResult};
use crate::types::OrderConfig;

/// Builds a provider from an order configuration
pub type ProviderFactory =
    Arc<dyn Fn(&OrderConfig) -> CoreResult<Arc<dyn DnsProvider>> + Send + Sync>;

/// Provider Registry
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<ProviderType, ProviderFactory>,
}

impl ProviderRegistry {
    /// Empty registry; every lookup fails with `UnknownProvider`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all six variants built through [`create_provider`].
    #[must_use]
    pub fn with_builtin_providers() -> Self {
        let mut registry = Self::new();
        for provider_type in ProviderType::ALL {
            registry.register(
                provider_type,
                Arc::new(|config: &OrderConfig| -> CoreResult<Arc<dyn DnsProvider>> {
                    Ok(create_provider(config.provider_config()?)?)
                }),
            );
        }
        registry
    }

    /// Register (or replace) the factory of a variant.
    pub fn register(&mut self, provider_type: ProviderType, factory: ProviderFactory) {
        self.factories.insert(provider_type, factory);
    }

    pub fn is_registered(&self, provider_type: ProviderType) -> bool {
        self.factories.contains_key(&provider_type)
    }

    /// Build the provider named by `config.provider`.
    pub fn create(&self, config: &OrderConfig) -> CoreResult<Arc<dyn DnsProvider>> {
        let provider_type = config.provider_type()?;
        let factory = self
            .factories
            .get(&provider_type)
            .ok_or_else(|| CoreError::UnknownProvider(config.provider.clone()))?;
        factory(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> OrderConfig {
        OrderConfig {
            provider: provider.to_string(),
            domain_name: "example.com".to_string(),
            apikey: Some("token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn builtin_registers_every_variant() {
        let registry = ProviderRegistry::with_builtin_providers();
        for provider_type in ProviderType::ALL {
            assert!(registry.is_registered(provider_type));
        }
    }

    #[test]
    fn builds_named_variant() {
        let registry = ProviderRegistry::with_builtin_providers();
        let provider = registry.create(&config("Vultr")).unwrap();
        assert_eq!(provider.provider_type(), ProviderType::Vultr);
    }

    #[test]
    fn unknown_name_fails() {
        let registry = ProviderRegistry::with_builtin_providers();
        assert!(matches!(
            registry.create(&config("Route53")),
            Err(CoreError::UnknownProvider(ref p)) if p == "Route53"
        ));
    }

    #[test]
    fn unregistered_variant_fails() {
        let registry = ProviderRegistry::new();
        assert!(matches!(
            registry.create(&config("Hetzner")),
            Err(CoreError::UnknownProvider(_))
        ));
    }
}
