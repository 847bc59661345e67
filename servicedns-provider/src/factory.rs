//! Provider factory functions and metadata.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{
    BindProvider, DesecProvider, DnsimpleProvider, HetznerProvider, PowerDnsProvider,
    VultrProvider,
};
use crate::traits::DnsProvider;
use crate::types::{ProviderConfig, ProviderCredentials, ProviderMetadata};

/// Creates a [`DnsProvider`] instance from a provider configuration.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant;
/// timeout, retry and MX handling come from [`ProviderConfig::options`].
/// The returned provider is wrapped in `Arc<dyn DnsProvider>` for easy sharing
/// across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use servicedns_provider::{create_provider, ProviderConfig, ProviderCredentials};
///
/// let provider = create_provider(ProviderConfig {
///     credentials: ProviderCredentials::PowerDns {
///         api_key: "secret".to_string(),
///         api_host: "127.0.0.1:8081".to_string(),
///         nameservers: vec!["ns1.example.net".to_string()],
///     },
///     options: Default::default(),
/// }).unwrap();
/// ```
pub fn create_provider(config: ProviderConfig) -> Result<Arc<dyn DnsProvider>> {
    let mx_priority = config.mx_priority();
    let options = config.options;

    let provider: Arc<dyn DnsProvider> = match config.credentials {
        ProviderCredentials::PowerDns {
            api_key,
            api_host,
            nameservers,
        } => Arc::new(
            PowerDnsProvider::builder(api_key)
                .api_host(api_host)
                .nameservers(nameservers)
                .timeout_secs(options.timeout_secs)
                .max_retries(options.max_retries)
                .mx_priority(mx_priority)
                .build()?,
        ),
        ProviderCredentials::Bind {
            zone_dir,
            rndc,
            nameservers,
        } => Arc::new(
            BindProvider::builder(zone_dir)
                .rndc(rndc)
                .nameservers(nameservers)
                .mx_priority(mx_priority)
                .build()?,
        ),
        ProviderCredentials::Desec { api_token } => Arc::new(
            DesecProvider::builder(api_token)
                .timeout_secs(options.timeout_secs)
                .max_retries(options.max_retries)
                .mx_priority(mx_priority)
                .build()?,
        ),
        ProviderCredentials::Dnsimple {
            api_token,
            account_id,
        } => Arc::new(
            DnsimpleProvider::builder(api_token, account_id)
                .timeout_secs(options.timeout_secs)
                .max_retries(options.max_retries)
                .mx_priority(mx_priority)
                .build()?,
        ),
        ProviderCredentials::Hetzner { api_token } => Arc::new(
            HetznerProvider::builder(api_token)
                .timeout_secs(options.timeout_secs)
                .max_retries(options.max_retries)
                .mx_priority(mx_priority)
                .build()?,
        ),
        ProviderCredentials::Vultr { api_key } => Arc::new(
            VultrProvider::builder(api_key)
                .timeout_secs(options.timeout_secs)
                .max_retries(options.max_retries)
                .mx_priority(mx_priority)
                .build()?,
        ),
    };

    log::debug!(
        "[{}] Provider created (mx priority {:?})",
        provider.provider_type().id(),
        provider.mx_priority_style()
    );
    Ok(provider)
}

/// Returns metadata for every supported provider.
///
/// Useful for building dynamic UIs that enumerate available providers
/// and their required credential fields.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![
        PowerDnsProvider::metadata(),
        BindProvider::metadata(),
        DesecProvider::metadata(),
        DnsimpleProvider::metadata(),
        HetznerProvider::metadata(),
        VultrProvider::metadata(),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::types::{MxPriorityStyle, ProviderOptions, ProviderType};

    #[test]
    fn metadata_covers_every_provider() {
        let ids: Vec<ProviderType> = get_all_provider_metadata().iter().map(|m| m.id).collect();
        for provider in ProviderType::ALL {
            assert!(ids.contains(&provider), "missing metadata for {provider:?}");
        }
    }

    #[test]
    fn creates_provider_of_matching_type() {
        let provider = create_provider(ProviderConfig {
            credentials: ProviderCredentials::Hetzner {
                api_token: "token".to_string(),
            },
            options: ProviderOptions::default(),
        })
        .unwrap();
        assert_eq!(provider.provider_type(), ProviderType::Hetzner);
        assert_eq!(provider.mx_priority_style(), MxPriorityStyle::Embedded);
    }

    #[test]
    fn mx_override_reaches_provider() {
        let map: HashMap<String, String> = [
            ("apikey", "key"),
            ("powerdnsapi", "10.0.0.1:8081"),
            ("ns1", "ns1.example.net"),
            ("mx_priority", "separate"),
        ]
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

        let config = ProviderConfig::from_map(ProviderType::PowerDns, &map).unwrap();
        let provider = create_provider(config).unwrap();
        assert_eq!(provider.provider_type(), ProviderType::PowerDns);
        assert_eq!(provider.mx_priority_style(), MxPriorityStyle::Separate);
    }
}
