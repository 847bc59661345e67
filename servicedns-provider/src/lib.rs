//! # servicedns-provider
//!
//! DNS hosting provider abstraction for a hosting-automation module: zones and
//! record sets are pushed to an authoritative backend while the caller keeps
//! its own record inventory.
//!
//! ## Supported Providers
//!
//! | Provider | Config name | Auth Method | MX priority |
//! |----------|-------------|-------------|-------------|
//! | [PowerDNS](https://doc.powerdns.com/authoritative/http-api/) | `PowerDNS` | `X-API-Key` | embedded |
//! | [BIND](https://www.isc.org/bind/) zone files | `Bind` | filesystem + `rndc` | embedded |
//! | [deSEC](https://desec.io/) | `Desec` | `Token` | embedded |
//! | [DNSimple](https://dnsimple.com/) | `DNSimple` | Bearer Token | separate |
//! | [Hetzner DNS](https://dns.hetzner.com/) | `Hetzner` | `Auth-API-Token` | embedded |
//! | [Vultr](https://www.vultr.com/) | `Vultr` | Bearer Token | separate |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for static builds.
//!
//! ## Record sets
//!
//! Backends are addressed per *record set* (one host, one type, many values).
//! Creating a record therefore means sending the whole set: the caller passes
//! the values it already tracks in [`CreateRrsetRequest::existing_values`] and
//! the provider merges the new value in with [`merge_values`].
//!
//! ```rust,no_run
//! use servicedns_provider::{
//!     create_provider, CreateRrsetRequest, ProviderConfig, ProviderCredentials, RecordType,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ProviderConfig {
//!         credentials: ProviderCredentials::PowerDns {
//!             api_key: "secret".to_string(),
//!             api_host: "127.0.0.1".to_string(),
//!             nameservers: vec!["ns1.example.net".to_string()],
//!         },
//!         options: Default::default(),
//!     })?;
//!
//!     provider.create_zone("example.com").await?;
//!
//!     let request = CreateRrsetRequest {
//!         host: "www".to_string(),
//!         record_type: RecordType::A,
//!         ttl: 3600,
//!         values: vec!["192.0.2.2".to_string()],
//!         priority: None,
//!         existing_values: vec!["192.0.2.1".to_string()],
//!     };
//!     provider.create_rrset("example.com", &request).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//!
//! - [`ProviderError::InvalidCredentials`] — authentication failed
//! - [`ProviderError::ZoneExists`] — the backend already hosts the zone
//! - [`ProviderError::DomainNotFound`] / [`ProviderError::RecordNotFound`] — see
//!   [`ProviderError::is_not_found`]
//! - [`ProviderError::NotImplemented`] — optional capability the backend lacks
//!
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff up to [`ProviderOptions::max_retries`] times.

mod error;
mod factory;
mod http_client;
mod providers;
pub mod reconcile;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{create_provider, get_all_provider_metadata};

// Re-export core trait only (internal traits are not exported)
pub use traits::DnsProvider;

// Re-export reconciliation helpers
pub use reconcile::{canonicalize, merge_values, normalize_nameservers};

// Re-export types
pub use types::{
    CreateRrsetRequest, CredentialValidationError, DEFAULT_MAX_RETRIES,
    DEFAULT_POWERDNS_API_HOST, DEFAULT_TIMEOUT_SECS, FieldType, InvalidRecordType,
    ModifyRrsetRequest, MxPriorityStyle, ProviderConfig, ProviderCredentialField,
    ProviderCredentials, ProviderDomain, ProviderFeatures, ProviderMetadata, ProviderOptions,
    ProviderType, RecordType, Rrset, RrsetChange, UnknownProvider, embed_priority,
    split_priority,
};

// Re-export utils module
pub use utils::datetime;

// Re-export concrete providers
pub use providers::{
    BindProvider, BindProviderBuilder, DesecProvider, DesecProviderBuilder, DnsimpleProvider,
    DnsimpleProviderBuilder, HetznerProvider, HetznerProviderBuilder, PowerDnsProvider,
    PowerDnsProviderBuilder, VultrProvider, VultrProviderBuilder,
};
