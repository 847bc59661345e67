//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod bind;
mod desec;
mod dnsimple;
mod hetzner;
mod powerdns;
mod vultr;

pub use bind::{BindProvider, BindProviderBuilder};
pub use desec::{DesecProvider, DesecProviderBuilder};
pub use dnsimple::{DnsimpleProvider, DnsimpleProviderBuilder};
pub use hetzner::{HetznerProvider, HetznerProviderBuilder};
pub use powerdns::{PowerDnsProvider, PowerDnsProviderBuilder};
pub use vultr::{VultrProvider, VultrProviderBuilder};
