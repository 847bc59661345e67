//! PowerDNS authoritative server Provider (HTTP API v1)

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::utils::log_sanitizer::mask_secret;
use crate::types::{
    DEFAULT_MAX_RETRIES, DEFAULT_POWERDNS_API_HOST, DEFAULT_TIMEOUT_SECS, MxPriorityStyle,
    ProviderType,
};

pub(crate) use types::{PdnsRecord, PdnsRrset, PdnsZone, RrsetPatch, ZoneCreateBody};

/// Port the PowerDNS webserver listens on unless configured otherwise.
pub(crate) const DEFAULT_API_PORT: u16 = 8081;
/// Server id used in API paths.
pub(crate) const DEFAULT_SERVER_ID: &str = "localhost";

/// PowerDNS Provider
pub struct PowerDnsProvider {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) api_key: String,
    pub(crate) nameservers: Vec<String>,
    pub(crate) max_retries: u32,
    pub(crate) mx_priority: MxPriorityStyle,
}

/// PowerDNS Provider Builder
pub struct PowerDnsProviderBuilder {
    api_key: String,
    api_host: String,
    nameservers: Vec<String>,
    timeout_secs: u64,
    max_retries: u32,
    mx_priority: MxPriorityStyle,
}

impl PowerDnsProviderBuilder {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_host: DEFAULT_POWERDNS_API_HOST.to_string(),
            nameservers: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            mx_priority: ProviderType::PowerDns.default_mx_priority(),
        }
    }

    /// `host`, `host:port` or a full base URL.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Raw `ns1..ns5` entries; empty ones are dropped at zone creation.
    pub fn nameservers(mut self, nameservers: Vec<String>) -> Self {
        self.nameservers = nameservers;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn mx_priority(mut self, style: MxPriorityStyle) -> Self {
        self.mx_priority = style;
        self
    }

    pub fn build(self) -> Result<PowerDnsProvider> {
        let api_base = api_base_url(&self.api_host);
        log::debug!(
            "[powerdns] API {api_base} (key {})",
            mask_secret(&self.api_key)
        );
        Ok(PowerDnsProvider {
            client: create_http_client("powerdns", self.timeout_secs)?,
            api_base,
            api_key: self.api_key,
            nameservers: self.nameservers,
            max_retries: self.max_retries,
            mx_priority: self.mx_priority,
        })
    }
}

impl PowerDnsProvider {
    pub fn builder(api_key: String) -> PowerDnsProviderBuilder {
        PowerDnsProviderBuilder::new(api_key)
    }
}

/// Expand the configured API host into the server base URL.
///
/// `127.0.0.1` becomes `http://127.0.0.1:8081/api/v1/servers/localhost`; a URL
/// that already names an `/api/` path is used verbatim.
pub(crate) fn api_base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    let host = if host.is_empty() {
        DEFAULT_POWERDNS_API_HOST
    } else {
        host
    };

    if host.contains("://") {
        if host.contains("/api/") {
            return host.to_string();
        }
        return format!("{host}/api/v1/servers/{DEFAULT_SERVER_ID}");
    }

    let has_port = host
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
    if has_port {
        format!("http://{host}/api/v1/servers/{DEFAULT_SERVER_ID}")
    } else {
        format!("http://{host}:{DEFAULT_API_PORT}/api/v1/servers/{DEFAULT_SERVER_ID}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_default_port() {
        assert_eq!(
            api_base_url("127.0.0.1"),
            "http://127.0.0.1:8081/api/v1/servers/localhost"
        );
    }

    #[test]
    fn host_with_port_kept() {
        assert_eq!(
            api_base_url("pdns.internal:9000"),
            "http://pdns.internal:9000/api/v1/servers/localhost"
        );
    }

    #[test]
    fn url_without_api_path() {
        assert_eq!(
            api_base_url("https://pdns.example.net/"),
            "https://pdns.example.net/api/v1/servers/localhost"
        );
    }

    #[test]
    fn full_api_url_verbatim() {
        assert_eq!(
            api_base_url("https://pdns.example.net/api/v1/servers/primary"),
            "https://pdns.example.net/api/v1/servers/primary"
        );
    }

    #[test]
    fn empty_host_falls_back() {
        assert_eq!(
            api_base_url(""),
            "http://127.0.0.1:8081/api/v1/servers/localhost"
        );
    }
}
