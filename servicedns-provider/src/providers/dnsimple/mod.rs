//! DNSimple Provider (API v2)

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::types::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, MxPriorityStyle, ProviderType};

pub(crate) use types::{DnsimpleDomain, DnsimpleRecord, DnsimpleResponse};

pub(crate) const DNSIMPLE_API_BASE: &str = "https://api.dnsimple.com/v2";

/// DNSimple Provider
pub struct DnsimpleProvider {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) api_token: String,
    pub(crate) account_id: String,
    pub(crate) max_retries: u32,
    pub(crate) mx_priority: MxPriorityStyle,
}

/// DNSimple Provider Builder
pub struct DnsimpleProviderBuilder {
    api_token: String,
    account_id: String,
    api_base: String,
    timeout_secs: u64,
    max_retries: u32,
    mx_priority: MxPriorityStyle,
}

impl DnsimpleProviderBuilder {
    fn new(api_token: String, account_id: String) -> Self {
        Self {
            api_token,
            account_id,
            api_base: DNSIMPLE_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            mx_priority: ProviderType::Dnsimple.default_mx_priority(),
        }
    }

    /// Override the API base URL (e.g. the sandbox).
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
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

    pub fn build(self) -> Result<DnsimpleProvider> {
        Ok(DnsimpleProvider {
            client: create_http_client("dnsimple", self.timeout_secs)?,
            api_base: self.api_base,
            api_token: self.api_token,
            account_id: self.account_id,
            max_retries: self.max_retries,
            mx_priority: self.mx_priority,
        })
    }
}

impl DnsimpleProvider {
    pub fn builder(api_token: String, account_id: String) -> DnsimpleProviderBuilder {
        DnsimpleProviderBuilder::new(api_token, account_id)
    }
}
