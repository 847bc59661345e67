//! Vultr DNS Provider (api.vultr.com v2)

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::types::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, MxPriorityStyle, ProviderType};

pub(crate) use types::{VultrDomain, VultrRecord};

pub(crate) const VULTR_API_BASE: &str = "https://api.vultr.com/v2";

/// Vultr DNS Provider
pub struct VultrProvider {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) api_key: String,
    pub(crate) max_retries: u32,
    pub(crate) mx_priority: MxPriorityStyle,
}

/// Vultr DNS Provider Builder
pub struct VultrProviderBuilder {
    api_key: String,
    api_base: String,
    timeout_secs: u64,
    max_retries: u32,
    mx_priority: MxPriorityStyle,
}

impl VultrProviderBuilder {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: VULTR_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            mx_priority: ProviderType::Vultr.default_mx_priority(),
        }
    }

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

    pub fn build(self) -> Result<VultrProvider> {
        Ok(VultrProvider {
            client: create_http_client("vultr", self.timeout_secs)?,
            api_base: self.api_base,
            api_key: self.api_key,
            max_retries: self.max_retries,
            mx_priority: self.mx_priority,
        })
    }
}

impl VultrProvider {
    pub fn builder(api_key: String) -> VultrProviderBuilder {
        VultrProviderBuilder::new(api_key)
    }
}
