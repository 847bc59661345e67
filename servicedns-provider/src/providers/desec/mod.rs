//! deSEC Provider (desec.io REST API v1)

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::types::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS, MxPriorityStyle, ProviderType};

pub(crate) use types::{DesecDomain, DesecRrset};

pub(crate) const DESEC_API_BASE: &str = "https://desec.io/api/v1";

/// deSEC Provider
pub struct DesecProvider {
    pub(crate) client: Client,
    pub(crate) api_base: String,
    pub(crate) api_token: String,
    pub(crate) max_retries: u32,
    pub(crate) mx_priority: MxPriorityStyle,
}

/// deSEC Provider Builder
pub struct DesecProviderBuilder {
    api_token: String,
    api_base: String,
    timeout_secs: u64,
    max_retries: u32,
    mx_priority: MxPriorityStyle,
}

impl DesecProviderBuilder {
    fn new(api_token: String) -> Self {
        Self {
            api_token,
            api_base: DESEC_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            mx_priority: ProviderType::Desec.default_mx_priority(),
        }
    }

    /// Override the API base URL (self-hosted deSEC stacks).
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

    pub fn build(self) -> Result<DesecProvider> {
        Ok(DesecProvider {
            client: create_http_client("desec", self.timeout_secs)?,
            api_base: self.api_base,
            api_token: self.api_token,
            max_retries: self.max_retries,
            mx_priority: self.mx_priority,
        })
    }
}

impl DesecProvider {
    pub fn builder(api_token: String) -> DesecProviderBuilder {
        DesecProviderBuilder::new(api_token)
    }
}
