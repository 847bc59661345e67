//! Vultr error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::VultrProvider;

/// Vultr errors are `{"error": "...", "status": n}`; the status code is the raw code.
impl ProviderErrorMapper for VultrProvider {
    fn provider_name(&self) -> &'static str {
        "vultr"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let lower = raw.message.to_ascii_lowercase();
        match raw.code.as_deref() {
            Some("401" | "403") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("400" | "409") if lower.contains("already") || lower.contains("exists") => {
                ProviderError::ZoneExists {
                    provider: self.provider_name().to_string(),
                    domain: context.domain_or_unknown(),
                }
            }
            Some("404") if context.record_name.is_some() => ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record: context.record_or_unknown(),
                raw_message: Some(raw.message),
            },
            Some("404") => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
                raw_message: Some(raw.message),
            },
            Some("400" | "422") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context.record_name.unwrap_or_else(|| "record".to_string()),
                detail: raw.message,
            },
            _ => self.unknown_error(raw),
        }
    }
}
