//! Hetzner DNS error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::HetznerProvider;

/// Hetzner reports HTTP status + `{"error": {"message": "...", "code": n}}`.
impl ProviderErrorMapper for HetznerProvider {
    fn provider_name(&self) -> &'static str {
        "hetzner"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let lower = raw.message.to_ascii_lowercase();
        match raw.code.as_deref() {
            Some("401" | "403") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("409") => ProviderError::ZoneExists {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
            },
            Some("422") if lower.contains("taken") || lower.contains("already") => {
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
            Some("400" | "406" | "422") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context.record_name.unwrap_or_else(|| "record".to_string()),
                detail: raw.message,
            },
            _ => self.unknown_error(raw),
        }
    }
}
