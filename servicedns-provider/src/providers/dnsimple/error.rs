//! DNSimple error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::DnsimpleProvider;

/// DNSimple reports HTTP status + `{"message": "..."}`.
/// Reference: <https://developer.dnsimple.com/v2/#errors>
impl ProviderErrorMapper for DnsimpleProvider {
    fn provider_name(&self) -> &'static str {
        "dnsimple"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("401" | "403") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            Some("400" | "409") if raw.message.to_ascii_lowercase().contains("already") => {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> DnsimpleProvider {
        match DnsimpleProvider::builder("token".to_string(), "1010".to_string()).build() {
            Ok(p) => p,
            Err(e) => panic!("build failed: {e}"),
        }
    }

    #[test]
    fn already_exists_is_zone_exists() {
        let err = provider().map_error(
            RawApiError::with_code("400", "Zone already exists in the account"),
            ErrorContext::domain("example.com"),
        );
        assert!(matches!(err, ProviderError::ZoneExists { .. }));
    }

    #[test]
    fn validation_error() {
        let err = provider().map_error(
            RawApiError::with_code("400", "Validation failed"),
            ErrorContext::record("example.com", "www"),
        );
        assert!(matches!(err, ProviderError::InvalidParameter { .. }));
    }

    #[test]
    fn missing_domain() {
        let err = provider().map_error(
            RawApiError::with_code("404", "Domain `example.com` not found"),
            ErrorContext::domain("example.com"),
        );
        assert!(err.is_not_found());
    }
}
