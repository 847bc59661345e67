//! PowerDNS error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::PowerDnsProvider;

/// PowerDNS reports failures as HTTP status + `{"error": "..."}`.
/// Reference: <https://doc.powerdns.com/authoritative/http-api/index.html#errors>
impl ProviderErrorMapper for PowerDnsProvider {
    fn provider_name(&self) -> &'static str {
        "powerdns"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("401" | "403") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 409 Conflict: zone already exists
            Some("409") => ProviderError::ZoneExists {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
            },
            _ if raw.message.trim().eq_ignore_ascii_case("conflict") => ProviderError::ZoneExists {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
            },

            Some("404") => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
                raw_message: Some(raw.message),
            },

            // 400/422: rejected rrset (bad content, bad ttl, CNAME clash ...)
            Some("400" | "422") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context
                    .record_name
                    .unwrap_or_else(|| "rrsets".to_string()),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> PowerDnsProvider {
        match PowerDnsProvider::builder("key".to_string()).build() {
            Ok(p) => p,
            Err(e) => panic!("build failed: {e}"),
        }
    }

    #[test]
    fn conflict_is_zone_exists() {
        let err = provider().map_error(
            RawApiError::with_code("409", "Conflict"),
            ErrorContext::domain("example.com"),
        );
        assert!(matches!(
            err,
            ProviderError::ZoneExists { ref domain, .. } if domain == "example.com"
        ));
    }

    #[test]
    fn conflict_message_without_409() {
        let err = provider().map_error(
            RawApiError::with_code("500", "Conflict"),
            ErrorContext::domain("example.com"),
        );
        assert!(matches!(err, ProviderError::ZoneExists { .. }));
    }

    #[test]
    fn not_found_is_domain_not_found() {
        let err = provider().map_error(
            RawApiError::with_code("404", "Not Found"),
            ErrorContext::domain("gone.example"),
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn unauthorized() {
        let err = provider().map_error(
            RawApiError::with_code("401", "Unauthorized"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
    }

    #[test]
    fn unprocessable_rrset() {
        let err = provider().map_error(
            RawApiError::with_code("422", "RRset www.example.com. IN CNAME: Conflicts with pre-existing RRset"),
            ErrorContext::record("example.com", "www.example.com."),
        );
        assert!(matches!(
            err,
            ProviderError::InvalidParameter { ref param, .. } if param == "www.example.com."
        ));
    }

    #[test]
    fn fallback_keeps_upstream_message() {
        let err = provider().map_error(
            RawApiError::with_code("500", "Backend error"),
            ErrorContext::default(),
        );
        assert!(matches!(
            err,
            ProviderError::Unknown { ref raw_message, .. } if raw_message == "Backend error"
        ));
    }
}
