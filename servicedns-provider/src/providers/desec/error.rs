//! deSEC error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::DesecProvider;

/// deSEC answers with HTTP status + `{"detail": "..."}` or field errors.
/// Reference: <https://desec.readthedocs.io/en/latest/dns/domains.html>
impl ProviderErrorMapper for DesecProvider {
    fn provider_name(&self) -> &'static str {
        "desec"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let lower = raw.message.to_ascii_lowercase();
        match raw.code.as_deref() {
            Some("401" | "403") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 409: domain registered (by anyone); 400 "... already exists/conflicts ..."
            Some("409") => ProviderError::ZoneExists {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
            },
            Some("400") if lower.contains("already") || lower.contains("conflict") => {
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

    fn provider() -> DesecProvider {
        match DesecProvider::builder("token".to_string()).build() {
            Ok(p) => p,
            Err(e) => panic!("build failed: {e}"),
        }
    }

    #[test]
    fn conflict_400_is_zone_exists() {
        let err = provider().map_error(
            RawApiError::with_code(
                "400",
                r#"{"name":["This domain name conflicts with an existing zone."]}"#,
            ),
            ErrorContext::domain("example.com"),
        );
        assert!(matches!(err, ProviderError::ZoneExists { .. }));
    }

    #[test]
    fn plain_400_is_invalid_parameter() {
        let err = provider().map_error(
            RawApiError::with_code("400", r#"{"ttl":["Ensure this value is greater than or equal to 3600."]}"#),
            ErrorContext::record("example.com", "www"),
        );
        assert!(matches!(
            err,
            ProviderError::InvalidParameter { ref param, .. } if param == "www"
        ));
    }

    #[test]
    fn not_found_depends_on_context() {
        let p = provider();
        let zone = p.map_error(
            RawApiError::with_code("404", "Not found."),
            ErrorContext::domain("example.com"),
        );
        assert!(zone.is_not_found());

        let record = p.map_error(
            RawApiError::with_code("404", "Not found."),
            ErrorContext::record("example.com", "www/A"),
        );
        assert!(matches!(record, ProviderError::RecordNotFound { .. }));
    }

    #[test]
    fn invalid_token() {
        let err = provider().map_error(
            RawApiError::with_code("401", "Invalid token."),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
    }
}
