//! Bind error mapping

use std::io;

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{BindProvider, ZoneFileError};

/// Codes produced locally by the Bind variant.
pub(crate) const CODE_ZONE_MISSING: &str = "zone_missing";
pub(crate) const CODE_ZONE_EXISTS: &str = "zone_exists";
pub(crate) const CODE_PERMISSION: &str = "permission_denied";

impl ProviderErrorMapper for BindProvider {
    fn provider_name(&self) -> &'static str {
        "bind"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some(CODE_ZONE_MISSING) => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
                raw_message: Some(raw.message),
            },
            Some(CODE_ZONE_EXISTS) => ProviderError::ZoneExists {
                provider: self.provider_name().to_string(),
                domain: context.domain_or_unknown(),
            },
            Some(CODE_PERMISSION) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },
            _ => self.unknown_error(raw),
        }
    }
}

impl BindProvider {
    /// Map a filesystem error on a zone file.
    pub(crate) fn io_error(&self, err: &io::Error, context: ErrorContext) -> ProviderError {
        let code = match err.kind() {
            io::ErrorKind::NotFound => CODE_ZONE_MISSING,
            io::ErrorKind::AlreadyExists => CODE_ZONE_EXISTS,
            io::ErrorKind::PermissionDenied => CODE_PERMISSION,
            _ => "io",
        };
        self.map_error(RawApiError::with_code(code, err.to_string()), context)
    }

    pub(crate) fn zonefile_error(&self, err: &ZoneFileError, domain: &str) -> ProviderError {
        self.parse_error(format!("{domain}: {err}"))
    }
}
