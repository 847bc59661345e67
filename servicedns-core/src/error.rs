//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use crate::types::{ZoneEvent, ZoneStatus};

// Re-export library error types
pub use servicedns_provider::{CredentialValidationError, InvalidRecordType, ProviderError, UnknownProvider};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// A required input is empty
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Record type tag outside the supported set
    #[error("Invalid record type: {0}")]
    InvalidRecordType(String),

    /// A required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),

    /// `provider` in the order configuration names no known variant
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Zone already exists locally or at the provider
    #[error("Zone already exists: {0}")]
    ZoneExists(String),

    /// No zone matches (or the caller does not own it)
    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    /// Record not found
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// CNAME exclusivity violated at a host
    #[error("CNAME conflict at {host}: {record_type} cannot coexist with {existing}")]
    CnameConflict {
        host: String,
        record_type: String,
        existing: String,
    },

    /// Exact (zone, host, type, value) repeat
    #[error("Duplicate record: {host} {record_type} {value}")]
    DuplicateRecord {
        host: String,
        record_type: String,
        value: String,
    },

    /// Capability the selected provider does not offer
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Lifecycle event not allowed in the zone's current status
    #[error("Cannot {event} a zone that is {from}")]
    InvalidTransition { from: ZoneStatus, event: ZoneEvent },

    /// Credential validation errors (structured, supports field level errors)
    #[error("{0}")]
    CredentialValidation(CredentialValidationError),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::EmptyInput(_)
            | Self::InvalidRecordType(_)
            | Self::MissingField(_)
            | Self::UnknownProvider(_)
            | Self::ZoneExists(_)
            | Self::DomainNotFound(_)
            | Self::RecordNotFound(_)
            | Self::CnameConflict { .. }
            | Self::DuplicateRecord { .. }
            | Self::NotImplemented(_)
            | Self::InvalidTransition { .. }
            | Self::CredentialValidation(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::SerializationError(_) | Self::StorageError(_) => false,
        }
    }
}

/// Provider errors with a core counterpart are lifted; the rest stay wrapped.
impl From<ProviderError> for CoreError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::EmptyInput { param, .. } => Self::EmptyInput(param),
            ProviderError::MissingField { field, .. } => Self::MissingField(field),
            ProviderError::InvalidRecordType { record_type, .. } => {
                Self::InvalidRecordType(record_type)
            }
            ProviderError::ZoneExists { domain, .. } => Self::ZoneExists(domain),
            ProviderError::DomainNotFound { domain, .. } => Self::DomainNotFound(domain),
            ProviderError::NotImplemented {
                provider,
                operation,
            } => Self::NotImplemented(format!("{operation} ({provider})")),
            other => Self::Provider(other),
        }
    }
}

impl From<InvalidRecordType> for CoreError {
    fn from(err: InvalidRecordType) -> Self {
        Self::InvalidRecordType(err.0)
    }
}

impl From<UnknownProvider> for CoreError {
    fn from(err: UnknownProvider) -> Self {
        Self::UnknownProvider(err.0)
    }
}

impl From<CredentialValidationError> for CoreError {
    fn from(err: CredentialValidationError) -> Self {
        Self::CredentialValidation(err)
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
