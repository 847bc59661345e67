use serde::{Deserialize, Serialize};

/// Unified error type for all DNS provider operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError) — network connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — API rate limit exceeded
///
/// The built-in HTTP client automatically retries these with exponential backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429 or equivalent).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The provided credentials are invalid or expired.
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A required input (domain name, record name) was empty.
    EmptyInput {
        /// Provider that produced the error.
        provider: String,
        /// Name of the empty input.
        param: String,
    },

    /// A field required to build the request was not supplied.
    MissingField {
        /// Provider that produced the error.
        provider: String,
        /// Name of the missing field.
        field: String,
    },

    /// The record type tag is not one the dispatcher accepts.
    InvalidRecordType {
        /// Provider that produced the error.
        provider: String,
        /// The rejected record type tag.
        record_type: String,
    },

    /// A request parameter was rejected by the provider (bad TTL, malformed content, ...).
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The zone already exists at the provider.
    ZoneExists {
        /// Provider that produced the error.
        provider: String,
        /// Domain name of the existing zone.
        domain: String,
    },

    /// The specified domain/zone was not found.
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Domain name that was not found.
        domain: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified record or record-set was not found.
    RecordNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Name (or id) of the record that was not found.
        record: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// The capability point is not implemented by this provider.
    ///
    /// Permanent: callers must not retry.
    NotImplemented {
        /// Provider that produced the error.
        provider: String,
        /// Name of the unsupported operation.
        operation: String,
    },

    /// An unrecognized error from the provider API, carrying the upstream message.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::EmptyInput { .. }
                | Self::MissingField { .. }
                | Self::InvalidRecordType { .. }
                | Self::InvalidParameter { .. }
                | Self::ZoneExists { .. }
                | Self::DomainNotFound { .. }
                | Self::RecordNotFound { .. }
                | Self::NotImplemented { .. }
        )
    }

    /// Whether the remote reported the zone as absent.
    ///
    /// Zone teardown treats this as success.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DomainNotFound { .. })
    }

    /// Name of the provider that produced the error.
    pub fn provider(&self) -> &str {
        match self {
            Self::NetworkError { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::InvalidCredentials { provider, .. }
            | Self::EmptyInput { provider, .. }
            | Self::MissingField { provider, .. }
            | Self::InvalidRecordType { provider, .. }
            | Self::InvalidParameter { provider, .. }
            | Self::ZoneExists { provider, .. }
            | Self::DomainNotFound { provider, .. }
            | Self::RecordNotFound { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::SerializationError { provider, .. }
            | Self::NotImplemented { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::EmptyInput { provider, param } => {
                write!(f, "[{provider}] {param} cannot be empty")
            }
            Self::MissingField { provider, field } => {
                write!(f, "[{provider}] Missing data for RRset: {field}")
            }
            Self::InvalidRecordType {
                provider,
                record_type,
            } => {
                write!(f, "[{provider}] Invalid record type: {record_type}")
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::ZoneExists { provider, domain } => {
                write!(f, "[{provider}] Zone already exists for domain: {domain}")
            }
            Self::DomainNotFound {
                provider,
                domain,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Domain '{domain}' not found: {msg}")
                } else {
                    write!(f, "[{provider}] Domain '{domain}' not found")
                }
            }
            Self::RecordNotFound {
                provider, record, ..
            } => {
                write!(f, "[{provider}] Record '{record}' not found")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::NotImplemented {
                provider,
                operation,
            } => {
                write!(f, "[{provider}] {operation} is not implemented")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
