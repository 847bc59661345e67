use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============ Record Types ============

/// Provider-neutral DNS record type.
///
/// Serialized as the upper-case wire tag (`"A"`, `"AAAA"`, `"CNAME"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Sender Policy Framework record.
    Spf,
    /// Delegation signer record.
    Ds,
}

/// Returned when a record type tag is not in the dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid record type: {0}")]
pub struct InvalidRecordType(pub String);

impl RecordType {
    /// Every supported record type, in dispatch-table order.
    pub const ALL: [Self; 7] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Mx,
        Self::Txt,
        Self::Spf,
        Self::Ds,
    ];

    /// Resolve a record type tag.
    ///
    /// Tags are matched exactly; `"a"` or `"PTR"` are rejected.
    pub fn resolve(tag: &str) -> Result<Self, InvalidRecordType> {
        match tag {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "SPF" => Ok(Self::Spf),
            "DS" => Ok(Self::Ds),
            _ => Err(InvalidRecordType(tag.to_string())),
        }
    }

    /// Wire tag of this record type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Spf => "SPF",
            Self::Ds => "DS",
        }
    }

    /// Whether the record carries a priority alongside its value.
    pub fn has_priority(self) -> bool {
        matches!(self, Self::Mx)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = InvalidRecordType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}

// ============ Provider Types ============

/// Identifies which DNS provider implementation to use.
///
/// Names match the `provider` field of an order configuration exactly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProviderType {
    /// Bind zone files on local disk.
    Bind,
    /// deSEC (desec.io).
    Desec,
    /// DNSimple.
    #[serde(rename = "DNSimple")]
    Dnsimple,
    /// Hetzner DNS.
    Hetzner,
    /// PowerDNS authoritative server HTTP API.
    #[serde(rename = "PowerDNS")]
    PowerDns,
    /// Vultr DNS.
    Vultr,
}

/// Returned when a provider name does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown DNS provider: {0}")]
pub struct UnknownProvider(pub String);

impl ProviderType {
    /// Every known provider.
    pub const ALL: [Self; 6] = [
        Self::Bind,
        Self::Desec,
        Self::Dnsimple,
        Self::Hetzner,
        Self::PowerDns,
        Self::Vultr,
    ];

    /// Configuration name of the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bind => "Bind",
            Self::Desec => "Desec",
            Self::Dnsimple => "DNSimple",
            Self::Hetzner => "Hetzner",
            Self::PowerDns => "PowerDNS",
            Self::Vultr => "Vultr",
        }
    }

    /// Lower-case identifier used in logs and error messages.
    pub fn id(self) -> &'static str {
        match self {
            Self::Bind => "bind",
            Self::Desec => "desec",
            Self::Dnsimple => "dnsimple",
            Self::Hetzner => "hetzner",
            Self::PowerDns => "powerdns",
            Self::Vultr => "vultr",
        }
    }

    /// MX priority handling the provider's wire format expects.
    pub fn default_mx_priority(self) -> MxPriorityStyle {
        match self {
            Self::Bind | Self::Desec | Self::Hetzner | Self::PowerDns => MxPriorityStyle::Embedded,
            Self::Dnsimple | Self::Vultr => MxPriorityStyle::Separate,
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

// ============ MX Priority ============

/// How a provider expects the priority of MX-shaped records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MxPriorityStyle {
    /// Priority is part of the record content: `"10 mail.example.com."`.
    Embedded,
    /// Priority travels as a dedicated request field.
    Separate,
}

impl MxPriorityStyle {
    /// Fold a priority into a record value according to this style.
    ///
    /// Returns the value to send and the priority to send separately (if any).
    /// Non-MX record types pass through untouched.
    pub fn fold(
        self,
        record_type: RecordType,
        priority: Option<u16>,
        value: &str,
    ) -> (String, Option<u16>) {
        if !record_type.has_priority() {
            return (value.to_string(), None);
        }
        match self {
            Self::Embedded => (embed_priority(priority, value), None),
            Self::Separate => (value.to_string(), Some(priority.unwrap_or(0))),
        }
    }
}

impl FromStr for MxPriorityStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "embedded" => Ok(Self::Embedded),
            "separate" => Ok(Self::Separate),
            other => Err(format!("expected 'embedded' or 'separate', got '{other}'")),
        }
    }
}

/// Join a priority and a value into `"<priority> <value>"`.
pub fn embed_priority(priority: Option<u16>, value: &str) -> String {
    format!("{} {value}", priority.unwrap_or(0))
}

/// Split `"<priority> <value>"` back into its parts.
///
/// Values without a leading numeric priority are returned unchanged.
pub fn split_priority(value: &str) -> (Option<u16>, String) {
    if let Some((head, rest)) = value.split_once(' ')
        && let Ok(priority) = head.parse::<u16>()
    {
        return (Some(priority), rest.trim_start().to_string());
    }
    (None, value.to_string())
}

// ============ RRset Types ============

/// Request to create (merge into) a record-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRrsetRequest {
    /// Subname (`""` or `"@"` for the apex, or an already qualified name).
    pub host: String,
    /// Record type.
    pub record_type: RecordType,
    /// Time to live in seconds.
    pub ttl: u32,
    /// New record values; the first one is merged into the set.
    pub values: Vec<String>,
    /// Priority for providers with a dedicated priority field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Values currently stored for (zone, host, type), in first-seen order.
    #[serde(default)]
    pub existing_values: Vec<String>,
}

impl CreateRrsetRequest {
    /// First new value, or `None` if no value was supplied.
    pub fn new_value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }
}

/// Request to modify a single record of a record-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRrsetRequest {
    /// New time to live in seconds.
    pub ttl: u32,
    /// New record values; only the first one is sent.
    pub values: Vec<String>,
    /// Priority for providers with a dedicated priority field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Value the record holds now, in the provider's wire form. Record-level
    /// providers update the record carrying it; `None` takes the first record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
}

/// One entry of a bulk record-set operation.
///
/// An empty `values` list deletes the record-set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RrsetChange {
    /// Subname of the record-set.
    pub host: String,
    /// Record type.
    pub record_type: RecordType,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Full list of record values.
    pub values: Vec<String>,
}

/// A record-set as reported by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rrset {
    /// Canonical (trailing-dot) name.
    pub name: String,
    /// Subname relative to the zone (`""` for the apex).
    pub subname: String,
    /// Record type tag as reported by the provider (may be outside [`RecordType`]).
    pub record_type: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Record values.
    pub records: Vec<String>,
}

// ============ Domain Types ============

/// A zone as reported by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDomain {
    /// Domain name without trailing dot.
    pub name: String,
    /// Which provider manages this domain.
    pub provider: ProviderType,
    /// Minimum TTL enforced by the provider, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_ttl: Option<u32>,
    /// When the zone was created, if known.
    #[serde(with = "crate::utils::datetime")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

// ============ Provider Metadata Types ============

/// The input type of a credential field (affects UI rendering).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
}

/// Definition of a single configuration field required by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Configuration key (e.g., `"apikey"`).
    pub key: String,
    /// Human-readable label.
    pub label: String,
    /// Input type for UI rendering.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field must be present and non-empty.
    pub required: bool,
}

impl ProviderCredentialField {
    pub(crate) fn new(key: &str, label: &str, field_type: FieldType, required: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field_type,
            required,
        }
    }
}

/// Optional capabilities a provider implements beyond the core contract.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFeatures {
    /// Supports bulk create/modify/delete of record-sets.
    pub bulk_rrsets: bool,
    /// Supports listing and reading record-sets back.
    pub rrset_retrieval: bool,
    /// Supports exporting a zone file.
    pub zonefile_export: bool,
}

/// Static metadata describing a DNS provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type identifier.
    pub id: ProviderType,
    /// Human-readable provider name.
    pub name: String,
    /// Short description of the provider.
    pub description: String,
    /// Configuration fields read from the order configuration.
    pub required_fields: Vec<ProviderCredentialField>,
    /// Default MX priority handling.
    pub mx_priority: MxPriorityStyle,
    /// Optional capability flags.
    pub features: ProviderFeatures,
}

// ============ Credential Types ============

/// Validation error for provider configuration.
///
/// Returned when configuration fields are missing, empty, or have an invalid format.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required field is missing entirely.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Configuration key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A field is present but empty/whitespace-only.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Configuration key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A field has an invalid format.
    InvalidFormat {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Configuration key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "{label} cannot be empty"),
            Self::InvalidFormat { label, reason, .. } => write!(f, "{label}: {reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Default PowerDNS API host when none is configured.
pub const DEFAULT_POWERDNS_API_HOST: &str = "127.0.0.1";

/// Type-safe credential container for all supported DNS providers.
///
/// Serialized as a tagged enum with `"provider"` as the tag and `"credentials"` as the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// PowerDNS HTTP API.
    #[serde(rename = "PowerDNS")]
    PowerDns {
        /// API key (`X-API-Key`).
        api_key: String,
        /// API host, `host:port` or base URL.
        api_host: String,
        /// Configured nameservers (`ns1..ns5`), possibly with empty entries.
        nameservers: Vec<String>,
    },
    /// Bind zone files.
    Bind {
        /// Directory holding `<zone>.zone` files.
        zone_dir: String,
        /// Optional `rndc` binary used to reload changed zones.
        rndc: Option<String>,
        /// Configured nameservers (`ns1..ns5`), possibly with empty entries.
        nameservers: Vec<String>,
    },
    /// deSEC.
    Desec {
        /// API token.
        api_token: String,
    },
    /// DNSimple.
    #[serde(rename = "DNSimple")]
    Dnsimple {
        /// OAuth/API token.
        api_token: String,
        /// DNSimple account identifier.
        account_id: String,
    },
    /// Hetzner DNS.
    Hetzner {
        /// API token.
        api_token: String,
    },
    /// Vultr.
    Vultr {
        /// API key.
        api_key: String,
    },
}

impl ProviderCredentials {
    /// Construct credentials from a flat key-value configuration, validating required fields.
    pub fn from_map(
        provider: ProviderType,
        map: &HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        match provider {
            ProviderType::PowerDns => Ok(Self::PowerDns {
                api_key: get_required_field(provider, map, "apikey", "API token")?,
                api_host: get_optional_field(map, "powerdnsapi")
                    .unwrap_or_else(|| DEFAULT_POWERDNS_API_HOST.to_string()),
                nameservers: nameservers_from_map(map),
            }),
            ProviderType::Bind => Ok(Self::Bind {
                zone_dir: get_required_field(provider, map, "bind_zone_dir", "Zone directory")?,
                rndc: get_optional_field(map, "bind_rndc"),
                nameservers: nameservers_from_map(map),
            }),
            ProviderType::Desec => Ok(Self::Desec {
                api_token: get_required_field(provider, map, "apikey", "API token")?,
            }),
            ProviderType::Dnsimple => Ok(Self::Dnsimple {
                api_token: get_required_field(provider, map, "apikey", "API token")?,
                account_id: get_required_field(provider, map, "dnsimple_account", "Account ID")?,
            }),
            ProviderType::Hetzner => Ok(Self::Hetzner {
                api_token: get_required_field(provider, map, "apikey", "API token")?,
            }),
            ProviderType::Vultr => Ok(Self::Vultr {
                api_key: get_required_field(provider, map, "apikey", "API key")?,
            }),
        }
    }

    /// Returns the [`ProviderType`] corresponding to this credential variant.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::PowerDns { .. } => ProviderType::PowerDns,
            Self::Bind { .. } => ProviderType::Bind,
            Self::Desec { .. } => ProviderType::Desec,
            Self::Dnsimple { .. } => ProviderType::Dnsimple,
            Self::Hetzner { .. } => ProviderType::Hetzner,
            Self::Vultr { .. } => ProviderType::Vultr,
        }
    }
}

/// Obtain a required field from the map and verify that it is not empty.
fn get_required_field(
    provider: ProviderType,
    map: &HashMap<String, String>,
    key: &str,
    label: &str,
) -> Result<String, CredentialValidationError> {
    match map.get(key) {
        None => Err(CredentialValidationError::MissingField {
            provider,
            field: key.to_string(),
            label: label.to_string(),
        }),
        Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
            provider,
            field: key.to_string(),
            label: label.to_string(),
        }),
        Some(v) => Ok(v.trim().to_string()),
    }
}

fn get_optional_field(map: &HashMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Collect `ns1..ns5` in order, keeping empty slots as empty strings.
fn nameservers_from_map(map: &HashMap<String, String>) -> Vec<String> {
    (1..=5)
        .map(|i| map.get(&format!("ns{i}")).cloned().unwrap_or_default())
        .collect()
}

// ============ Provider Options ============

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default number of retries for transient failures.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Per-call behaviour shared by every provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for transient failures (network, timeout, rate limit).
    pub max_retries: u32,
    /// Override of the provider's default MX priority handling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mx_priority: Option<MxPriorityStyle>,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            mx_priority: None,
        }
    }
}

impl ProviderOptions {
    /// Read `timeout`, `max_retries` and `mx_priority` from a flat configuration.
    pub fn from_map(
        provider: ProviderType,
        map: &HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        let mut options = Self::default();

        if let Some(raw) = get_optional_field(map, "timeout") {
            options.timeout_secs = match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(invalid_format(
                        provider,
                        "timeout",
                        "Timeout",
                        "must be a positive number of seconds",
                    ));
                }
            };
        }

        if let Some(raw) = get_optional_field(map, "max_retries") {
            options.max_retries = raw.parse::<u32>().map_err(|_| {
                invalid_format(
                    provider,
                    "max_retries",
                    "Max retries",
                    "must be a non-negative integer",
                )
            })?;
        }

        if let Some(raw) = get_optional_field(map, "mx_priority") {
            options.mx_priority = Some(raw.parse::<MxPriorityStyle>().map_err(|reason| {
                invalid_format(provider, "mx_priority", "MX priority", &reason)
            })?);
        }

        Ok(options)
    }
}

fn invalid_format(
    provider: ProviderType,
    field: &str,
    label: &str,
    reason: &str,
) -> CredentialValidationError {
    CredentialValidationError::InvalidFormat {
        provider,
        field: field.to_string(),
        label: label.to_string(),
        reason: reason.to_string(),
    }
}

/// Everything needed to construct one provider instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Provider credentials and endpoint.
    #[serde(flatten)]
    pub credentials: ProviderCredentials,
    /// Timeout, retry and MX handling.
    #[serde(default)]
    pub options: ProviderOptions,
}

impl ProviderConfig {
    /// Build a provider configuration from a flat key-value map.
    pub fn from_map(
        provider: ProviderType,
        map: &HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            credentials: ProviderCredentials::from_map(provider, map)?,
            options: ProviderOptions::from_map(provider, map)?,
        })
    }

    /// Provider this configuration targets.
    pub fn provider_type(&self) -> ProviderType {
        self.credentials.provider_type()
    }

    /// MX priority handling in effect: the override if set, else the provider default.
    pub fn mx_priority(&self) -> MxPriorityStyle {
        self.options
            .mx_priority
            .unwrap_or_else(|| self.provider_type().default_mx_priority())
    }
}
