use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    CreateRrsetRequest, ModifyRrsetRequest, MxPriorityStyle, ProviderDomain, ProviderMetadata,
    ProviderType, RecordType, Rrset, RrsetChange,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// HTTP 状态码或 Provider 错误码
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordNotFound`）
    pub record_name: Option<String>,
    /// 域名（用于 `ZoneExists` / `DomainNotFound`）
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            ..Self::default()
        }
    }

    pub fn record(domain: &str, record_name: &str) -> Self {
        Self {
            record_name: Some(record_name.to_string()),
            domain: Some(domain.to_string()),
        }
    }

    pub(crate) fn domain_or_unknown(&self) -> String {
        self.domain.clone().unwrap_or_else(|| "<unknown>".to_string())
    }

    pub(crate) fn record_or_unknown(&self) -> String {
        self.record_name
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }

    /// 快捷方法：空输入
    fn empty_input(&self, param: &str) -> ProviderError {
        ProviderError::EmptyInput {
            provider: self.provider_name().to_string(),
            param: param.to_string(),
        }
    }

    /// 快捷方法：缺少 RRset 字段
    fn missing_field(&self, field: &str) -> ProviderError {
        ProviderError::MissingField {
            provider: self.provider_name().to_string(),
            field: field.to_string(),
        }
    }
}

/// Reject an empty domain name before any remote call.
pub(crate) fn require_domain<M: ProviderErrorMapper + ?Sized>(
    mapper: &M,
    domain: &str,
) -> Result<()> {
    if domain.trim().is_empty() {
        return Err(mapper.empty_input("Domain name"));
    }
    Ok(())
}

/// First record value of a request, or `MissingField("records")`.
pub(crate) fn require_value<'a, M: ProviderErrorMapper + ?Sized>(
    mapper: &M,
    values: &'a [String],
) -> Result<&'a str> {
    values
        .first()
        .map(String::as_str)
        .ok_or_else(|| mapper.missing_field("records"))
}

/// Default body of every optional capability point.
fn not_implemented(provider: ProviderType, operation: &str) -> ProviderError {
    ProviderError::NotImplemented {
        provider: provider.id().to_string(),
        operation: operation.to_string(),
    }
}

/// DNS hosting provider capability set.
///
/// The five zone and record-set mutations are required. The read and bulk
/// capability points default to [`ProviderError::NotImplemented`]; variants
/// override the ones their API supports. Providers never persist state: every
/// call carries the data it needs, including the existing record snapshot.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Which variant this is.
    fn provider_type(&self) -> ProviderType;

    /// 获取 Provider 元数据（类型级别）
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// MX priority handling in effect for this instance.
    fn mx_priority_style(&self) -> MxPriorityStyle {
        self.provider_type().default_mx_priority()
    }

    /// Create a zone using the configured nameservers.
    async fn create_zone(&self, domain: &str) -> Result<()>;

    /// Delete a zone.
    ///
    /// An absent zone is reported as [`ProviderError::DomainNotFound`]; tolerating
    /// it is the caller's decision.
    async fn delete_zone(&self, domain: &str) -> Result<()>;

    /// Merge the new value into the existing values and replace the record-set.
    async fn create_rrset(&self, domain: &str, req: &CreateRrsetRequest) -> Result<()>;

    /// Replace a single record at (host, type) with the new value; no merge.
    async fn modify_rrset(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
        req: &ModifyRrsetRequest,
    ) -> Result<()>;

    /// Delete the record-set (or the matching record) at (host, type).
    async fn delete_rrset(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<()>;

    /// List zones held by the account.
    async fn list_domains(&self) -> Result<Vec<ProviderDomain>> {
        Err(not_implemented(self.provider_type(), "list_domains"))
    }

    /// Read one zone.
    async fn get_domain(&self, domain: &str) -> Result<ProviderDomain> {
        let _ = domain;
        Err(not_implemented(self.provider_type(), "get_domain"))
    }

    /// Find the zone responsible for a fully qualified name.
    async fn get_responsible_domain(&self, qname: &str) -> Result<ProviderDomain> {
        let _ = qname;
        Err(not_implemented(self.provider_type(), "get_responsible_domain"))
    }

    /// Export the zone in RFC 1035 master file format.
    async fn export_zonefile(&self, domain: &str) -> Result<String> {
        let _ = domain;
        Err(not_implemented(self.provider_type(), "export_zonefile"))
    }

    /// Create several record-sets in one call.
    async fn create_bulk_rrsets(&self, domain: &str, changes: &[RrsetChange]) -> Result<()> {
        let _ = (domain, changes);
        Err(not_implemented(self.provider_type(), "create_bulk_rrsets"))
    }

    /// Read every record-set of a zone.
    async fn retrieve_all_rrsets(&self, domain: &str) -> Result<Vec<Rrset>> {
        let _ = domain;
        Err(not_implemented(self.provider_type(), "retrieve_all_rrsets"))
    }

    /// Read the record-set at (host, type).
    async fn retrieve_specific_rrset(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
    ) -> Result<Rrset> {
        let _ = (domain, host, record_type);
        Err(not_implemented(self.provider_type(), "retrieve_specific_rrset"))
    }

    /// Replace several record-sets in one call.
    async fn modify_bulk_rrsets(&self, domain: &str, changes: &[RrsetChange]) -> Result<()> {
        let _ = (domain, changes);
        Err(not_implemented(self.provider_type(), "modify_bulk_rrsets"))
    }

    /// Delete several record-sets in one call.
    async fn delete_bulk_rrsets(&self, domain: &str, changes: &[RrsetChange]) -> Result<()> {
        let _ = (domain, changes);
        Err(not_implemented(self.provider_type(), "delete_bulk_rrsets"))
    }
}
