//! Provider 公共工具函数

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::error::{ProviderError, Result};
use crate::types::split_priority;
use crate::utils::log_sanitizer::truncate_for_log;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// 创建带超时配置的 HTTP Client
///
/// The request timeout bounds every provider call; an elapsed timeout surfaces
/// as [`ProviderError::Timeout`].
pub(crate) fn create_http_client(provider: &str, timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(
            DEFAULT_CONNECT_TIMEOUT_SECS.min(timeout_secs),
        ))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("servicedns/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ Request bodies ============

/// Serialize a request body, logging a truncated copy.
pub(crate) fn json_body<B: Serialize>(provider: &str, body: &B) -> Result<String> {
    let json = serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
        provider: provider.to_string(),
        detail: e.to_string(),
    })?;
    log::debug!("[{provider}] Request Body: {}", truncate_for_log(&json));
    Ok(json)
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点
pub(crate) fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_string()
}

/// Zone name in PowerDNS/Bind form: `example.com.`
pub(crate) fn zone_fqdn(domain: &str) -> String {
    format!("{}.", normalize_domain_name(domain))
}

// ============ Record-level APIs ============

/// Merged values the remote does not hold yet, in merge order.
///
/// For APIs that add one record per call, this turns a whole-set merge into
/// the individual creates needed to reach it.
pub(crate) fn values_to_add(merged: &[String], remote: &[&str]) -> Vec<String> {
    merged
        .iter()
        .filter(|v| !remote.contains(&v.as_str()))
        .cloned()
        .collect()
}

/// The record whose content matches `value`.
///
/// `value` may carry an embedded MX priority (`"10 mail.example.com"`) while the
/// API stores the bare target; both forms are tried.
pub(crate) fn pick_record<'a, T>(
    records: &'a [T],
    value: &str,
    content: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    let (_, bare) = split_priority(value);
    records
        .iter()
        .find(|r| content(r) == value)
        .or_else(|| records.iter().find(|r| content(r) == bare))
}

/// Record a modify applies to: the one holding `current` when the caller
/// knows the old value, otherwise the first record of the set.
pub(crate) fn modify_target<'a, T>(
    records: &'a [T],
    current: Option<&str>,
    content: impl Fn(&T) -> &str,
) -> Option<&'a T> {
    match current {
        Some(value) => pick_record(records, value, content),
        None => records.first(),
    }
}
