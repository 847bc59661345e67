//! DNSimple API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every DNSimple payload is wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub struct DnsimpleResponse<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct DnsimpleDomain {
    pub name: String,
    #[serde(default, with = "crate::utils::datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Zone record; `name` is `""` at the apex.
#[derive(Debug, Clone, Deserialize)]
pub struct DnsimpleRecord {
    pub id: u64,
    #[allow(dead_code)]
    pub name: String,
    pub content: String,
    #[allow(dead_code)]
    pub ttl: u32,
    #[serde(default)]
    pub priority: Option<u16>,
    #[serde(rename = "type")]
    #[allow(dead_code)]
    pub record_type: String,
}

#[derive(Debug, Serialize)]
pub struct CreateDomainBody<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateRecordBody {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct UpdateRecordBody {
    pub content: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}
