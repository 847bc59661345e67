//! Vultr DNS API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct VultrDomain {
    pub domain: String,
    #[serde(default, with = "crate::utils::datetime")]
    pub date_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct DomainsResponse {
    #[serde(default)]
    pub domains: Vec<VultrDomain>,
}

#[derive(Debug, Deserialize)]
pub struct DomainResponse {
    pub domain: VultrDomain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VultrRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    #[serde(default)]
    pub priority: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<VultrRecord>,
}

#[derive(Debug, Serialize)]
pub struct CreateDomainBody<'a> {
    pub domain: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateRecordBody {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub data: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct UpdateRecordBody {
    pub data: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}
