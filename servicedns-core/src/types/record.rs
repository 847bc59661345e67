//! DNS 记录类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use servicedns_provider::RecordType;

/// 持久化的 DNS 记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub zone_id: i64,
    pub record_type: RecordType,
    /// Subname as entered; `""`/`"@"` is the apex
    pub host: String,
    /// Bare value; MX priority lives in `priority`
    pub value: String,
    pub ttl: u32,
    /// Meaningful for MX only, 0 otherwise
    pub priority: u16,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Record row to insert
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub zone_id: i64,
    pub record_type: RecordType,
    pub host: String,
    pub value: String,
    pub ttl: u32,
    pub priority: u16,
}

/// Flat field set sent by the record-management caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordRequest {
    pub order_id: i64,
    #[serde(default)]
    pub record_name: String,
    #[serde(default)]
    pub record_type: String,
    #[serde(default)]
    pub record_value: String,
    #[serde(default)]
    pub record_ttl: Option<u32>,
    #[serde(default)]
    pub record_priority: Option<u16>,
    /// Required by update and delete
    #[serde(default)]
    pub record_id: Option<i64>,
    /// Calling client, checked against the zone owner when present
    #[serde(default)]
    pub client_id: Option<i64>,
}

/// Record as listed in [`super::ZoneApiView`]
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub id: i64,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub host: String,
    pub value: String,
    pub ttl: u32,
    pub priority: u16,
}

impl From<&Record> for RecordView {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            record_type: record.record_type,
            host: record.host.clone(),
            value: record.value.clone(),
            ttl: record.ttl,
            priority: record.priority,
        }
    }
}
