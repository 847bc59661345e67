//! Hetzner DNS API 类型定义

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct HetznerZone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    /// e.g. `"2026-01-02 03:04:05.000 +0000 UTC"`; not RFC 3339, kept raw.
    #[serde(default)]
    #[allow(dead_code)]
    pub created: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ZonesResponse {
    #[serde(default)]
    pub zones: Vec<HetznerZone>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HetznerRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<HetznerRecord>,
}

#[derive(Debug, Serialize)]
pub struct CreateZoneBody<'a> {
    pub name: &'a str,
    pub ttl: u32,
}

/// Body of `POST /records` and `PUT /records/<id>`.
#[derive(Debug, Serialize)]
pub struct RecordBody {
    pub zone_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    pub ttl: u32,
}
