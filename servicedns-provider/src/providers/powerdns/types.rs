//! PowerDNS API 类型定义

use serde::{Deserialize, Serialize};

/// `POST /zones` request body.
#[derive(Debug, Serialize)]
pub struct ZoneCreateBody {
    pub name: String,
    pub kind: &'static str,
    pub nameservers: Vec<String>,
}

/// `PATCH /zones/<zone>` request body.
#[derive(Debug, Serialize)]
pub struct RrsetPatch {
    pub rrsets: Vec<PdnsRrset>,
}

/// One rrset, as sent in a patch and as returned inside a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdnsRrset {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changetype: Option<String>,
    #[serde(default)]
    pub records: Vec<PdnsRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsRecord {
    pub content: String,
    #[serde(default)]
    pub disabled: bool,
}

/// `GET /zones/<zone>` response (fields we read).
#[derive(Debug, Deserialize)]
pub struct PdnsZone {
    #[allow(dead_code)]
    pub name: String,
    #[serde(default)]
    pub rrsets: Vec<PdnsRrset>,
}
