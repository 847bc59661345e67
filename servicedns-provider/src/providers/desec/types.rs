//! deSEC API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain object (`/domains/`).
#[derive(Debug, Deserialize)]
pub struct DesecDomain {
    pub name: String,
    #[serde(default)]
    pub minimum_ttl: Option<u32>,
    #[serde(default, with = "crate::utils::datetime")]
    pub created: Option<DateTime<Utc>>,
}

/// RRset object; `subname` is `""` at the apex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesecRrset {
    #[serde(default, skip_serializing)]
    pub name: String,
    pub subname: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub records: Vec<String>,
}

/// `POST /domains/` body.
#[derive(Debug, Serialize)]
pub struct CreateDomainBody<'a> {
    pub name: &'a str,
}

/// Body of a single-rrset `PATCH`.
#[derive(Debug, Serialize)]
pub struct RrsetUpdateBody {
    pub ttl: u32,
    pub records: Vec<String>,
}
