//! Zone 相关类型定义

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OrderConfig, RecordView};

/// Zone lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    /// Row allocated, provider not contacted yet
    Pending,
    Active,
    /// Billing suspension; the zone keeps resolving
    Suspended,
    Cancelled,
    Deleted,
}

/// Lifecycle event requested by the billing side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoneEvent {
    Activate,
    Suspend,
    Unsuspend,
    Cancel,
    Uncancel,
    Delete,
}

impl ZoneStatus {
    /// Status after `event`, or `None` if the event is not allowed from here.
    pub fn next(self, event: ZoneEvent) -> Option<Self> {
        match (self, event) {
            (Self::Pending, ZoneEvent::Activate) | (Self::Suspended, ZoneEvent::Unsuspend) => {
                Some(Self::Active)
            }
            (Self::Cancelled, ZoneEvent::Uncancel) => Some(Self::Active),
            (Self::Active, ZoneEvent::Suspend) => Some(Self::Suspended),
            (Self::Active | Self::Suspended, ZoneEvent::Cancel) => Some(Self::Cancelled),
            (Self::Deleted, _) => None,
            (_, ZoneEvent::Delete) => Some(Self::Deleted),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Cancelled => "cancelled",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ZoneEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activate => "activate",
            Self::Suspend => "suspend",
            Self::Unsuspend => "unsuspend",
            Self::Cancel => "cancel",
            Self::Uncancel => "uncancel",
            Self::Delete => "delete",
        })
    }
}

/// Zone 信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    /// Owning client
    pub client_id: i64,
    pub order_id: i64,
    /// Unique across all zones
    pub domain_name: String,
    /// Provider configuration snapshot taken from the order
    pub config: OrderConfig,
    pub status: ZoneStatus,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Zone row to insert; the store assigns id, status and timestamps.
#[derive(Debug, Clone)]
pub struct NewZone {
    pub client_id: i64,
    pub order_id: i64,
    pub domain_name: String,
    pub config: OrderConfig,
}

/// `toApiArray` view of a zone handed back to the billing side
#[derive(Debug, Clone, Serialize)]
pub struct ZoneApiView {
    pub id: i64,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
    pub domain_name: String,
    pub records: Vec<RecordView>,
    pub config: OrderConfig,
}
