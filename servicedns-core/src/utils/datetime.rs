//! Timestamp serde helpers for persisted rows.
//!
//! Zone and record rows written by the billing database carry SQL `DATETIME`
//! strings (`2026-01-02 03:04:05`, UTC); rows produced here use RFC 3339.
//! Both are accepted, RFC 3339 is always written.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const SQL_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// Deserializes `DateTime<Utc>` from RFC3339 or an SQL `DATETIME` string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let s = String::deserialize(deserializer)?;
    parse(&s).ok_or_else(|| Error::custom(format!("Invalid timestamp: {s}")))
}

fn parse(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, SQL_DATETIME)
                .ok()
                .map(|naive| naive.and_utc())
        })
}
