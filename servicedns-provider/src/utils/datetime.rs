//! 日期时间序列化/反序列化工具
//!
//! Provider APIs disagree on timestamp formats:
//! - deSEC / DNSimple / Vultr: RFC 3339 (`2026-01-02T03:04:05Z`, `+00:00`)
//! - Hetzner: Go-style `2026-01-02 03:04:05.000 +0000 UTC`
//! - some PowerDNS builds: Unix seconds
//!
//! Serialization always emits RFC 3339.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// 序列化 Option<`DateTime`<Utc>> 为 RFC 3339 字符串
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

/// 反序列化：RFC 3339、Go 风格字符串或 Unix 秒
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Seconds(i64),
    }

    match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(RawTimestamp::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawTimestamp::Text(s)) => parse_text(&s)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("Unrecognized timestamp: {s}"))),
        Some(RawTimestamp::Seconds(ts)) => DateTime::from_timestamp(ts, 0)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        None => Ok(None),
    }
}

fn parse_text(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Hetzner appends the zone abbreviation after the numeric offset
    let go_style = s.strip_suffix(" UTC").unwrap_or(s);
    DateTime::parse_from_str(go_style, "%Y-%m-%d %H:%M:%S%.f %z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Deserialize, Serialize)]
    struct Stamped {
        #[serde(default, with = "super")]
        at: Option<DateTime<Utc>>,
    }

    fn parse(json: &str) -> Option<DateTime<Utc>> {
        serde_json::from_str::<Stamped>(json).unwrap().at
    }

    #[test]
    fn rfc3339_variants() {
        let z = parse(r#"{"at":"2026-01-02T03:04:05Z"}"#).unwrap();
        let offset = parse(r#"{"at":"2026-01-02T03:04:05+00:00"}"#).unwrap();
        assert_eq!(z, offset);
    }

    #[test]
    fn hetzner_style() {
        let dt = parse(r#"{"at":"2026-01-02 03:04:05.000 +0000 UTC"}"#).unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-01-02T03:04:05+00:00");
    }

    #[test]
    fn unix_seconds() {
        let dt = parse(r#"{"at":1767323045}"#).unwrap();
        assert_eq!(dt.timestamp(), 1_767_323_045);
    }

    #[test]
    fn null_missing_and_empty() {
        assert!(parse(r#"{"at":null}"#).is_none());
        assert!(parse("{}").is_none());
        assert!(parse(r#"{"at":""}"#).is_none());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(serde_json::from_str::<Stamped>(r#"{"at":"yesterday"}"#).is_err());
    }

    #[test]
    fn serializes_rfc3339() {
        let stamped = Stamped {
            at: parse(r#"{"at":"2026-01-02T03:04:05Z"}"#),
        };
        assert_eq!(
            serde_json::to_string(&stamped).unwrap(),
            r#"{"at":"2026-01-02T03:04:05+00:00"}"#
        );
    }
}
