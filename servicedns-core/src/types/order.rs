//! 订单配置类型定义
//!
//! The billing side hands over one JSON blob per order. Known keys are typed,
//! everything else is kept in `extra` so the blob survives a round-trip.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use servicedns_provider::{ProviderConfig, ProviderType};

use crate::error::{CoreError, CoreResult};

/// 计费系统中的订单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub client_id: i64,
    /// Raw JSON configuration blob.
    pub config: String,
}

/// Parsed order configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Provider name, matched exactly (`PowerDNS`, `Bind`, ...).
    pub provider: String,
    pub domain_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub apikey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub ns1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub ns2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub ns3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub ns4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub ns5: Option<String>,
    /// PowerDNS API host (`host`, `host:port` or URL).
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub powerdnsapi: Option<String>,
    /// HTTP timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub max_retries: Option<String>,
    /// `embedded` or `separate`; overrides the provider default.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "scalar")]
    pub mx_priority: Option<String>,
    /// Provider-specific keys (`bind_zone_dir`, `dnsimple_account`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Billing systems store numbers as strings and vice versa; accept both.
fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| scalar_to_string(&v)))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl OrderConfig {
    /// Parse the configuration blob of an order.
    pub fn parse(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::SerializationError(e.to_string()))
    }

    /// Provider variant named by `provider`, matched exactly.
    pub fn provider_type(&self) -> CoreResult<ProviderType> {
        Ok(ProviderType::from_str(&self.provider)?)
    }

    /// Flat key-value view consumed by `ProviderConfig::from_map`.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = self
            .extra
            .iter()
            .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
            .collect();

        let typed = [
            ("apikey", &self.apikey),
            ("ns1", &self.ns1),
            ("ns2", &self.ns2),
            ("ns3", &self.ns3),
            ("ns4", &self.ns4),
            ("ns5", &self.ns5),
            ("powerdnsapi", &self.powerdnsapi),
            ("timeout", &self.timeout),
            ("max_retries", &self.max_retries),
            ("mx_priority", &self.mx_priority),
        ];
        for (key, value) in typed {
            if let Some(value) = value {
                map.insert(key.to_string(), value.clone());
            }
        }
        map
    }

    /// Validated provider configuration.
    pub fn provider_config(&self) -> CoreResult<ProviderConfig> {
        let provider = self.provider_type()?;
        Ok(ProviderConfig::from_map(provider, &self.to_map())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POWERDNS_BLOB: &str = r#"{
        "provider": "PowerDNS",
        "domain_name": "example.com",
        "apikey": "secret",
        "ns1": "ns1.example.net.",
        "ns2": "ns2.example.net",
        "ns3": "",
        "powerdnsapi": "10.0.0.5",
        "timeout": 10,
        "plan": "gold"
    }"#;

    #[test]
    fn parses_known_and_extra_keys() {
        let config = OrderConfig::parse(POWERDNS_BLOB).unwrap();
        assert_eq!(config.domain_name, "example.com");
        assert_eq!(config.timeout.as_deref(), Some("10"));
        assert_eq!(config.extra.get("plan"), Some(&Value::from("gold")));
        assert_eq!(config.provider_type().unwrap(), ProviderType::PowerDns);
    }

    #[test]
    fn blob_round_trips() {
        let config = OrderConfig::parse(POWERDNS_BLOB).unwrap();
        let again = OrderConfig::parse(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn provider_name_is_exact() {
        let config = OrderConfig {
            provider: "powerdns".to_string(),
            domain_name: "example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.provider_type(),
            Err(CoreError::UnknownProvider(ref p)) if p == "powerdns"
        ));
    }

    #[test]
    fn builds_provider_config() {
        let config = OrderConfig::parse(POWERDNS_BLOB).unwrap();
        let provider = config.provider_config().unwrap();
        assert_eq!(provider.provider_type(), ProviderType::PowerDns);
        assert_eq!(provider.options.timeout_secs, 10);
    }

    #[test]
    fn missing_credentials_reported() {
        let config = OrderConfig {
            provider: "Hetzner".to_string(),
            domain_name: "example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.provider_config(),
            Err(CoreError::CredentialValidation(_))
        ));
    }

    #[test]
    fn bind_keys_come_from_extra() {
        let config = OrderConfig::parse(
            r#"{"provider":"Bind","domain_name":"example.org","bind_zone_dir":"/var/named"}"#,
        )
        .unwrap();
        let map = config.to_map();
        assert_eq!(map.get("bind_zone_dir").map(String::as_str), Some("/var/named"));
        assert!(config.provider_config().is_ok());
    }
}
