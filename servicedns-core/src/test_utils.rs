//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use servicedns_provider::{
    CreateRrsetRequest, DnsProvider, ModifyRrsetRequest, MxPriorityStyle, ProviderError,
    ProviderFeatures, ProviderMetadata, ProviderType, RecordType, canonicalize, merge_values,
};
use tokio::sync::Mutex;

use crate::services::ServiceContext;
use crate::traits::{InMemoryOrderStore, InMemoryZoneStore, ProviderRegistry};
use crate::types::{Order, OrderConfig, Record};

// ===== MockProvider =====

/// One call received by [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    CreateZone(String),
    DeleteZone(String),
    /// Whole-set replace as it would go on the wire
    CreateRrset {
        name: String,
        record_type: RecordType,
        ttl: u32,
        records: Vec<String>,
        priority: Option<u16>,
    },
    ModifyRrset {
        name: String,
        record_type: RecordType,
        ttl: u32,
        value: String,
        priority: Option<u16>,
        current: Option<String>,
    },
    DeleteRrset {
        name: String,
        record_type: RecordType,
        value: String,
    },
}

/// Records every call; failures can be primed per operation.
pub struct MockProvider {
    mx_priority: MxPriorityStyle,
    calls: Mutex<Vec<ProviderCall>>,
    failures: Mutex<HashMap<&'static str, ProviderError>>,
}

impl MockProvider {
    pub fn new(mx_priority: MxPriorityStyle) -> Self {
        Self {
            mx_priority,
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    /// Make the next call of `operation` fail with `err`.
    pub async fn fail_next(&self, operation: &'static str, err: ProviderError) {
        self.failures.lock().await.insert(operation, err);
    }

    pub async fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, operation: &'static str, call: ProviderCall) -> Result<(), ProviderError> {
        if let Some(err) = self.failures.lock().await.remove(operation) {
            return Err(err);
        }
        self.calls.lock().await.push(call);
        Ok(())
    }
}

pub fn not_found(domain: &str) -> ProviderError {
    ProviderError::DomainNotFound {
        provider: "powerdns".to_string(),
        domain: domain.to_string(),
        raw_message: Some("Could not find domain".to_string()),
    }
}

pub fn network_down() -> ProviderError {
    ProviderError::NetworkError {
        provider: "powerdns".to_string(),
        detail: "connection refused".to_string(),
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::PowerDns
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::PowerDns,
            name: "Mock".to_string(),
            description: "Recording provider".to_string(),
            required_fields: Vec::new(),
            mx_priority: MxPriorityStyle::Embedded,
            features: ProviderFeatures::default(),
        }
    }

    fn mx_priority_style(&self) -> MxPriorityStyle {
        self.mx_priority
    }

    async fn create_zone(&self, domain: &str) -> Result<(), ProviderError> {
        self.record("create_zone", ProviderCall::CreateZone(domain.to_string()))
            .await
    }

    async fn delete_zone(&self, domain: &str) -> Result<(), ProviderError> {
        self.record("delete_zone", ProviderCall::DeleteZone(domain.to_string()))
            .await
    }

    async fn create_rrset(&self, domain: &str, req: &CreateRrsetRequest) -> Result<(), ProviderError> {
        let records = req
            .new_value()
            .map(|v| merge_values(&req.existing_values, v))
            .unwrap_or_default();
        self.record(
            "create_rrset",
            ProviderCall::CreateRrset {
                name: canonicalize(&req.host, domain),
                record_type: req.record_type,
                ttl: req.ttl,
                records,
                priority: req.priority,
            },
        )
        .await
    }

    async fn modify_rrset(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
        req: &ModifyRrsetRequest,
    ) -> Result<(), ProviderError> {
        self.record(
            "modify_rrset",
            ProviderCall::ModifyRrset {
                name: canonicalize(host, domain),
                record_type,
                ttl: req.ttl,
                value: req.values.first().cloned().unwrap_or_default(),
                priority: req.priority,
                current: req.current_value.clone(),
            },
        )
        .await
    }

    async fn delete_rrset(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<(), ProviderError> {
        self.record(
            "delete_rrset",
            ProviderCall::DeleteRrset {
                name: canonicalize(host, domain),
                record_type,
                value: value.to_string(),
            },
        )
        .await
    }
}

// ===== Fixtures =====

pub const CLIENT_ID: i64 = 7;
pub const ORDER_ID: i64 = 100;

/// PowerDNS order; `ns2` deliberately lacks its trailing dot.
pub fn order(id: i64, domain: &str) -> Order {
    Order {
        id,
        client_id: CLIENT_ID,
        config: serde_json::json!({
            "provider": "PowerDNS",
            "domain_name": domain,
            "apikey": "secret",
            "powerdnsapi": "http://127.0.0.1:8081",
            "ns1": "ns1.example.net.",
            "ns2": "ns2.example.net"
        })
        .to_string(),
    }
}

/// Record row for guard tests.
pub fn record(id: i64, host: &str, record_type: RecordType, value: &str) -> Record {
    let now = Utc::now();
    Record {
        id,
        zone_id: 1,
        record_type,
        host: host.to_string(),
        value: value.to_string(),
        ttl: 3600,
        priority: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Everything a service test needs
pub struct TestEnv {
    pub ctx: Arc<ServiceContext>,
    pub zones: Arc<InMemoryZoneStore>,
    pub orders: Arc<InMemoryOrderStore>,
    pub provider: Arc<MockProvider>,
}

/// 创建测试用 `ServiceContext`，PowerDNS 指向 mock provider
pub fn create_test_env(mx_priority: MxPriorityStyle) -> TestEnv {
    let zones = Arc::new(InMemoryZoneStore::new());
    let orders = Arc::new(InMemoryOrderStore::new());
    let provider = Arc::new(MockProvider::new(mx_priority));

    let mut registry = ProviderRegistry::new();
    let mock = Arc::clone(&provider);
    registry.register(
        ProviderType::PowerDns,
        Arc::new(move |_: &OrderConfig| -> crate::CoreResult<Arc<dyn DnsProvider>> {
            let provider: Arc<dyn DnsProvider> = mock.clone();
            Ok(provider)
        }),
    );

    let ctx = Arc::new(ServiceContext::new(
        zones.clone(),
        orders.clone(),
        Arc::new(registry),
    ));

    TestEnv {
        ctx,
        zones,
        orders,
        provider,
    }
}
