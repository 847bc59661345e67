//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use servicedns_provider::{
    CreateRrsetRequest, DnsProvider, ModifyRrsetRequest, ProviderConfig, ProviderCredentials,
    ProviderOptions, RecordType, create_provider,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试主机名（`_test-<毫秒时间戳>`）
pub fn generate_test_host() -> String {
    format!("_test-{}", chrono::Utc::now().timestamp_millis())
}

/// Create request for one new value on top of `existing`.
pub fn create_request(
    host: &str,
    record_type: RecordType,
    value: &str,
    existing: &[&str],
) -> CreateRrsetRequest {
    CreateRrsetRequest {
        host: host.to_string(),
        record_type,
        ttl: 3600,
        values: vec![value.to_string()],
        priority: None,
        existing_values: existing.iter().map(|v| (*v).to_string()).collect(),
    }
}

pub fn modify_request(value: &str, ttl: u32) -> ModifyRrsetRequest {
    ModifyRrsetRequest {
        ttl,
        values: vec![value.to_string()],
        priority: None,
        current_value: None,
    }
}

/// 测试上下文 - 封装 Provider 和测试域名
pub struct TestContext {
    pub provider: Arc<dyn DnsProvider>,
    pub domain: String,
}

impl TestContext {
    /// 创建 PowerDNS 测试上下文
    pub fn powerdns() -> Option<Self> {
        let api_key = env::var("POWERDNS_API_KEY").ok()?;
        let api_host = env::var("POWERDNS_API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let domain = env::var("TEST_DOMAIN").ok()?;

        Self::from_credentials(
            ProviderCredentials::PowerDns {
                api_key,
                api_host,
                nameservers: vec![
                    "ns1.example.net".to_string(),
                    "ns2.example.net".to_string(),
                ],
            },
            domain,
        )
    }

    /// 创建 deSEC 测试上下文
    pub fn desec() -> Option<Self> {
        let api_token = env::var("DESEC_API_TOKEN").ok()?;
        let domain = env::var("TEST_DOMAIN").ok()?;
        Self::from_credentials(ProviderCredentials::Desec { api_token }, domain)
    }

    fn from_credentials(credentials: ProviderCredentials, domain: String) -> Option<Self> {
        let provider = create_provider(ProviderConfig {
            credentials,
            options: ProviderOptions::default(),
        })
        .ok()?;
        Some(Self { provider, domain })
    }

    /// 清理测试 rrset（忽略错误）
    pub async fn cleanup_rrset(&self, host: &str, record_type: RecordType, value: &str) {
        let _ = self
            .provider
            .delete_rrset(&self.domain, host, record_type, value)
            .await;
    }

    /// 清理测试 zone（忽略错误）
    pub async fn cleanup_zone(&self) {
        let _ = self.provider.delete_zone(&self.domain).await;
    }
}
