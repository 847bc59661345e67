//! PowerDNS Provider 集成测试
//!
//! 需要一个可写的 PowerDNS 实例，`TEST_DOMAIN` 不应已存在。
//!
//! 运行方式:
//! ```bash
//! POWERDNS_API_KEY=xxx POWERDNS_API_HOST=127.0.0.1:8081 TEST_DOMAIN=example.test \
//!     cargo test -p servicedns-provider --test powerdns_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::{TestContext, create_request, generate_test_host, modify_request};
use servicedns_provider::{ProviderError, RecordType};

#[tokio::test]
#[ignore]
async fn test_powerdns_zone_lifecycle() {
    skip_if_no_credentials!("POWERDNS_API_KEY", "TEST_DOMAIN");

    let ctx = TestContext::powerdns().expect("创建测试上下文失败");

    require_ok!(ctx.provider.create_zone(&ctx.domain).await, "create_zone 失败");

    let again = ctx.provider.create_zone(&ctx.domain).await;
    assert!(
        matches!(again, Err(ProviderError::ZoneExists { .. })),
        "重复创建应返回 ZoneExists: {again:?}"
    );

    require_ok!(ctx.provider.delete_zone(&ctx.domain).await, "delete_zone 失败");
    println!("✓ zone 生命周期测试通过");
}

#[tokio::test]
#[ignore]
async fn test_powerdns_rrset_merge() {
    skip_if_no_credentials!("POWERDNS_API_KEY", "TEST_DOMAIN");

    let ctx = TestContext::powerdns().expect("创建测试上下文失败");
    require_ok!(ctx.provider.create_zone(&ctx.domain).await);

    let host = generate_test_host();
    let first = ctx
        .provider
        .create_rrset(&ctx.domain, &create_request(&host, RecordType::A, "192.0.2.1", &[]))
        .await;
    let second = ctx
        .provider
        .create_rrset(
            &ctx.domain,
            &create_request(&host, RecordType::A, "192.0.2.2", &["192.0.2.1"]),
        )
        .await;
    let modified = ctx
        .provider
        .modify_rrset(&ctx.domain, &host, RecordType::A, &modify_request("192.0.2.3", 600))
        .await;
    let deleted = ctx
        .provider
        .delete_rrset(&ctx.domain, &host, RecordType::A, "192.0.2.3")
        .await;

    ctx.cleanup_zone().await;

    assert!(first.is_ok(), "首个值创建失败: {first:?}");
    assert!(second.is_ok(), "合并创建失败: {second:?}");
    assert!(modified.is_ok(), "modify_rrset 失败: {modified:?}");
    assert!(deleted.is_ok(), "delete_rrset 失败: {deleted:?}");
    println!("✓ rrset 合并测试通过");
}

#[tokio::test]
#[ignore]
async fn test_powerdns_invalid_key() {
    skip_if_no_credentials!("POWERDNS_API_KEY", "TEST_DOMAIN");

    let ctx = TestContext::powerdns().expect("创建测试上下文失败");
    let bad = servicedns_provider::PowerDnsProvider::builder("wrong-key".to_string())
        .api_host(std::env::var("POWERDNS_API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()))
        .build()
        .expect("构建 provider 失败");

    use servicedns_provider::DnsProvider;
    let result = bad.create_zone(&ctx.domain).await;
    assert!(
        matches!(result, Err(ProviderError::InvalidCredentials { .. })),
        "错误的 key 应返回 InvalidCredentials: {result:?}"
    );
}
