//! deSEC Provider 集成测试
//!
//! 运行方式:
//! ```bash
//! DESEC_API_TOKEN=xxx TEST_DOMAIN=example.dedyn.io \
//!     cargo test -p servicedns-provider --test desec_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::{TestContext, create_request, generate_test_host};
use servicedns_provider::RecordType;

#[tokio::test]
#[ignore]
async fn test_desec_get_domain() {
    skip_if_no_credentials!("DESEC_API_TOKEN", "TEST_DOMAIN");

    let ctx = TestContext::desec().expect("创建测试上下文失败");
    let domain = require_ok!(ctx.provider.get_domain(&ctx.domain).await, "get_domain 失败");
    assert_eq!(domain.name, ctx.domain);
    println!("✓ get_domain 测试通过: {}", domain.name);
}

#[tokio::test]
#[ignore]
async fn test_desec_rrset_roundtrip() {
    skip_if_no_credentials!("DESEC_API_TOKEN", "TEST_DOMAIN");

    let ctx = TestContext::desec().expect("创建测试上下文失败");
    let host = generate_test_host();

    let created = ctx
        .provider
        .create_rrset(
            &ctx.domain,
            &create_request(&host, RecordType::Txt, "\"servicedns\"", &[]),
        )
        .await;
    let fetched = ctx
        .provider
        .retrieve_specific_rrset(&ctx.domain, &host, RecordType::Txt)
        .await;

    ctx.cleanup_rrset(&host, RecordType::Txt, "\"servicedns\"").await;

    assert!(created.is_ok(), "create_rrset 失败: {created:?}");
    let rrset = require_ok!(fetched, "retrieve_specific_rrset 失败");
    assert_eq!(rrset.records, vec!["\"servicedns\"".to_string()]);
    println!("✓ rrset 测试通过: {}", rrset.name);
}
