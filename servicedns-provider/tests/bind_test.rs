//! Bind Provider 集成测试（基于临时目录，无需外部服务）

mod common;

use common::{create_request, modify_request};
use servicedns_provider::{
    BindProvider, DnsProvider, ProviderConfig, ProviderCredentials, ProviderError,
    ProviderOptions, RecordType, create_provider,
};
use tempfile::TempDir;

fn provider(dir: &TempDir) -> BindProvider {
    BindProvider::builder(dir.path())
        .nameservers(vec![
            "ns1.example.net".to_string(),
            String::new(),
            "ns2.example.net.".to_string(),
        ])
        .build()
        .expect("构建 Bind provider 失败")
}

#[tokio::test]
async fn test_bind_zone_lifecycle() {
    let dir = TempDir::new().expect("创建临时目录失败");
    let bind = provider(&dir);

    require_ok!(bind.create_zone("example.com").await, "create_zone 失败");
    assert!(dir.path().join("example.com.zone").exists());

    let again = bind.create_zone("example.com").await;
    assert!(
        matches!(again, Err(ProviderError::ZoneExists { .. })),
        "重复创建应返回 ZoneExists: {again:?}"
    );

    let zonefile = require_ok!(bind.export_zonefile("example.com").await);
    assert!(zonefile.contains("$ORIGIN example.com."));
    assert!(zonefile.contains("IN NS ns1.example.net."));
    assert!(zonefile.contains("IN NS ns2.example.net."));

    let domains = require_ok!(bind.list_domains().await);
    assert_eq!(domains.len(), 1);
    assert_eq!(domains[0].name, "example.com");

    require_ok!(bind.delete_zone("example.com").await, "delete_zone 失败");
    assert!(!dir.path().join("example.com.zone").exists());

    let missing = bind.delete_zone("example.com").await;
    assert!(
        matches!(&missing, Err(e) if e.is_not_found()),
        "删除不存在的 zone 应返回 not-found: {missing:?}"
    );
}

#[tokio::test]
async fn test_bind_rrset_merge_modify_delete() {
    let dir = TempDir::new().expect("创建临时目录失败");
    let bind = provider(&dir);
    require_ok!(bind.create_zone("example.com").await);

    require_ok!(
        bind.create_rrset(
            "example.com",
            &create_request("www", RecordType::A, "192.0.2.1", &[])
        )
        .await
    );
    require_ok!(
        bind.create_rrset(
            "example.com",
            &create_request("www", RecordType::A, "192.0.2.2", &["192.0.2.1"])
        )
        .await
    );

    let rrset = require_ok!(
        bind.retrieve_specific_rrset("example.com", "www", RecordType::A)
            .await
    );
    assert_eq!(rrset.name, "www.example.com.");
    assert_eq!(rrset.subname, "www");
    assert_eq!(
        rrset.records,
        vec!["192.0.2.1".to_string(), "192.0.2.2".to_string()]
    );

    require_ok!(
        bind.modify_rrset(
            "example.com",
            "www.example.com",
            RecordType::A,
            &modify_request("192.0.2.9", 600)
        )
        .await
    );
    let rrset = require_ok!(
        bind.retrieve_specific_rrset("example.com", "www", RecordType::A)
            .await
    );
    assert_eq!(rrset.records, vec!["192.0.2.9".to_string()]);
    assert_eq!(rrset.ttl, 600);

    require_ok!(
        bind.delete_rrset("example.com", "www", RecordType::A, "192.0.2.9")
            .await
    );
    let gone = bind
        .retrieve_specific_rrset("example.com", "www", RecordType::A)
        .await;
    assert!(matches!(gone, Err(ProviderError::RecordNotFound { .. })));

    let again = bind
        .delete_rrset("example.com", "www", RecordType::A, "192.0.2.9")
        .await;
    assert!(matches!(again, Err(ProviderError::RecordNotFound { .. })));
}

#[tokio::test]
async fn test_bind_apex_mx_embedded() {
    let dir = TempDir::new().expect("创建临时目录失败");
    let bind = provider(&dir);
    require_ok!(bind.create_zone("example.com").await);

    require_ok!(
        bind.create_rrset(
            "example.com",
            &create_request("@", RecordType::Mx, "10 mail.example.com.", &[])
        )
        .await
    );

    let all = require_ok!(bind.retrieve_all_rrsets("example.com").await);
    let mx = all
        .iter()
        .find(|r| r.record_type == "MX")
        .expect("MX rrset 应存在");
    assert_eq!(mx.name, "example.com.");
    assert_eq!(mx.subname, "");
    assert_eq!(mx.records, vec!["10 mail.example.com.".to_string()]);
}

#[tokio::test]
async fn test_bind_txt_survives_rewrite() {
    let dir = TempDir::new().expect("创建临时目录失败");
    let bind = provider(&dir);
    require_ok!(bind.create_zone("example.com").await);

    require_ok!(
        bind.create_rrset(
            "example.com",
            &create_request("_dmarc", RecordType::Txt, "v=DMARC1; p=none", &[])
        )
        .await
    );
    // 第二次写入会重新解析并重写 zone 文件
    require_ok!(
        bind.create_rrset(
            "example.com",
            &create_request("www", RecordType::A, "203.0.113.5", &[])
        )
        .await
    );

    let rrset = require_ok!(
        bind.retrieve_specific_rrset("example.com", "_dmarc", RecordType::Txt)
            .await
    );
    assert_eq!(rrset.records, vec!["v=DMARC1; p=none".to_string()]);

    let zonefile = require_ok!(bind.export_zonefile("example.com").await);
    assert!(
        zonefile.contains("IN TXT \"v=DMARC1; p=none\""),
        "TXT 值应以带引号的字符串写入: {zonefile}"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_bind_failed_reload_leaves_no_zone() {
    let dir = TempDir::new().expect("创建临时目录失败");
    let bind = BindProvider::builder(dir.path())
        .rndc(Some("false".to_string()))
        .nameservers(vec!["ns1.example.net".to_string()])
        .build()
        .expect("构建 Bind provider 失败");

    let first = bind.create_zone("example.com").await;
    assert!(
        first.is_err() && !matches!(first, Err(ProviderError::ZoneExists { .. })),
        "rndc 失败应返回 reload 错误: {first:?}"
    );
    assert!(!dir.path().join("example.com.zone").exists());

    let retry = bind.create_zone("example.com").await;
    assert!(
        retry.is_err() && !matches!(retry, Err(ProviderError::ZoneExists { .. })),
        "重试不应返回 ZoneExists: {retry:?}"
    );
    assert!(!dir.path().join("example.com.zone").exists());
}

#[tokio::test]
async fn test_bind_unknown_zone() {
    let dir = TempDir::new().expect("创建临时目录失败");
    let bind = provider(&dir);

    let result = bind
        .create_rrset(
            "missing.com",
            &create_request("www", RecordType::A, "192.0.2.1", &[]),
        )
        .await;
    assert!(
        matches!(result, Err(ProviderError::DomainNotFound { .. })),
        "未知 zone 应返回 DomainNotFound: {result:?}"
    );
}

#[tokio::test]
async fn test_bind_via_factory() {
    let dir = TempDir::new().expect("创建临时目录失败");
    let provider = create_provider(ProviderConfig {
        credentials: ProviderCredentials::Bind {
            zone_dir: dir.path().to_string_lossy().into_owned(),
            rndc: None,
            nameservers: vec!["ns1.example.net".to_string()],
        },
        options: ProviderOptions::default(),
    })
    .expect("factory 创建失败");

    require_ok!(provider.create_zone("example.org").await);
    let domain = require_ok!(provider.get_domain("example.org").await);
    assert_eq!(domain.name, "example.org");
    assert!(domain.minimum_ttl.is_some());
}
