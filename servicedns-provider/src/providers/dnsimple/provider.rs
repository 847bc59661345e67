//! DNSimple DnsProvider trait 实现

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Method;

use crate::error::{ProviderError, Result};
use crate::providers::common::{
    modify_target, normalize_domain_name, pick_record, values_to_add,
};
use crate::reconcile::{canonicalize, merge_values, subname_for_api};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper, require_domain, require_value};
use crate::types::{
    CreateRrsetRequest, FieldType, ModifyRrsetRequest, MxPriorityStyle, ProviderCredentialField,
    ProviderDomain, ProviderFeatures, ProviderMetadata, ProviderType, RecordType,
};

use super::types::{CreateDomainBody, CreateRecordBody, UpdateRecordBody};
use super::{DnsimpleDomain, DnsimpleProvider, DnsimpleRecord};

impl DnsimpleProvider {
    /// Records at (host, type), filtered server-side.
    async fn records_at(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
    ) -> Result<Vec<DnsimpleRecord>> {
        let name = subname_for_api(host, domain, "");
        self.get_data(
            &format!(
                "/zones/{domain}/records?name={}&type={record_type}",
                urlencoding::encode(&name)
            ),
            ErrorContext::domain(domain),
        )
        .await
    }

    fn record_not_found(&self, domain: &str, host: &str, record_type: RecordType) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: self.provider_name().to_string(),
            record: format!("{} {record_type}", canonicalize(host, domain)),
            raw_message: None,
        }
    }

    fn to_domain(domain: DnsimpleDomain) -> ProviderDomain {
        ProviderDomain {
            name: domain.name,
            provider: ProviderType::Dnsimple,
            minimum_ttl: None,
            created_at: domain.created_at,
        }
    }
}

#[async_trait]
impl DnsProvider for DnsimpleProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Dnsimple
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Dnsimple,
            name: "DNSimple".to_string(),
            description: "DNSimple hosted DNS".to_string(),
            required_fields: vec![
                ProviderCredentialField::new("apikey", "API Token", FieldType::Password, true),
                ProviderCredentialField::new(
                    "dnsimple_account",
                    "Account ID",
                    FieldType::Text,
                    true,
                ),
            ],
            mx_priority: MxPriorityStyle::Separate,
            features: ProviderFeatures::default(),
        }
    }

    fn mx_priority_style(&self) -> MxPriorityStyle {
        self.mx_priority
    }

    async fn create_zone(&self, domain: &str) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);

        self.request(
            Method::POST,
            "/domains",
            Some(&CreateDomainBody { name: &domain }),
            ErrorContext::domain(&domain),
        )
        .await?;

        log::info!("[dnsimple] Zone {domain} created");
        Ok(())
    }

    async fn delete_zone(&self, domain: &str) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);

        self.request::<()>(
            Method::DELETE,
            &format!("/domains/{domain}"),
            None,
            ErrorContext::domain(&domain),
        )
        .await?;

        log::info!("[dnsimple] Zone {domain} deleted");
        Ok(())
    }

    async fn create_rrset(&self, domain: &str, req: &CreateRrsetRequest) -> Result<()> {
        require_domain(self, domain)?;
        let new_value = require_value(self, &req.values)?;
        let domain = normalize_domain_name(domain);

        let remote = self.records_at(&domain, &req.host, req.record_type).await?;
        let remote_values: Vec<&str> = remote.iter().map(|r| r.content.as_str()).collect();
        let merged = merge_values(&req.existing_values, new_value);
        let missing = values_to_add(&merged, &remote_values);

        if missing.len() > 1 {
            log::warn!(
                "[dnsimple] {} {}: restoring {} value(s) missing remotely",
                canonicalize(&req.host, &domain),
                req.record_type,
                missing.len() - 1
            );
        }

        let name = subname_for_api(&req.host, &domain, "");
        let path = format!("/zones/{domain}/records");
        let ctx = ErrorContext::record(&domain, &canonicalize(&req.host, &domain));
        try_join_all(missing.into_iter().map(|content| {
            let body = CreateRecordBody {
                name: name.clone(),
                record_type: req.record_type.as_str().to_string(),
                content,
                ttl: req.ttl,
                priority: req.priority,
            };
            let path = path.clone();
            let ctx = ctx.clone();
            async move { self.request(Method::POST, &path, Some(&body), ctx).await }
        }))
        .await?;

        log::info!(
            "[dnsimple] {} {} now holds {} value(s)",
            canonicalize(&req.host, &domain),
            req.record_type,
            merged.len()
        );
        Ok(())
    }

    async fn modify_rrset(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
        req: &ModifyRrsetRequest,
    ) -> Result<()> {
        require_domain(self, domain)?;
        let value = require_value(self, &req.values)?;
        let domain = normalize_domain_name(domain);

        let remote = self.records_at(&domain, host, record_type).await?;
        let target = modify_target(&remote, req.current_value.as_deref(), |r| r.content.as_str())
            .ok_or_else(|| self.record_not_found(&domain, host, record_type))?;

        let body = UpdateRecordBody {
            content: value.to_string(),
            ttl: req.ttl,
            priority: req.priority.or(target.priority),
        };
        self.request(
            Method::PATCH,
            &format!("/zones/{domain}/records/{}", target.id),
            Some(&body),
            ErrorContext::record(&domain, &canonicalize(host, &domain)),
        )
        .await?;

        log::info!(
            "[dnsimple] {} {record_type} record {} updated",
            canonicalize(host, &domain),
            target.id
        );
        Ok(())
    }

    async fn delete_rrset(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);

        let remote = self.records_at(&domain, host, record_type).await?;
        let target = pick_record(&remote, value, |r| r.content.as_str())
            .ok_or_else(|| self.record_not_found(&domain, host, record_type))?;

        self.request::<()>(
            Method::DELETE,
            &format!("/zones/{domain}/records/{}", target.id),
            None,
            ErrorContext::record(&domain, &canonicalize(host, &domain)),
        )
        .await?;

        log::info!(
            "[dnsimple] {} {record_type} record {} deleted",
            canonicalize(host, &domain),
            target.id
        );
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<ProviderDomain>> {
        let domains: Vec<DnsimpleDomain> = self
            .get_data("/domains?per_page=100", ErrorContext::default())
            .await?;
        Ok(domains.into_iter().map(Self::to_domain).collect())
    }

    async fn get_domain(&self, domain: &str) -> Result<ProviderDomain> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        let found: DnsimpleDomain = self
            .get_data(&format!("/domains/{domain}"), ErrorContext::domain(&domain))
            .await?;
        Ok(Self::to_domain(found))
    }
}
