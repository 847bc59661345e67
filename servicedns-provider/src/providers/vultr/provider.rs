//! Vultr DnsProvider trait 实现

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

use super::types::{
    CreateDomainBody, CreateRecordBody, DomainResponse, DomainsResponse, RecordsResponse,
    UpdateRecordBody,
};
use super::{VultrDomain, VultrProvider, VultrRecord};

/// Vultr reports `-1` (or nothing) for records without a priority.
fn record_priority(record: &VultrRecord) -> Option<u16> {
    record.priority.and_then(|p| u16::try_from(p).ok())
}

impl VultrProvider {
    /// Records at (host, type). Vultr has no server-side filter.
    async fn records_at(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
    ) -> Result<Vec<VultrRecord>> {
        let resp: RecordsResponse = self
            .get_json(
                &format!("/domains/{domain}/records?per_page=500"),
                ErrorContext::domain(domain),
            )
            .await?;

        let name = subname_for_api(host, domain, "");
        Ok(resp
            .records
            .into_iter()
            .filter(|r| r.name == name && r.record_type == record_type.as_str())
            .collect())
    }

    fn record_not_found(&self, domain: &str, host: &str, record_type: RecordType) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: self.provider_name().to_string(),
            record: format!("{} {record_type}", canonicalize(host, domain)),
            raw_message: None,
        }
    }

    fn to_domain(domain: VultrDomain) -> ProviderDomain {
        ProviderDomain {
            name: domain.domain,
            provider: ProviderType::Vultr,
            minimum_ttl: None,
            created_at: domain.date_created,
        }
    }
}

#[async_trait]
impl DnsProvider for VultrProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Vultr
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Vultr,
            name: "Vultr".to_string(),
            description: "Vultr DNS".to_string(),
            required_fields: vec![ProviderCredentialField::new(
                "apikey",
                "API Key",
                FieldType::Password,
                true,
            )],
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
            Some(&CreateDomainBody { domain: &domain }),
            ErrorContext::domain(&domain),
        )
        .await?;

        log::info!("[vultr] Zone {domain} created");
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

        log::info!("[vultr] Zone {domain} deleted");
        Ok(())
    }

    async fn create_rrset(&self, domain: &str, req: &CreateRrsetRequest) -> Result<()> {
        require_domain(self, domain)?;
        let new_value = require_value(self, &req.values)?;
        let domain = normalize_domain_name(domain);

        let remote = self.records_at(&domain, &req.host, req.record_type).await?;
        let remote_values: Vec<&str> = remote.iter().map(|r| r.data.as_str()).collect();
        let merged = merge_values(&req.existing_values, new_value);
        let missing = values_to_add(&merged, &remote_values);

        if missing.len() > 1 {
            log::warn!(
                "[vultr] {} {}: restoring {} value(s) missing remotely",
                canonicalize(&req.host, &domain),
                req.record_type,
                missing.len() - 1
            );
        }

        let name = subname_for_api(&req.host, &domain, "");
        let path = format!("/domains/{domain}/records");
        let ctx = ErrorContext::record(&domain, &canonicalize(&req.host, &domain));
        try_join_all(missing.into_iter().map(|data| {
            let body = CreateRecordBody {
                name: name.clone(),
                record_type: req.record_type.as_str().to_string(),
                data,
                ttl: req.ttl,
                priority: req.priority,
            };
            let path = path.clone();
            let ctx = ctx.clone();
            async move { self.request(Method::POST, &path, Some(&body), ctx).await }
        }))
        .await?;

        log::info!(
            "[vultr] {} {} now holds {} value(s)",
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
        let target = modify_target(&remote, req.current_value.as_deref(), |r| r.data.as_str())
            .ok_or_else(|| self.record_not_found(&domain, host, record_type))?;

        let body = UpdateRecordBody {
            data: value.to_string(),
            ttl: req.ttl,
            priority: req.priority.or_else(|| record_priority(target)),
        };
        self.request(
            Method::PATCH,
            &format!("/domains/{domain}/records/{}", target.id),
            Some(&body),
            ErrorContext::record(&domain, &canonicalize(host, &domain)),
        )
        .await?;

        log::info!(
            "[vultr] {} {record_type} record {} updated",
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
        let target = pick_record(&remote, value, |r| r.data.as_str())
            .ok_or_else(|| self.record_not_found(&domain, host, record_type))?;

        self.request::<()>(
            Method::DELETE,
            &format!("/domains/{domain}/records/{}", target.id),
            None,
            ErrorContext::record(&domain, &canonicalize(host, &domain)),
        )
        .await?;

        log::info!(
            "[vultr] {} {record_type} record {} deleted",
            canonicalize(host, &domain),
            target.id
        );
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<ProviderDomain>> {
        let resp: DomainsResponse = self
            .get_json("/domains?per_page=500", ErrorContext::default())
            .await?;
        Ok(resp.domains.into_iter().map(Self::to_domain).collect())
    }

    async fn get_domain(&self, domain: &str) -> Result<ProviderDomain> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        let resp: DomainResponse = self
            .get_json(&format!("/domains/{domain}"), ErrorContext::domain(&domain))
            .await?;
        Ok(Self::to_domain(resp.domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_priority_is_absent() {
        let records: RecordsResponse = serde_json::from_str(
            r#"{"records":[
                {"id":"a","type":"A","name":"","data":"192.0.2.1","priority":-1,"ttl":300},
                {"id":"m","type":"MX","name":"","data":"mail.example.com","priority":10,"ttl":300}
            ],"meta":{"total":2}}"#,
        )
        .unwrap();
        assert_eq!(record_priority(&records.records[0]), None);
        assert_eq!(record_priority(&records.records[1]), Some(10));
    }

    #[test]
    fn create_body_omits_missing_priority() {
        let body = CreateRecordBody {
            name: subname_for_api("@", "example.com", ""),
            record_type: "A".to_string(),
            data: "192.0.2.1".to_string(),
            ttl: 300,
            priority: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "", "type": "A", "data": "192.0.2.1", "ttl": 300})
        );
    }

    #[test]
    fn domain_created_parses() {
        let resp: DomainResponse = serde_json::from_str(
            r#"{"domain":{"domain":"example.com","date_created":"2026-01-02T03:04:05+00:00","dns_sec":"disabled"}}"#,
        )
        .unwrap();
        let domain = VultrProvider::to_domain(resp.domain);
        assert_eq!(domain.name, "example.com");
        assert!(domain.created_at.is_some());
    }

    #[test]
    fn metadata_is_separate_style() {
        assert_eq!(
            VultrProvider::metadata().mx_priority,
            MxPriorityStyle::Separate
        );
    }
}
