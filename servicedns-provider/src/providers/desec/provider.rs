//! deSEC DnsProvider trait 实现

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::providers::common::normalize_domain_name;
use crate::reconcile::{canonicalize, merge_values, subname_for_api};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper, require_domain, require_value};
use crate::types::{
    CreateRrsetRequest, FieldType, ModifyRrsetRequest, MxPriorityStyle, ProviderCredentialField,
    ProviderDomain, ProviderFeatures, ProviderMetadata, ProviderType, RecordType, Rrset,
    RrsetChange,
};

use super::types::{CreateDomainBody, RrsetUpdateBody};
use super::{DesecDomain, DesecProvider, DesecRrset};

/// Body rrset for a (host, type); apex subname is `""` in bodies.
pub(crate) fn body_rrset(
    domain: &str,
    host: &str,
    record_type: RecordType,
    ttl: u32,
    records: Vec<String>,
) -> DesecRrset {
    DesecRrset {
        name: String::new(),
        subname: subname_for_api(host, domain, ""),
        record_type: record_type.as_str().to_string(),
        ttl: Some(ttl),
        records,
    }
}

/// Bulk body from generic changes; an empty value list deletes the rrset.
pub(crate) fn bulk_body(domain: &str, changes: &[RrsetChange]) -> Vec<DesecRrset> {
    changes
        .iter()
        .map(|c| body_rrset(domain, &c.host, c.record_type, c.ttl, c.values.clone()))
        .collect()
}

impl DesecProvider {
    /// `/domains/<zone>/rrsets/<subname|@>/<type>/`
    fn rrset_path(domain: &str, host: &str, record_type: RecordType) -> String {
        format!(
            "/domains/{domain}/rrsets/{}/{record_type}/",
            urlencoding::encode(&subname_for_api(host, domain, "@"))
        )
    }

    fn to_domain(domain: DesecDomain) -> ProviderDomain {
        ProviderDomain {
            name: domain.name,
            provider: ProviderType::Desec,
            minimum_ttl: domain.minimum_ttl,
            created_at: domain.created,
        }
    }

    fn to_rrset(domain: &str, rrset: DesecRrset) -> Rrset {
        let name = if rrset.name.is_empty() {
            canonicalize(&rrset.subname, domain)
        } else {
            rrset.name
        };
        Rrset {
            name,
            subname: rrset.subname,
            record_type: rrset.record_type,
            ttl: rrset.ttl.unwrap_or_default(),
            records: rrset.records,
        }
    }

    async fn send_bulk(
        &self,
        method: Method,
        domain: &str,
        changes: &[RrsetChange],
    ) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        if changes.is_empty() {
            return Ok(());
        }
        self.send_json(
            method,
            &format!("/domains/{domain}/rrsets/"),
            &bulk_body(&domain, changes),
            ErrorContext::domain(&domain),
        )
        .await?;
        log::info!("[desec] {} rrset(s) written to {domain}", changes.len());
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for DesecProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Desec
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Desec,
            name: "deSEC".to_string(),
            description: "deSEC free secure DNS hosting".to_string(),
            required_fields: vec![ProviderCredentialField::new(
                "apikey",
                "API Token",
                FieldType::Password,
                true,
            )],
            mx_priority: MxPriorityStyle::Embedded,
            features: ProviderFeatures {
                bulk_rrsets: true,
                rrset_retrieval: true,
                zonefile_export: true,
            },
        }
    }

    fn mx_priority_style(&self) -> MxPriorityStyle {
        self.mx_priority
    }

    async fn create_zone(&self, domain: &str) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);

        self.send_json(
            Method::POST,
            "/domains/",
            &CreateDomainBody { name: &domain },
            ErrorContext::domain(&domain),
        )
        .await?;

        log::info!("[desec] Zone {domain} created");
        Ok(())
    }

    async fn delete_zone(&self, domain: &str) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);

        self.request::<()>(
            Method::DELETE,
            &format!("/domains/{domain}/"),
            None,
            "application/json",
            ErrorContext::domain(&domain),
        )
        .await?;

        log::info!("[desec] Zone {domain} deleted");
        Ok(())
    }

    async fn create_rrset(&self, domain: &str, req: &CreateRrsetRequest) -> Result<()> {
        require_domain(self, domain)?;
        let new_value = require_value(self, &req.values)?;
        let domain = normalize_domain_name(domain);

        let merged = merge_values(&req.existing_values, new_value);
        let count = merged.len();
        let body = vec![body_rrset(&domain, &req.host, req.record_type, req.ttl, merged)];

        self.send_json(
            Method::PUT,
            &format!("/domains/{domain}/rrsets/"),
            &body,
            ErrorContext::record(&domain, &canonicalize(&req.host, &domain)),
        )
        .await?;

        log::info!(
            "[desec] {} {} replaced with {count} value(s)",
            canonicalize(&req.host, &domain),
            req.record_type
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

        let body = RrsetUpdateBody {
            ttl: req.ttl,
            records: vec![value.to_string()],
        };
        self.send_json(
            Method::PATCH,
            &Self::rrset_path(&domain, host, record_type),
            &body,
            ErrorContext::record(&domain, &canonicalize(host, &domain)),
        )
        .await?;

        log::info!(
            "[desec] {} {record_type} set to a single value",
            canonicalize(host, &domain)
        );
        Ok(())
    }

    async fn delete_rrset(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
        _value: &str,
    ) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);

        self.request::<()>(
            Method::DELETE,
            &Self::rrset_path(&domain, host, record_type),
            None,
            "application/json",
            ErrorContext::record(&domain, &canonicalize(host, &domain)),
        )
        .await?;

        log::info!(
            "[desec] {} {record_type} deleted",
            canonicalize(host, &domain)
        );
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<ProviderDomain>> {
        let domains: Vec<DesecDomain> = self
            .get_json("/domains/", ErrorContext::default())
            .await?;
        Ok(domains.into_iter().map(Self::to_domain).collect())
    }

    async fn get_domain(&self, domain: &str) -> Result<ProviderDomain> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        let found: DesecDomain = self
            .get_json(&format!("/domains/{domain}/"), ErrorContext::domain(&domain))
            .await?;
        Ok(Self::to_domain(found))
    }

    async fn get_responsible_domain(&self, qname: &str) -> Result<ProviderDomain> {
        require_domain(self, qname)?;
        let qname = normalize_domain_name(qname);
        let domains: Vec<DesecDomain> = self
            .get_json(
                &format!("/domains/?owns_qname={}", urlencoding::encode(&qname)),
                ErrorContext::domain(&qname),
            )
            .await?;

        domains
            .into_iter()
            .next()
            .map(Self::to_domain)
            .ok_or_else(|| crate::error::ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: qname,
                raw_message: Some("no domain owns this name".to_string()),
            })
    }

    async fn export_zonefile(&self, domain: &str) -> Result<String> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        self.request::<()>(
            Method::GET,
            &format!("/domains/{domain}/zonefile/"),
            None,
            "text/dns",
            ErrorContext::domain(&domain),
        )
        .await
    }

    async fn create_bulk_rrsets(&self, domain: &str, changes: &[RrsetChange]) -> Result<()> {
        self.send_bulk(Method::POST, domain, changes).await
    }

    async fn retrieve_all_rrsets(&self, domain: &str) -> Result<Vec<Rrset>> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        let rrsets: Vec<DesecRrset> = self
            .get_json(
                &format!("/domains/{domain}/rrsets/"),
                ErrorContext::domain(&domain),
            )
            .await?;
        Ok(rrsets
            .into_iter()
            .map(|r| Self::to_rrset(&domain, r))
            .collect())
    }

    async fn retrieve_specific_rrset(
        &self,
        domain: &str,
        host: &str,
        record_type: RecordType,
    ) -> Result<Rrset> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        let rrset: DesecRrset = self
            .get_json(
                &Self::rrset_path(&domain, host, record_type),
                ErrorContext::record(&domain, &canonicalize(host, &domain)),
            )
            .await?;
        Ok(Self::to_rrset(&domain, rrset))
    }

    async fn modify_bulk_rrsets(&self, domain: &str, changes: &[RrsetChange]) -> Result<()> {
        self.send_bulk(Method::PATCH, domain, changes).await
    }

    async fn delete_bulk_rrsets(&self, domain: &str, changes: &[RrsetChange]) -> Result<()> {
        let deletions: Vec<RrsetChange> = changes
            .iter()
            .map(|c| RrsetChange {
                values: Vec::new(),
                ..c.clone()
            })
            .collect();
        self.send_bulk(Method::PATCH, domain, &deletions).await
    }
}
