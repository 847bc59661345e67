//! Hetzner DNS DnsProvider trait 实现

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

use super::types::{CreateZoneBody, RecordBody, RecordsResponse, ZonesResponse};
use super::{DEFAULT_ZONE_TTL, HetznerProvider, HetznerRecord, HetznerZone};

impl HetznerProvider {
    /// Zone by exact name; Hetzner answers an unknown name with an empty list.
    async fn find_zone(&self, domain: &str) -> Result<HetznerZone> {
        let resp: ZonesResponse = self
            .get_json(
                &format!("/zones?name={}", urlencoding::encode(domain)),
                ErrorContext::domain(domain),
            )
            .await?;

        resp.zones
            .into_iter()
            .find(|z| z.name.eq_ignore_ascii_case(domain))
            .ok_or_else(|| ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: domain.to_string(),
                raw_message: None,
            })
    }

    /// Records at (host, type) within a zone.
    async fn records_at(
        &self,
        zone: &HetznerZone,
        host: &str,
        record_type: RecordType,
    ) -> Result<Vec<HetznerRecord>> {
        let resp: RecordsResponse = self
            .get_json(
                &format!("/records?zone_id={}", urlencoding::encode(&zone.id)),
                ErrorContext::domain(&zone.name),
            )
            .await?;

        let name = subname_for_api(host, &zone.name, "@");
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

    fn record_body(
        zone: &HetznerZone,
        host: &str,
        record_type: RecordType,
        value: String,
        ttl: u32,
    ) -> RecordBody {
        RecordBody {
            zone_id: zone.id.clone(),
            name: subname_for_api(host, &zone.name, "@"),
            record_type: record_type.as_str().to_string(),
            value,
            ttl,
        }
    }

    fn to_domain(zone: HetznerZone) -> ProviderDomain {
        ProviderDomain {
            name: zone.name,
            provider: ProviderType::Hetzner,
            minimum_ttl: zone.ttl,
            created_at: None,
        }
    }
}

#[async_trait]
impl DnsProvider for HetznerProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Hetzner
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Hetzner,
            name: "Hetzner".to_string(),
            description: "Hetzner DNS Console".to_string(),
            required_fields: vec![ProviderCredentialField::new(
                "apikey",
                "API Token",
                FieldType::Password,
                true,
            )],
            mx_priority: MxPriorityStyle::Embedded,
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
            "/zones",
            Some(&CreateZoneBody {
                name: &domain,
                ttl: DEFAULT_ZONE_TTL,
            }),
            ErrorContext::domain(&domain),
        )
        .await?;

        log::info!("[hetzner] Zone {domain} created");
        Ok(())
    }

    async fn delete_zone(&self, domain: &str) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        let zone = self.find_zone(&domain).await?;

        self.request::<()>(
            Method::DELETE,
            &format!("/zones/{}", zone.id),
            None,
            ErrorContext::domain(&domain),
        )
        .await?;

        log::info!("[hetzner] Zone {domain} ({}) deleted", zone.id);
        Ok(())
    }

    async fn create_rrset(&self, domain: &str, req: &CreateRrsetRequest) -> Result<()> {
        require_domain(self, domain)?;
        let new_value = require_value(self, &req.values)?;
        let domain = normalize_domain_name(domain);

        let zone = self.find_zone(&domain).await?;
        let remote = self.records_at(&zone, &req.host, req.record_type).await?;
        let remote_values: Vec<&str> = remote.iter().map(|r| r.value.as_str()).collect();
        let merged = merge_values(&req.existing_values, new_value);
        let missing = values_to_add(&merged, &remote_values);

        if missing.len() > 1 {
            log::warn!(
                "[hetzner] {} {}: restoring {} value(s) missing remotely",
                canonicalize(&req.host, &domain),
                req.record_type,
                missing.len() - 1
            );
        }

        let ctx = ErrorContext::record(&domain, &canonicalize(&req.host, &domain));
        try_join_all(missing.into_iter().map(|value| {
            let body = Self::record_body(&zone, &req.host, req.record_type, value, req.ttl);
            let ctx = ctx.clone();
            async move { self.request(Method::POST, "/records", Some(&body), ctx).await }
        }))
        .await?;

        log::info!(
            "[hetzner] {} {} now holds {} value(s)",
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

        let zone = self.find_zone(&domain).await?;
        let remote = self.records_at(&zone, host, record_type).await?;
        let target = modify_target(&remote, req.current_value.as_deref(), |r| r.value.as_str())
            .ok_or_else(|| self.record_not_found(&domain, host, record_type))?;

        let body = Self::record_body(&zone, host, record_type, value.to_string(), req.ttl);
        self.request(
            Method::PUT,
            &format!("/records/{}", target.id),
            Some(&body),
            ErrorContext::record(&domain, &canonicalize(host, &domain)),
        )
        .await?;

        log::info!(
            "[hetzner] {} {record_type} record {} updated",
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

        let zone = self.find_zone(&domain).await?;
        let remote = self.records_at(&zone, host, record_type).await?;
        let target = pick_record(&remote, value, |r| r.value.as_str())
            .ok_or_else(|| self.record_not_found(&domain, host, record_type))?;

        self.request::<()>(
            Method::DELETE,
            &format!("/records/{}", target.id),
            None,
            ErrorContext::record(&domain, &canonicalize(host, &domain)),
        )
        .await?;

        log::info!(
            "[hetzner] {} {record_type} record {} deleted",
            canonicalize(host, &domain),
            target.id
        );
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<ProviderDomain>> {
        let resp: ZonesResponse = self
            .get_json("/zones?per_page=100", ErrorContext::default())
            .await?;
        Ok(resp.zones.into_iter().map(Self::to_domain).collect())
    }

    async fn get_domain(&self, domain: &str) -> Result<ProviderDomain> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        Ok(Self::to_domain(self.find_zone(&domain).await?))
    }
}
