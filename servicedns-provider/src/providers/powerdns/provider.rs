//! PowerDNS DnsProvider trait 实现

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::providers::common::{normalize_domain_name, zone_fqdn};
use crate::reconcile::{canonicalize, merge_values, normalize_nameservers};
use crate::traits::{DnsProvider, ErrorContext, ProviderErrorMapper, require_domain, require_value};
use crate::types::{
    CreateRrsetRequest, FieldType, ModifyRrsetRequest, MxPriorityStyle, ProviderCredentialField,
    ProviderFeatures, ProviderMetadata, ProviderType, RecordType,
};

use super::{PdnsRecord, PdnsRrset, PdnsZone, PowerDnsProvider, RrsetPatch, ZoneCreateBody};

/// Zone creation body: `name.` with the non-empty nameservers in trailing-dot form.
pub(crate) fn zone_create_body(domain: &str, nameservers: &[String]) -> ZoneCreateBody {
    ZoneCreateBody {
        name: zone_fqdn(domain),
        kind: "Native",
        nameservers: normalize_nameservers(nameservers),
    }
}

/// Whole-rrset replace with the given values.
pub(crate) fn replace_patch(
    name: &str,
    record_type: RecordType,
    ttl: u32,
    values: &[String],
) -> RrsetPatch {
    RrsetPatch {
        rrsets: vec![PdnsRrset {
            name: name.to_string(),
            record_type: record_type.as_str().to_string(),
            ttl: Some(ttl),
            changetype: Some("REPLACE".to_string()),
            records: values
                .iter()
                .map(|content| PdnsRecord {
                    content: content.clone(),
                    disabled: false,
                })
                .collect(),
        }],
    }
}

/// Rrset removal.
pub(crate) fn delete_patch(name: &str, record_type: RecordType) -> RrsetPatch {
    RrsetPatch {
        rrsets: vec![PdnsRrset {
            name: name.to_string(),
            record_type: record_type.as_str().to_string(),
            ttl: None,
            changetype: Some("DELETE".to_string()),
            records: Vec::new(),
        }],
    }
}

impl PowerDnsProvider {
    fn zone_path(domain: &str) -> String {
        format!("/zones/{}", urlencoding::encode(&zone_fqdn(domain)))
    }

    async fn patch_zone(&self, domain: &str, name: &str, patch: &RrsetPatch) -> Result<()> {
        self.request(
            Method::PATCH,
            &Self::zone_path(domain),
            Some(patch),
            ErrorContext::record(domain, name),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for PowerDnsProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::PowerDns
    }

    fn metadata() -> ProviderMetadata {
        let mut fields = vec![
            ProviderCredentialField::new("apikey", "API Key", FieldType::Password, true),
            ProviderCredentialField::new("powerdnsapi", "API Host", FieldType::Text, false),
        ];
        fields.extend((1..=5).map(|i| {
            ProviderCredentialField::new(
                &format!("ns{i}"),
                &format!("Nameserver {i}"),
                FieldType::Text,
                false,
            )
        }));

        ProviderMetadata {
            id: ProviderType::PowerDns,
            name: "PowerDNS".to_string(),
            description: "PowerDNS authoritative server HTTP API".to_string(),
            required_fields: fields,
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
        let body = zone_create_body(&domain, &self.nameservers);

        self.request(
            Method::POST,
            "/zones",
            Some(&body),
            ErrorContext::domain(&domain),
        )
        .await?;

        log::info!(
            "[powerdns] Zone {} created with nameservers {:?}",
            body.name,
            body.nameservers
        );
        Ok(())
    }

    async fn delete_zone(&self, domain: &str) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);

        self.request::<()>(
            Method::DELETE,
            &Self::zone_path(&domain),
            None,
            ErrorContext::domain(&domain),
        )
        .await?;

        log::info!("[powerdns] Zone {domain} deleted");
        Ok(())
    }

    async fn create_rrset(&self, domain: &str, req: &CreateRrsetRequest) -> Result<()> {
        require_domain(self, domain)?;
        let new_value = require_value(self, &req.values)?;
        let domain = normalize_domain_name(domain);

        let merged = merge_values(&req.existing_values, new_value);
        let name = canonicalize(&req.host, &domain);
        let patch = replace_patch(&name, req.record_type, req.ttl, &merged);

        self.patch_zone(&domain, &name, &patch).await?;

        log::info!(
            "[powerdns] {name} {} replaced with {} value(s)",
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

        let name = canonicalize(host, &domain);
        let patch = replace_patch(&name, record_type, req.ttl, &[value.to_string()]);

        self.patch_zone(&domain, &name, &patch).await?;

        log::info!("[powerdns] {name} {record_type} set to a single value");
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
        let name = canonicalize(host, &domain);

        let zone: PdnsZone = self
            .get_json(&Self::zone_path(&domain), ErrorContext::domain(&domain))
            .await?;

        let found = zone
            .rrsets
            .iter()
            .any(|r| r.name == name && r.record_type == record_type.as_str());
        if !found {
            return Err(crate::error::ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record: format!("{name} {record_type}"),
                raw_message: None,
            });
        }

        self.patch_zone(&domain, &name, &delete_patch(&name, record_type))
            .await?;

        log::info!("[powerdns] {name} {record_type} deleted");
        Ok(())
    }
}
