//! Bind DnsProvider trait 实现

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, zone_fqdn};
use crate::reconcile::{canonicalize, merge_values, relative_name};
use crate::traits::{
    DnsProvider, ErrorContext, ProviderErrorMapper, RawApiError, require_domain, require_value,
};
use crate::types::{
    CreateRrsetRequest, FieldType, ModifyRrsetRequest, MxPriorityStyle, ProviderCredentialField,
    ProviderDomain, ProviderFeatures, ProviderMetadata, ProviderType, RecordType, Rrset,
};

use super::zonefile::ZoneRrset;
use super::{BindProvider, ZONE_FILE_SUFFIX, ZoneFile};

impl BindProvider {
    async fn load_zone(&self, domain: &str) -> Result<ZoneFile> {
        let path = self.zone_path(domain)?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| self.io_error(&e, ErrorContext::domain(domain)))?;
        ZoneFile::parse(&text).map_err(|e| self.zonefile_error(&e, domain))
    }

    /// Bump the serial, write through a temp file, then reload.
    async fn save_zone(&self, domain: &str, zone: &mut ZoneFile) -> Result<()> {
        zone.bump_serial(Utc::now().date_naive());
        let path = self.zone_path(domain)?;
        let tmp = path.with_extension("zone.tmp");

        tokio::fs::write(&tmp, zone.render())
            .await
            .map_err(|e| self.io_error(&e, ErrorContext::domain(domain)))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| self.io_error(&e, ErrorContext::domain(domain)))?;

        log::debug!(
            "[bind] Wrote {} (serial {})",
            path.display(),
            zone.soa.serial
        );
        self.reload(domain).await
    }

    /// `rndc reload <zone>` when configured.
    async fn reload(&self, domain: &str) -> Result<()> {
        let Some(rndc) = &self.rndc else {
            return Ok(());
        };

        let output = tokio::process::Command::new(rndc)
            .arg("reload")
            .arg(domain)
            .output()
            .await
            .map_err(|e| {
                self.map_error(
                    RawApiError::with_code("rndc", format!("failed to run {rndc}: {e}")),
                    ErrorContext::domain(domain),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map_or_else(|| "rndc".to_string(), |c| format!("rndc:{c}"));
            return Err(self.map_error(
                RawApiError::with_code(code, format!("rndc reload {domain}: {}", stderr.trim())),
                ErrorContext::domain(domain),
            ));
        }

        log::debug!("[bind] rndc reload {domain} ok");
        Ok(())
    }

    fn to_rrset(rrset: &ZoneRrset, origin: &str) -> Rrset {
        Rrset {
            name: rrset.name.clone(),
            subname: relative_name(&rrset.name, origin),
            record_type: rrset.record_type.clone(),
            ttl: rrset.ttl,
            records: rrset.values.clone(),
        }
    }

    fn to_domain(name: &str, minimum_ttl: Option<u32>) -> ProviderDomain {
        ProviderDomain {
            name: name.to_string(),
            provider: ProviderType::Bind,
            minimum_ttl,
            created_at: None,
        }
    }
}

#[async_trait]
impl DnsProvider for BindProvider {
    fn provider_type(&self) -> ProviderType {
        ProviderType::Bind
    }

    fn metadata() -> ProviderMetadata {
        let mut fields = vec![
            ProviderCredentialField::new("bind_zone_dir", "Zone directory", FieldType::Text, true),
            ProviderCredentialField::new("bind_rndc", "rndc binary", FieldType::Text, false),
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
            id: ProviderType::Bind,
            name: "Bind".to_string(),
            description: "BIND zone files on local disk".to_string(),
            required_fields: fields,
            mx_priority: MxPriorityStyle::Embedded,
            features: ProviderFeatures {
                bulk_rrsets: false,
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
        let path = self.zone_path(&domain)?;

        let zone = ZoneFile::new(
            &zone_fqdn(&domain),
            &self.nameservers,
            Utc::now().date_naive(),
        );

        // create_new fails with AlreadyExists, mapped to ZoneExists
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| self.io_error(&e, ErrorContext::domain(&domain)))?;
        let installed = async {
            file.write_all(zone.render().as_bytes())
                .await
                .map_err(|e| self.io_error(&e, ErrorContext::domain(&domain)))?;
            file.flush()
                .await
                .map_err(|e| self.io_error(&e, ErrorContext::domain(&domain)))?;
            drop(file);
            self.reload(&domain).await
        }
        .await;

        // no file is left behind for a zone the server never loaded
        if let Err(err) = installed {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                log::warn!(
                    "[bind] Failed to remove {} after failed create: {e}",
                    path.display()
                );
            }
            return Err(err);
        }

        log::info!("[bind] Zone {domain} created at {}", path.display());
        Ok(())
    }

    async fn delete_zone(&self, domain: &str) -> Result<()> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        let path = self.zone_path(&domain)?;

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| self.io_error(&e, ErrorContext::domain(&domain)))?;

        log::info!("[bind] Zone {domain} deleted");
        Ok(())
    }

    async fn create_rrset(&self, domain: &str, req: &CreateRrsetRequest) -> Result<()> {
        require_domain(self, domain)?;
        let new_value = require_value(self, &req.values)?;
        let domain = normalize_domain_name(domain);

        let mut zone = self.load_zone(&domain).await?;
        let name = canonicalize(&req.host, &domain);
        let merged = merge_values(&req.existing_values, new_value);
        let count = merged.len();
        zone.replace(&name, req.record_type.as_str(), req.ttl, merged);
        self.save_zone(&domain, &mut zone).await?;

        log::info!(
            "[bind] {name} {} replaced with {count} value(s)",
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

        let mut zone = self.load_zone(&domain).await?;
        let name = canonicalize(host, &domain);
        zone.replace(&name, record_type.as_str(), req.ttl, vec![value.to_string()]);
        self.save_zone(&domain, &mut zone).await?;

        log::info!("[bind] {name} {record_type} set to a single value");
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

        let mut zone = self.load_zone(&domain).await?;
        let name = canonicalize(host, &domain);
        if !zone.remove(&name, record_type.as_str()) {
            return Err(ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record: format!("{name} {record_type}"),
                raw_message: None,
            });
        }
        self.save_zone(&domain, &mut zone).await?;

        log::info!("[bind] {name} {record_type} deleted");
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<ProviderDomain>> {
        let mut entries = tokio::fs::read_dir(&self.zone_dir)
            .await
            .map_err(|e| self.io_error(&e, ErrorContext::default()))?;

        let mut domains = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| self.io_error(&e, ErrorContext::default()))?
        {
            let file_name = entry.file_name();
            if let Some(name) = file_name
                .to_str()
                .and_then(|n| n.strip_suffix(ZONE_FILE_SUFFIX))
            {
                domains.push(Self::to_domain(name, None));
            }
        }
        domains.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(domains)
    }

    async fn get_domain(&self, domain: &str) -> Result<ProviderDomain> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        let zone = self.load_zone(&domain).await?;
        Ok(Self::to_domain(&domain, Some(zone.soa.minimum)))
    }

    async fn export_zonefile(&self, domain: &str) -> Result<String> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        Ok(self.load_zone(&domain).await?.render())
    }

    async fn retrieve_all_rrsets(&self, domain: &str) -> Result<Vec<Rrset>> {
        require_domain(self, domain)?;
        let domain = normalize_domain_name(domain);
        let zone = self.load_zone(&domain).await?;
        Ok(zone
            .rrsets
            .iter()
            .map(|r| Self::to_rrset(r, &zone.origin))
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
        let zone = self.load_zone(&domain).await?;
        let name = canonicalize(host, &domain);

        zone.find(&name, record_type.as_str())
            .map(|r| Self::to_rrset(r, &zone.origin))
            .ok_or_else(|| ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record: format!("{name} {record_type}"),
                raw_message: None,
            })
    }
}
