//! DNS 记录管理服务

use std::sync::Arc;

use servicedns_provider::{CreateRrsetRequest, ModifyRrsetRequest, RecordType, embed_priority};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::services::record_guard::{check_conflict, check_duplicate, records_at_host};
use crate::types::{NewRecord, Record, RecordRequest, Zone};

/// TTL used when the caller sends none
pub const DEFAULT_TTL: u32 = 3600;

/// DNS 记录管理服务
///
/// Every mutation validates locally, then calls the provider, then writes the
/// local row. A provider failure leaves local state unchanged.
pub struct RecordService {
    ctx: Arc<ServiceContext>,
}

impl RecordService {
    /// 创建记录服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 添加 DNS 记录
    ///
    /// The provider receives the values already stored for (host, type) so
    /// whole-set providers can send the merged set.
    pub async fn add_record(&self, req: &RecordRequest) -> CoreResult<Record> {
        let record_type = RecordType::resolve(req.record_type.trim())?;
        let value = require_value(req)?;
        let host = req.record_name.trim();

        let zone = self.ctx.zone_for_order(req.order_id, req.client_id).await?;
        let provider = self.ctx.get_provider(&zone)?;
        let style = provider.mx_priority_style();
        let ttl = req.record_ttl.unwrap_or(DEFAULT_TTL);
        let priority = if record_type.has_priority() {
            req.record_priority.unwrap_or(0)
        } else {
            0
        };

        let _guard = self.ctx.lock_zone(zone.id).await;
        let records = self.ctx.zone_repository.list_records(zone.id).await?;
        let at_host = records_at_host(&zone.domain_name, host, &records);
        check_conflict(&zone.domain_name, host, record_type, &at_host)?;
        check_duplicate(&zone.domain_name, host, record_type, value, &at_host)?;

        let existing_values = at_host
            .iter()
            .filter(|r| r.record_type == record_type)
            .map(|r| style.fold(record_type, Some(r.priority), &r.value).0)
            .collect();
        let (wire_value, wire_priority) = style.fold(record_type, Some(priority), value);
        let request = CreateRrsetRequest {
            host: host.to_string(),
            record_type,
            ttl,
            values: vec![wire_value],
            priority: wire_priority,
            existing_values,
        };

        if let Err(e) = provider.create_rrset(&zone.domain_name, &request).await {
            return Err(self.ctx.provider_failure("create_rrset", &zone, e));
        }

        let record = self
            .ctx
            .zone_repository
            .insert_record(NewRecord {
                zone_id: zone.id,
                record_type,
                host: host.to_string(),
                value: value.to_string(),
                ttl,
                priority,
            })
            .await?;
        self.ctx.zone_repository.touch_zone(zone.id).await?;

        log::info!(
            "Record #{} {host} {record_type} {value} added to {}",
            record.id,
            zone.domain_name
        );
        Ok(record)
    }

    /// 更新 DNS 记录
    ///
    /// The record keeps its host and type; only value, TTL and priority change.
    pub async fn update_record(&self, req: &RecordRequest) -> CoreResult<Record> {
        let record_id = require_record_id(req)?;
        let requested_type = requested_type(req)?;
        let value = require_value(req)?;

        let zone = self.ctx.zone_for_order(req.order_id, req.client_id).await?;
        let provider = self.ctx.get_provider(&zone)?;
        let style = provider.mx_priority_style();

        let _guard = self.ctx.lock_zone(zone.id).await;
        let record = self.record_in_zone(&zone, record_id).await?;
        if requested_type.is_some_and(|t| t != record.record_type) {
            log::warn!(
                "Record #{record_id} is {}, ignoring requested type {}",
                record.record_type,
                req.record_type
            );
        }

        let ttl = req.record_ttl.unwrap_or(record.ttl);
        let priority = if record.record_type.has_priority() {
            req.record_priority.unwrap_or(record.priority)
        } else {
            0
        };

        if value != record.value {
            let records = self.ctx.zone_repository.list_records(zone.id).await?;
            let siblings: Vec<&Record> = records_at_host(&zone.domain_name, &record.host, &records)
                .into_iter()
                .filter(|r| r.id != record.id)
                .collect();
            check_duplicate(
                &zone.domain_name,
                &record.host,
                record.record_type,
                value,
                &siblings,
            )?;
        }

        let (wire_value, wire_priority) = style.fold(record.record_type, Some(priority), value);
        let (current_value, _) =
            style.fold(record.record_type, Some(record.priority), &record.value);
        let request = ModifyRrsetRequest {
            ttl,
            values: vec![wire_value],
            priority: wire_priority,
            current_value: Some(current_value),
        };
        if let Err(e) = provider
            .modify_rrset(&zone.domain_name, &record.host, record.record_type, &request)
            .await
        {
            return Err(self.ctx.provider_failure("modify_rrset", &zone, e));
        }

        let updated = self
            .ctx
            .zone_repository
            .update_record(record.id, value.to_string(), ttl, priority)
            .await?;

        log::info!(
            "Record #{} {} {} updated on {}",
            updated.id,
            updated.host,
            updated.record_type,
            zone.domain_name
        );
        Ok(updated)
    }

    /// 删除 DNS 记录
    ///
    /// MX records are addressed with their combined `"<priority> <value>"`.
    pub async fn del_record(&self, req: &RecordRequest) -> CoreResult<()> {
        let record_id = require_record_id(req)?;
        requested_type(req)?;

        let zone = self.ctx.zone_for_order(req.order_id, req.client_id).await?;
        let provider = self.ctx.get_provider(&zone)?;

        let _guard = self.ctx.lock_zone(zone.id).await;
        let record = self.record_in_zone(&zone, record_id).await?;
        let value = if record.record_type.has_priority() {
            embed_priority(Some(record.priority), &record.value)
        } else {
            record.value.clone()
        };

        if let Err(e) = provider
            .delete_rrset(&zone.domain_name, &record.host, record.record_type, &value)
            .await
        {
            return Err(self.ctx.provider_failure("delete_rrset", &zone, e));
        }

        self.ctx.zone_repository.delete_record(record.id).await?;
        self.ctx.zone_repository.touch_zone(zone.id).await?;

        log::info!(
            "Record #{} {} {} removed from {}",
            record.id,
            record.host,
            record.record_type,
            zone.domain_name
        );
        Ok(())
    }

    async fn record_in_zone(&self, zone: &Zone, record_id: i64) -> CoreResult<Record> {
        self.ctx
            .zone_repository
            .find_record(record_id)
            .await?
            .filter(|r| r.zone_id == zone.id)
            .ok_or_else(|| CoreError::RecordNotFound(format!("#{record_id} in {}", zone.domain_name)))
    }
}

fn require_value(req: &RecordRequest) -> CoreResult<&str> {
    let value = req.record_value.trim();
    if value.is_empty() {
        return Err(CoreError::MissingField("record_value".to_string()));
    }
    Ok(value)
}

fn require_record_id(req: &RecordRequest) -> CoreResult<i64> {
    req.record_id
        .ok_or_else(|| CoreError::MissingField("record_id".to_string()))
}

/// Type named by the request, if any; unknown tags still fail.
fn requested_type(req: &RecordRequest) -> CoreResult<Option<RecordType>> {
    let tag = req.record_type.trim();
    if tag.is_empty() {
        return Ok(None);
    }
    Ok(Some(RecordType::resolve(tag)?))
}
