//! Zone / record persistence abstract Trait

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use servicedns_provider::canonicalize;

use crate::error::{CoreError, CoreResult};
use crate::types::{NewRecord, NewZone, Record, Zone, ZoneStatus};

/// Zone and record storage
///
/// Implementations must keep `domain_name` unique across zones, keep
/// (zone, host, type, value) unique across records and delete a zone's records
/// together with the zone.
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    /// Insert a zone in `Pending` status.
    ///
    /// Fails with `ZoneExists` if the domain name is taken.
    async fn insert_zone(&self, zone: NewZone) -> CoreResult<Zone>;

    async fn find_zone(&self, id: i64) -> CoreResult<Option<Zone>>;

    async fn find_zone_by_order(&self, order_id: i64) -> CoreResult<Option<Zone>>;

    /// Set the status and bump `updated_at`.
    async fn update_zone_status(&self, id: i64, status: ZoneStatus) -> CoreResult<Zone>;

    /// Bump `updated_at`.
    async fn touch_zone(&self, id: i64) -> CoreResult<()>;

    /// Delete a zone and all its records.
    async fn delete_zone(&self, id: i64) -> CoreResult<()>;

    /// Records of a zone, in insertion order.
    async fn list_records(&self, zone_id: i64) -> CoreResult<Vec<Record>>;

    async fn find_record(&self, id: i64) -> CoreResult<Option<Record>>;

    /// Fails with `DuplicateRecord` on a (zone, host, type, value) repeat.
    async fn insert_record(&self, record: NewRecord) -> CoreResult<Record>;

    /// Replace value, TTL and priority and bump `updated_at`.
    async fn update_record(
        &self,
        id: i64,
        value: String,
        ttl: u32,
        priority: u16,
    ) -> CoreResult<Record>;

    async fn delete_record(&self, id: i64) -> CoreResult<()>;
}

#[derive(Default)]
struct ZoneTables {
    zones: BTreeMap<i64, Zone>,
    records: BTreeMap<i64, Record>,
    last_zone_id: i64,
    last_record_id: i64,
}

/// In-memory zone store
///
/// Default implementation, used by tests and embedders without a database.
#[derive(Clone, Default)]
pub struct InMemoryZoneStore {
    tables: Arc<RwLock<ZoneTables>>,
}

impl InMemoryZoneStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn zone_not_found(id: i64) -> CoreError {
    CoreError::DomainNotFound(format!("zone #{id}"))
}

fn record_not_found(id: i64) -> CoreError {
    CoreError::RecordNotFound(format!("record #{id}"))
}

#[async_trait]
impl ZoneRepository for InMemoryZoneStore {
    async fn insert_zone(&self, zone: NewZone) -> CoreResult<Zone> {
        let mut tables = self.tables.write().await;
        if tables
            .zones
            .values()
            .any(|z| z.domain_name.eq_ignore_ascii_case(&zone.domain_name))
        {
            return Err(CoreError::ZoneExists(zone.domain_name));
        }

        tables.last_zone_id += 1;
        let now = Utc::now();
        let row = Zone {
            id: tables.last_zone_id,
            client_id: zone.client_id,
            order_id: zone.order_id,
            domain_name: zone.domain_name,
            config: zone.config,
            status: ZoneStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables.zones.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_zone(&self, id: i64) -> CoreResult<Option<Zone>> {
        Ok(self.tables.read().await.zones.get(&id).cloned())
    }

    async fn find_zone_by_order(&self, order_id: i64) -> CoreResult<Option<Zone>> {
        Ok(self
            .tables
            .read()
            .await
            .zones
            .values()
            .find(|z| z.order_id == order_id)
            .cloned())
    }

    async fn update_zone_status(&self, id: i64, status: ZoneStatus) -> CoreResult<Zone> {
        let mut tables = self.tables.write().await;
        let zone = tables.zones.get_mut(&id).ok_or_else(|| zone_not_found(id))?;
        zone.status = status;
        zone.updated_at = Utc::now();
        Ok(zone.clone())
    }

    async fn touch_zone(&self, id: i64) -> CoreResult<()> {
        let mut tables = self.tables.write().await;
        let zone = tables.zones.get_mut(&id).ok_or_else(|| zone_not_found(id))?;
        zone.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_zone(&self, id: i64) -> CoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.zones.remove(&id).ok_or_else(|| zone_not_found(id))?;
        tables.records.retain(|_, r| r.zone_id != id);
        Ok(())
    }

    async fn list_records(&self, zone_id: i64) -> CoreResult<Vec<Record>> {
        Ok(self
            .tables
            .read()
            .await
            .records
            .values()
            .filter(|r| r.zone_id == zone_id)
            .cloned()
            .collect())
    }

    async fn find_record(&self, id: i64) -> CoreResult<Option<Record>> {
        Ok(self.tables.read().await.records.get(&id).cloned())
    }

    async fn insert_record(&self, record: NewRecord) -> CoreResult<Record> {
        let mut tables = self.tables.write().await;
        let domain = tables
            .zones
            .get(&record.zone_id)
            .map(|z| z.domain_name.clone())
            .ok_or_else(|| zone_not_found(record.zone_id))?;

        let name = canonicalize(&record.host, &domain);
        if tables.records.values().any(|r| {
            r.zone_id == record.zone_id
                && r.record_type == record.record_type
                && r.value == record.value
                && canonicalize(&r.host, &domain) == name
        }) {
            return Err(CoreError::DuplicateRecord {
                host: name,
                record_type: record.record_type.to_string(),
                value: record.value,
            });
        }

        tables.last_record_id += 1;
        let now = Utc::now();
        let row = Record {
            id: tables.last_record_id,
            zone_id: record.zone_id,
            record_type: record.record_type,
            host: record.host,
            value: record.value,
            ttl: record.ttl,
            priority: record.priority,
            created_at: now,
            updated_at: now,
        };
        tables.records.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_record(
        &self,
        id: i64,
        value: String,
        ttl: u32,
        priority: u16,
    ) -> CoreResult<Record> {
        let mut tables = self.tables.write().await;
        let record = tables
            .records
            .get_mut(&id)
            .ok_or_else(|| record_not_found(id))?;
        record.value = value;
        record.ttl = ttl;
        record.priority = priority;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_record(&self, id: i64) -> CoreResult<()> {
        self.tables
            .write()
            .await
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| record_not_found(id))
    }
}
