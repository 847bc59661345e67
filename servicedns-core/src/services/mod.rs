//! 业务逻辑服务层

mod record_guard;
mod record_service;
mod zone_service;

pub use record_guard::{check_conflict, check_duplicate, records_at_host};
pub use record_service::RecordService;
pub use zone_service::ZoneService;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use servicedns_provider::{DnsProvider, ProviderError};

use crate::error::{CoreError, CoreResult};
use crate::traits::{OrderRepository, ProviderRegistry, ZoneRepository};
use crate::types::{Order, Zone};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// Zone / 记录持久化仓库
    pub zone_repository: Arc<dyn ZoneRepository>,
    /// 订单仓库（只读）
    pub order_repository: Arc<dyn OrderRepository>,
    /// Provider 注册表
    pub provider_registry: Arc<ProviderRegistry>,
    /// One mutex per zone around read-merge-write sequences
    zone_locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        zone_repository: Arc<dyn ZoneRepository>,
        order_repository: Arc<dyn OrderRepository>,
        provider_registry: Arc<ProviderRegistry>,
    ) -> Self {
        Self {
            zone_repository,
            order_repository,
            provider_registry,
            zone_locks: Mutex::new(HashMap::new()),
        }
    }

    /// 获取 zone 配置对应的 Provider 实例
    pub fn get_provider(&self, zone: &Zone) -> CoreResult<Arc<dyn DnsProvider>> {
        self.provider_registry.create(&zone.config)
    }

    /// Hold the zone's mutex until the guard drops.
    pub async fn lock_zone(&self, zone_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.zone_locks.lock().await;
            Arc::clone(locks.entry(zone_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the mutex of a deleted zone.
    async fn forget_zone(&self, zone_id: i64) {
        self.zone_locks.lock().await.remove(&zone_id);
    }

    /// Zone `zone_id`, provided it belongs to `order`.
    pub async fn zone_of_order(&self, order: &Order, zone_id: i64) -> CoreResult<Zone> {
        self.zone_repository
            .find_zone(zone_id)
            .await?
            .filter(|z| z.order_id == order.id)
            .ok_or_else(|| CoreError::DomainNotFound(format!("zone #{zone_id}")))
    }

    /// Zone of an order, checking the caller owns the order.
    ///
    /// A foreign order is reported as missing so its existence is not revealed.
    pub async fn zone_for_order(&self, order_id: i64, client_id: Option<i64>) -> CoreResult<Zone> {
        let not_found = || CoreError::DomainNotFound(format!("order #{order_id}"));

        let order = self
            .order_repository
            .find_order(order_id)
            .await?
            .ok_or_else(not_found)?;
        if client_id.is_some_and(|c| c != order.client_id) {
            log::warn!(
                "Client {client_id:?} tried to reach order #{order_id} owned by {}",
                order.client_id
            );
            return Err(not_found());
        }

        self.zone_repository
            .find_zone_by_order(order_id)
            .await?
            .ok_or_else(not_found)
    }

    /// 记录并转换 Provider 错误
    pub(crate) fn provider_failure(&self, operation: &str, zone: &Zone, err: ProviderError) -> CoreError {
        if err.is_expected() {
            log::warn!("{operation} on {} failed: {err}", zone.domain_name);
        } else {
            log::error!("{operation} on {} failed: {err}", zone.domain_name);
        }
        err.into()
    }
}
