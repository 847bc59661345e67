//! Zone 生命周期服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{NewZone, Order, OrderConfig, Zone, ZoneApiView, ZoneEvent, ZoneStatus};

/// Zone 生命周期服务
///
/// Driven by the billing side: one zone per order. Only activation and
/// deletion reach the provider; the other events are local bookkeeping and
/// the zone keeps resolving.
pub struct ZoneService {
    ctx: Arc<ServiceContext>,
}

impl ZoneService {
    /// 创建 Zone 服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Allocate a `Pending` zone from the order configuration.
    ///
    /// The provider name is checked but the provider is not contacted.
    pub async fn create(&self, order: &Order) -> CoreResult<Zone> {
        let config = OrderConfig::parse(&order.config)?;
        let domain_name = config.domain_name.trim().trim_end_matches('.').to_string();
        if domain_name.is_empty() {
            return Err(CoreError::EmptyInput("domain_name".to_string()));
        }
        config.provider_type()?;

        let zone = self
            .ctx
            .zone_repository
            .insert_zone(NewZone {
                client_id: order.client_id,
                order_id: order.id,
                domain_name,
                config,
            })
            .await?;

        log::info!(
            "Zone #{} {} allocated for order #{} ({})",
            zone.id,
            zone.domain_name,
            order.id,
            zone.config.provider
        );
        Ok(zone)
    }

    /// Create the zone at the provider and mark it `Active`.
    ///
    /// On failure the zone stays `Pending`.
    pub async fn activate(&self, order: &Order, zone_id: i64) -> CoreResult<Zone> {
        let (zone, next) = self.transition(order, zone_id, ZoneEvent::Activate).await?;
        let provider = self.ctx.get_provider(&zone)?;

        if let Err(e) = provider.create_zone(&zone.domain_name).await {
            return Err(self.ctx.provider_failure("create_zone", &zone, e));
        }

        let zone = self
            .ctx
            .zone_repository
            .update_zone_status(zone.id, next)
            .await?;
        log::info!("Zone {} activated at {}", zone.domain_name, zone.config.provider);
        Ok(zone)
    }

    pub async fn suspend(&self, order: &Order, zone_id: i64) -> CoreResult<Zone> {
        self.apply_locally(order, zone_id, ZoneEvent::Suspend).await
    }

    pub async fn unsuspend(&self, order: &Order, zone_id: i64) -> CoreResult<Zone> {
        self.apply_locally(order, zone_id, ZoneEvent::Unsuspend).await
    }

    pub async fn cancel(&self, order: &Order, zone_id: i64) -> CoreResult<Zone> {
        self.apply_locally(order, zone_id, ZoneEvent::Cancel).await
    }

    pub async fn uncancel(&self, order: &Order, zone_id: i64) -> CoreResult<Zone> {
        self.apply_locally(order, zone_id, ZoneEvent::Uncancel).await
    }

    /// Delete the zone at the provider, then locally with its records.
    ///
    /// A zone the provider no longer knows is removed locally anyway; any
    /// other provider failure leaves the local rows untouched.
    pub async fn delete(&self, order: &Order, zone_id: i64) -> CoreResult<()> {
        let (zone, _) = self.transition(order, zone_id, ZoneEvent::Delete).await?;
        let provider = self.ctx.get_provider(&zone)?;

        let guard = self.ctx.lock_zone(zone.id).await;
        match provider.delete_zone(&zone.domain_name).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                log::warn!(
                    "Zone {} already absent at {}, removing local rows: {e}",
                    zone.domain_name,
                    zone.config.provider
                );
            }
            Err(e) => return Err(self.ctx.provider_failure("delete_zone", &zone, e)),
        }

        self.ctx.zone_repository.delete_zone(zone.id).await?;
        drop(guard);
        self.ctx.forget_zone(zone.id).await;

        log::info!("Zone #{} {} deleted", zone.id, zone.domain_name);
        Ok(())
    }

    /// Zone with its records, as handed back to the billing side.
    pub async fn to_api_view(&self, zone_id: i64) -> CoreResult<ZoneApiView> {
        let zone = self
            .ctx
            .zone_repository
            .find_zone(zone_id)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(format!("zone #{zone_id}")))?;
        let records = self.ctx.zone_repository.list_records(zone.id).await?;

        Ok(ZoneApiView {
            id: zone.id,
            created_at: zone.created_at,
            updated_at: zone.updated_at,
            domain_name: zone.domain_name,
            records: records.iter().map(Into::into).collect(),
            config: zone.config,
        })
    }

    /// The order's zone and the status `event` leads to.
    async fn transition(
        &self,
        order: &Order,
        zone_id: i64,
        event: ZoneEvent,
    ) -> CoreResult<(Zone, ZoneStatus)> {
        let zone = self.ctx.zone_of_order(order, zone_id).await?;
        let next = zone
            .status
            .next(event)
            .ok_or(CoreError::InvalidTransition {
                from: zone.status,
                event,
            })?;
        Ok((zone, next))
    }

    async fn apply_locally(&self, order: &Order, zone_id: i64, event: ZoneEvent) -> CoreResult<Zone> {
        let (zone, next) = self.transition(order, zone_id, event).await?;
        let zone = self
            .ctx
            .zone_repository
            .update_zone_status(zone.id, next)
            .await?;
        log::info!("Zone {} {event}: now {next}", zone.domain_name);
        Ok(zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        CLIENT_ID, ORDER_ID, ProviderCall, create_test_env, network_down, not_found, order,
    };
    use crate::traits::ZoneRepository;
    use crate::types::{MxPriorityStyle, NewRecord, RecordType};

    async fn setup() -> (crate::test_utils::TestEnv, ZoneService, Order) {
        let env = create_test_env(MxPriorityStyle::Embedded);
        let order = order(ORDER_ID, "example.com");
        env.orders.put(order.clone()).await;
        let service = ZoneService::new(env.ctx.clone());
        (env, service, order)
    }

    #[tokio::test]
    async fn test_create_allocates_pending_zone() {
        let (env, service, order) = setup().await;

        let zone = service.create(&order).await.unwrap();

        assert_eq!(zone.status, ZoneStatus::Pending);
        assert_eq!(zone.domain_name, "example.com");
        assert_eq!(zone.client_id, CLIENT_ID);
        assert!(env.provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_provider() {
        let (env, service, mut order) = setup().await;
        order.config = r#"{"provider":"Route53","domain_name":"example.com"}"#.to_string();

        let result = service.create(&order).await;

        assert!(matches!(result, Err(CoreError::UnknownProvider(ref p)) if p == "Route53"));
        assert!(env.zones.find_zone_by_order(ORDER_ID).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_empty_domain() {
        let (_env, service, mut order) = setup().await;
        order.config = r#"{"provider":"PowerDNS","domain_name":"  "}"#.to_string();

        let result = service.create(&order).await;

        assert!(matches!(result, Err(CoreError::EmptyInput(_))));
    }

    #[tokio::test]
    async fn test_create_same_domain_twice() {
        let (_env, service, order_a) = setup().await;
        service.create(&order_a).await.unwrap();

        let order_b = crate::test_utils::order(ORDER_ID + 1, "EXAMPLE.com.");
        let result = service.create(&order_b).await;

        assert!(matches!(result, Err(CoreError::ZoneExists(_))));
    }

    #[tokio::test]
    async fn test_activate_creates_remote_zone() {
        let (env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();

        let zone = service.activate(&order, zone.id).await.unwrap();

        assert_eq!(zone.status, ZoneStatus::Active);
        assert_eq!(
            env.provider.calls().await,
            vec![ProviderCall::CreateZone("example.com".to_string())]
        );
    }

    #[tokio::test]
    async fn test_activate_failure_stays_pending() {
        let (env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();
        env.provider.fail_next("create_zone", network_down()).await;

        let result = service.activate(&order, zone.id).await;

        assert!(matches!(result, Err(CoreError::Provider(_))));
        let stored = env.zones.find_zone(zone.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ZoneStatus::Pending);
    }

    #[tokio::test]
    async fn test_activate_twice_rejected() {
        let (_env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();
        service.activate(&order, zone.id).await.unwrap();

        let result = service.activate(&order, zone.id).await;

        assert!(matches!(
            result,
            Err(CoreError::InvalidTransition {
                from: ZoneStatus::Active,
                event: ZoneEvent::Activate
            })
        ));
    }

    #[tokio::test]
    async fn test_suspend_cycle_is_local() {
        let (env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();
        service.activate(&order, zone.id).await.unwrap();

        let zone = service.suspend(&order, zone.id).await.unwrap();
        assert_eq!(zone.status, ZoneStatus::Suspended);
        let zone = service.unsuspend(&order, zone.id).await.unwrap();
        assert_eq!(zone.status, ZoneStatus::Active);
        let zone = service.cancel(&order, zone.id).await.unwrap();
        assert_eq!(zone.status, ZoneStatus::Cancelled);
        let zone = service.uncancel(&order, zone.id).await.unwrap();
        assert_eq!(zone.status, ZoneStatus::Active);

        // only the activation reached the provider
        assert_eq!(env.provider.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_suspend_pending_rejected() {
        let (_env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();

        let result = service.suspend(&order, zone.id).await;

        assert!(matches!(result, Err(CoreError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_delete_tolerates_absent_remote_zone() {
        let (env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();
        service.activate(&order, zone.id).await.unwrap();
        env.zones
            .insert_record(NewRecord {
                zone_id: zone.id,
                record_type: RecordType::A,
                host: "www".to_string(),
                value: "203.0.113.5".to_string(),
                ttl: 3600,
                priority: 0,
            })
            .await
            .unwrap();
        env.provider
            .fail_next("delete_zone", not_found("example.com"))
            .await;

        service.delete(&order, zone.id).await.unwrap();

        assert!(env.zones.find_zone(zone.id).await.unwrap().is_none());
        assert!(env.zones.list_records(zone.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_remote_failure_keeps_zone() {
        let (env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();
        service.activate(&order, zone.id).await.unwrap();
        env.provider.fail_next("delete_zone", network_down()).await;

        let result = service.delete(&order, zone.id).await;

        assert!(matches!(result, Err(CoreError::Provider(_))));
        assert!(env.zones.find_zone(zone.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_calls_provider() {
        let (env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();
        service.activate(&order, zone.id).await.unwrap();

        service.delete(&order, zone.id).await.unwrap();

        assert_eq!(
            env.provider.calls().await.last(),
            Some(&ProviderCall::DeleteZone("example.com".to_string()))
        );
    }

    #[tokio::test]
    async fn test_zone_of_other_order_hidden() {
        let (_env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();
        let other = crate::test_utils::order(ORDER_ID + 1, "example.org");

        let result = service.suspend(&other, zone.id).await;

        assert!(matches!(result, Err(CoreError::DomainNotFound(_))));
    }

    #[tokio::test]
    async fn test_api_view_lists_records() {
        let (env, service, order) = setup().await;
        let zone = service.create(&order).await.unwrap();
        env.zones
            .insert_record(NewRecord {
                zone_id: zone.id,
                record_type: RecordType::Mx,
                host: "@".to_string(),
                value: "mail.example.com.".to_string(),
                ttl: 3600,
                priority: 10,
            })
            .await
            .unwrap();

        let view = service.to_api_view(zone.id).await.unwrap();
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["domain_name"], "example.com");
        assert_eq!(json["records"][0]["type"], "MX");
        assert_eq!(json["records"][0]["priority"], 10);
        assert_eq!(json["config"]["provider"], "PowerDNS");
    }
}
