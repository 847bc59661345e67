//! `ServiceDNS` Core Library
//!
//! Zone and record orchestration on top of `servicedns-provider`:
//! - Zone lifecycle driven by billing orders ([`ZoneService`])
//! - DNS record management with CNAME/duplicate guards ([`RecordService`])
//!
//! Storage is abstracted through [`ZoneRepository`] and [`OrderRepository`];
//! providers are built through a [`ProviderRegistry`]. Every mutation calls the
//! provider first and only writes local rows once the provider succeeded.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use servicedns_core::{
//!     InMemoryOrderStore, InMemoryZoneStore, ProviderRegistry, RecordService, ServiceContext,
//!     ZoneService,
//! };
//! use servicedns_core::types::{Order, RecordRequest};
//!
//! # async fn example() -> servicedns_core::CoreResult<()> {
//! let orders = Arc::new(InMemoryOrderStore::new());
//! let order = Order {
//!     id: 1,
//!     client_id: 42,
//!     config: r#"{"provider":"PowerDNS","domain_name":"example.com","apikey":"secret","ns1":"ns1.example.net"}"#.to_string(),
//! };
//! orders.put(order.clone()).await;
//!
//! let ctx = Arc::new(ServiceContext::new(
//!     Arc::new(InMemoryZoneStore::new()),
//!     orders,
//!     Arc::new(ProviderRegistry::with_builtin_providers()),
//! ));
//!
//! let zones = ZoneService::new(ctx.clone());
//! let zone = zones.create(&order).await?;
//! zones.activate(&order, zone.id).await?;
//!
//! let records = RecordService::new(ctx);
//! records
//!     .add_record(&RecordRequest {
//!         order_id: order.id,
//!         record_name: "www".to_string(),
//!         record_type: "A".to_string(),
//!         record_value: "203.0.113.5".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{RecordService, ServiceContext, ZoneService};
pub use traits::{
    InMemoryOrderStore, InMemoryZoneStore, OrderRepository, ProviderFactory, ProviderRegistry,
    ZoneRepository,
};
