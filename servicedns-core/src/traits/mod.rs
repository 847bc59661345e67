//! Storage layer abstraction trait definition

mod order_repository;
mod provider_registry;
mod zone_repository;

pub use order_repository::{InMemoryOrderStore, OrderRepository};
pub use provider_registry::{ProviderFactory, ProviderRegistry};
pub use zone_repository::{InMemoryZoneStore, ZoneRepository};
