//! Order access abstract Trait

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::Order;

/// Read-only access to billing orders
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_order(&self, id: i64) -> CoreResult<Option<Order>>;
}

/// In-memory order store
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<i64, Order>>>,
}

impl InMemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an order.
    pub async fn put(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderStore {
    async fn find_order(&self, id: i64) -> CoreResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }
}
