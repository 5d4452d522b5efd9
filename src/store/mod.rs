pub mod firestore;
pub mod value;

use async_trait::async_trait;

use crate::models::order::{NewOrder, Order};

pub use firestore::FirestoreStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to save order: {0}")]
    Write(#[source] anyhow::Error),

    #[error("failed to fetch orders: {0}")]
    Read(#[source] anyhow::Error),
}

/// Persistence for orders. Orders are only ever created and read back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist the order with a creation timestamp and return its id.
    async fn save(&self, order: &NewOrder) -> Result<String, StoreError>;

    /// Every stored order whose `phone` equals `phone` exactly.
    async fn find_by_phone(&self, phone: &str) -> Result<Vec<Order>, StoreError>;
}
