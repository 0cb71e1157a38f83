//! Domain traits defining contracts for the relational store.

use async_trait::async_trait;

use super::error::AppError;
use super::types::{Item, ItemId, NewItem, User, UserId};

/// Persistence operations on the `users` relation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Check store connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Insert a user and return the generated id
    async fn insert_user(&self, currency: &str) -> Result<UserId, AppError>;

    /// Fetch a user by id
    async fn find_user(&self, id: UserId) -> Result<Option<User>, AppError>;
}

/// Persistence operations on the `items` relation.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert an item and return the generated id
    async fn insert_item(&self, item: &NewItem) -> Result<ItemId, AppError>;

    /// Fetch every item in the store's natural row order
    async fn list_items(&self) -> Result<Vec<Item>, AppError>;
}
