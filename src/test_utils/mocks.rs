//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of the repository traits
//! that can be configured to simulate success, failure and slow stores.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::{
    AppError, DatabaseError, Item, ItemId, ItemRepository, NewItem, User, UserId, UserRepository,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    items: Vec<Item>,
}

/// Mock store for testing.
///
/// Keeps both relations in insertion order, hands out ids starting at 1
/// per relation, and supports configurable failure modes.
///
/// # Example
///
/// ```
/// use price_list_service::test_utils::{MockDatabaseClient, mocks::MockConfig};
///
/// // Create a mock that succeeds
/// let mock = MockDatabaseClient::new();
///
/// // Create a mock that fails
/// let failing_mock = MockDatabaseClient::with_config(MockConfig::failure("DB error"));
/// ```
pub struct MockDatabaseClient {
    tables: Arc<Mutex<Tables>>,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
    failing: AtomicBool,
}

impl MockDatabaseClient {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        let failing = AtomicBool::new(config.should_fail);
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
            failing,
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any repository method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Switches failure mode on or off, e.g. after seeding data.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Gets all stored users.
    pub fn get_all_users(&self) -> Vec<User> {
        self.tables.lock().unwrap().users.clone()
    }

    /// Gets all stored items.
    pub fn get_all_items(&self) -> Vec<Item> {
        self.tables.lock().unwrap().items.clone()
    }

    /// Clears both relations.
    pub fn clear(&self) {
        let mut tables = self.tables.lock().unwrap();
        tables.users.clear();
        tables.items.clear();
    }

    async fn begin_call(&self) -> Result<(), AppError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(ms) = self.config.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if self.failing.load(Ordering::Relaxed) {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock database error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

fn next_id(len: usize) -> Result<i32, AppError> {
    i32::try_from(len + 1)
        .map_err(|_| AppError::Database(DatabaseError::Query("id sequence exhausted".to_string())))
}

#[async_trait]
impl UserRepository for MockDatabaseClient {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Database(DatabaseError::Connection(
                "Mock database unhealthy".to_string(),
            )));
        }
        self.begin_call().await
    }

    async fn insert_user(&self, currency: &str) -> Result<UserId, AppError> {
        self.begin_call().await?;

        let mut tables = self.tables.lock().unwrap();
        let id = next_id(tables.users.len())?;
        tables.users.push(User {
            id,
            currency: currency.to_string(),
        });
        Ok(id)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, AppError> {
        self.begin_call().await?;

        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl ItemRepository for MockDatabaseClient {
    async fn insert_item(&self, item: &NewItem) -> Result<ItemId, AppError> {
        self.begin_call().await?;

        let mut tables = self.tables.lock().unwrap();
        let id = next_id(tables.items.len())?;
        tables.items.push(Item {
            id,
            name: item.name.clone(),
            price: item.price,
        });
        Ok(id)
    }

    async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        self.begin_call().await?;

        Ok(self.tables.lock().unwrap().items.clone())
    }
}
