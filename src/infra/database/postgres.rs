//! PostgreSQL database client implementation.
//!
//! Expects the following relations to exist:
//!
//! ```sql
//! CREATE TABLE users (id SERIAL PRIMARY KEY, currency TEXT NOT NULL);
//! CREATE TABLE items (id SERIAL PRIMARY KEY, name TEXT NOT NULL, price NUMERIC NOT NULL);
//! ```

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{
    PgPool, Row,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::time::Duration;
use tracing::{info, instrument};

use crate::domain::{
    AppError, DatabaseError, Item, ItemId, ItemRepository, NewItem, User, UserId, UserRepository,
};

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// PostgreSQL client with connection pooling
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client with custom configuration
    pub async fn new(options: PgConnectOptions, config: PostgresConfig) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections.min(config.max_connections))
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client with default configuration
    pub async fn with_defaults(options: PgConnectOptions) -> Result<Self, AppError> {
        Self::new(options, PostgresConfig::default()).await
    }

    /// Get the underlying connection pool (for testing)
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_item(row: &sqlx::postgres::PgRow) -> Result<Item, AppError> {
        Ok(Item {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get::<Decimal, _>("price")?,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn insert_user(&self, currency: &str) -> Result<UserId, AppError> {
        let row = sqlx::query("INSERT INTO users (currency) VALUES ($1) RETURNING id")
            .bind(currency)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("id")?)
    }

    #[instrument(skip(self))]
    async fn find_user(&self, id: UserId) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, currency FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok::<_, AppError>(User {
                id: row.try_get("id")?,
                currency: row.try_get("currency")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl ItemRepository for PostgresClient {
    #[instrument(skip(self, item), fields(item_name = %item.name))]
    async fn insert_item(&self, item: &NewItem) -> Result<ItemId, AppError> {
        let row = sqlx::query("INSERT INTO items (name, price) VALUES ($1, $2) RETURNING id")
            .bind(&item.name)
            .bind(item.price)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("id")?)
    }

    #[instrument(skip(self))]
    async fn list_items(&self) -> Result<Vec<Item>, AppError> {
        let rows = sqlx::query("SELECT id, name, price FROM items")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_item).collect()
    }
}
