//! Price List Service
//!
//! An HTTP service that registers users with a display currency, stores
//! items priced in a base currency, and lists every item converted into a
//! given user's currency.
//!
//! # Architecture Overview
//!
//! This crate is organized into four main layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │      Routing, handlers, error mapping        │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │  Request pipelines: validate, query, convert │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │ Types, rates, parameter checks, traits, errors│
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │    PostgreSQL adapter, logging, metrics      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # HTTP surface
//!
//! - `PUT /user?currency=<code>` returns the new user id
//! - `PUT /item?name=<string>&price=<decimal>` returns the new item id
//! - `GET /list?userId=<int>` returns `name: price` lines in the user's currency
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use price_list_service::api::create_router;
//! use price_list_service::app::AppState;
//! use price_list_service::config::AppConfig;
//! use price_list_service::infra::PostgresClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let db = Arc::new(PostgresClient::with_defaults(config.database.connect_options()).await?);
//!
//!     let state = Arc::new(AppState::new(db.clone(), db, config.exchange_rates.clone()));
//!
//!     let router = create_router(state);
//!     axum::serve(listener, router).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
