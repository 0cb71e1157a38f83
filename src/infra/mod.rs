//! Infrastructure layer implementations.

pub mod database;
pub mod observability;

pub use database::{PostgresClient, PostgresConfig};
pub use observability::{LogFormat, init_metrics, init_tracing};
