//! Process configuration read from environment variables.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use validator::Validate;

use crate::domain::{ConfigError, ExchangeRates};
use crate::infra::{LogFormat, PostgresConfig};

/// Connection settings for the relational store.
#[derive(Debug, Clone, Validate)]
pub struct DatabaseSettings {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub user: String,
    pub password: SecretString,
    #[validate(range(min = 1, max = 100))]
    pub max_connections: u32,
}

impl DatabaseSettings {
    /// Connection options for sqlx; the password never leaves the secret wrapper as a string.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(self.password.expose_secret())
    }

    #[must_use]
    pub fn pool_config(&self) -> PostgresConfig {
        PostgresConfig {
            max_connections: self.max_connections,
            ..PostgresConfig::default()
        }
    }
}

/// Everything the binary needs to start.
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub database: DatabaseSettings,
    #[validate(range(min = 1))]
    pub listen_port: u16,
    pub exchange_rates: Arc<ExchangeRates>,
    pub metrics_addr: Option<SocketAddr>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `DB_PASSWORD` is missing or any value fails to parse or validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup, used by `from_env` and tests.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = DatabaseSettings {
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(&lookup, "DB_PORT", 5432)?,
            name: lookup("DB_NAME").unwrap_or_else(|| "sd_reactive".to_string()),
            user: lookup("DB_USER").unwrap_or_else(|| "sd_lab".to_string()),
            password: lookup("DB_PASSWORD")
                .map(SecretString::from)
                .ok_or_else(|| ConfigError::MissingEnvVar("DB_PASSWORD".to_string()))?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
        };

        let exchange_rates = match lookup("EXCHANGE_RATES") {
            Some(table) => ExchangeRates::parse(&table)?,
            None => ExchangeRates::default(),
        };

        let metrics_addr = lookup("METRICS_ADDR")
            .map(|raw| parse_value("METRICS_ADDR", &raw))
            .transpose()?;

        let config = Self {
            database,
            listen_port: parse_or(&lookup, "PORT", 8080)?,
            exchange_rates: Arc::new(exchange_rates),
            metrics_addr,
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Text)?,
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}
