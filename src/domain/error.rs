//! Application error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Query execution failed: {0}")]
    Query(String),
    #[error("Pool exhausted: {0}")]
    PoolExhausted(String),
    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Rejection of a request's query parameters.
///
/// The `Display` output is sent verbatim as the `400 Bad Request` body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Parameter '{field}' must be one of [{accepted}]")]
    NotOneOf {
        field: &'static str,
        accepted: String,
    },
    #[error("Parameter '{0}' must be present")]
    Missing(&'static str),
    #[error("Parameter '{0}' must be present and be a valid decimal")]
    NotDecimal(&'static str),
    #[error("Parameter '{0}' must not be negative")]
    Negative(&'static str),
    #[error("Parameter '{0}' must be present and be an integer")]
    NotInteger(&'static str),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No such user")]
    NoUser,
    #[error("Currency {0} is not supported")]
    UnsupportedCurrency(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short, stable label used for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::Config(_) => "config",
            AppError::Validation(_) => "validation",
            AppError::NoUser => "no_user",
            AppError::UnsupportedCurrency(_) => "unsupported_currency",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted("Pool timed out".to_string()),
            sqlx::Error::PoolClosed => DatabaseError::Connection("Pool closed".to_string()),
            sqlx::Error::Io(io_err) => DatabaseError::Connection(io_err.to_string()),
            sqlx::Error::Tls(tls_err) => DatabaseError::Connection(tls_err.to_string()),
            sqlx::Error::Database(db_err) => DatabaseError::Query(db_err.message().to_string()),
            sqlx::Error::RowNotFound => {
                DatabaseError::UnexpectedResult("Query returned no rows".to_string())
            }
            _ => DatabaseError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(DatabaseError::from(err))
    }
}
