//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::domain::{ExchangeRates, ItemRepository, UserRepository};

use super::service::AppService;

/// Shared application state for the Axum web server.
///
/// Handlers reach the stores only through the service, so they never see
/// concrete store types. The only data shared between requests is the
/// read-only rate table and the store's own pool.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
///
/// let db = Arc::new(PostgresClient::with_defaults(options).await?);
/// let state = AppState::new(db.clone(), db, Arc::new(ExchangeRates::default()));
///
/// let router = create_router(Arc::new(state));
/// ```
#[derive(Clone)]
pub struct AppState {
    /// The application service containing business logic.
    pub service: Arc<AppService>,
}

impl AppState {
    /// Creates a new `AppState` instance with the provided repositories.
    ///
    /// This constructor also creates the `AppService` internally,
    /// wiring it to the provided repositories and rate table.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        rates: Arc<ExchangeRates>,
    ) -> Self {
        Self {
            service: Arc::new(AppService::new(users, items, rates)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CreateUserParams;
    use crate::test_utils::MockDatabaseClient;

    #[test]
    fn test_app_state_creation() {
        let db = Arc::new(MockDatabaseClient::new());

        let state = AppState::new(db.clone(), db, Arc::new(ExchangeRates::default()));

        assert!(Arc::strong_count(&state.service) >= 1);
        assert_eq!(state.service.rates().len(), 3);
    }

    #[test]
    fn test_app_state_is_clone() {
        let db = Arc::new(MockDatabaseClient::new());

        let state = AppState::new(db.clone(), db, Arc::new(ExchangeRates::default()));
        let cloned = state.clone();

        // Both should point to the same service
        assert!(Arc::ptr_eq(&state.service, &cloned.service));
    }

    #[tokio::test]
    async fn test_service_writes_through_given_repositories() {
        let db = Arc::new(MockDatabaseClient::new());
        let state = AppState::new(db.clone(), db.clone(), Arc::new(ExchangeRates::default()));

        let params = CreateUserParams {
            currency: Some("eur".to_string()),
        };
        let id = state.service.create_user(&params).await.unwrap();

        assert_eq!(id, 1);
        assert_eq!(db.get_all_users()[0].currency, "eur");
    }
}
