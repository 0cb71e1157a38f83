//! Application service layer.
//!
//! This module contains the request pipelines that combine parameter
//! validation, store calls and the currency conversion rule, using the
//! repository traits so the store can be swapped out in tests.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::{
    AppError, CreateItemParams, CreateUserParams, ExchangeRates, ItemId, ItemRepository,
    ListItemsParams, ListingReport, UserId, UserRepository,
};

/// Application service containing core business logic.
///
/// Every public method is one pipeline: validation runs first and
/// short-circuits before any store call, then store calls run in sequence,
/// each one only after the previous succeeded. Any failure is returned as an
/// `AppError` for the API layer to map.
///
/// # Example
///
/// ```ignore
/// let db = Arc::new(PostgresClient::with_defaults(options).await?);
/// let rates = Arc::new(ExchangeRates::default());
/// let service = AppService::new(db.clone(), db, rates);
///
/// let report = service.list_items(&params).await?;
/// ```
pub struct AppService {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    rates: Arc<ExchangeRates>,
}

impl AppService {
    /// Creates a new `AppService` instance.
    ///
    /// # Arguments
    ///
    /// * `users` - Repository for the `users` relation.
    /// * `items` - Repository for the `items` relation.
    /// * `rates` - Exchange rate table shared for the life of the process.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        rates: Arc<ExchangeRates>,
    ) -> Self {
        Self {
            users,
            items,
            rates,
        }
    }

    /// The exchange rate table this service converts with.
    #[must_use]
    pub fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    /// Registers a user with the requested currency.
    ///
    /// # Errors
    ///
    /// Returns an `AppError` if:
    /// - The currency is missing or not in the rate table
    /// - The insert fails
    #[instrument(skip(self, params), fields(currency = ?params.currency))]
    pub async fn create_user(&self, params: &CreateUserParams) -> Result<UserId, AppError> {
        let currency = params.validate(&self.rates).inspect_err(|e| {
            warn!(error = %e, "Validation failed for create user request");
        })?;

        let id = self.users.insert_user(&currency).await?;
        info!(user_id = id, currency = %currency, "User created");
        metrics::counter!("users_created_total").increment(1);

        Ok(id)
    }

    /// Stores a new item priced in the base currency.
    ///
    /// # Errors
    ///
    /// Returns an `AppError` if:
    /// - `name` is missing, or `price` is missing, unparsable or negative
    /// - The insert fails
    #[instrument(skip(self, params), fields(item_name = ?params.name))]
    pub async fn create_item(&self, params: &CreateItemParams) -> Result<ItemId, AppError> {
        let item = params.validate().inspect_err(|e| {
            warn!(error = %e, "Validation failed for create item request");
        })?;

        let id = self.items.insert_item(&item).await?;
        info!(item_id = id, price = %item.price, "Item created");
        metrics::counter!("items_created_total").increment(1);

        Ok(id)
    }

    /// Lists every item with its price converted into the user's currency.
    ///
    /// This method runs the following stages:
    /// 1. Validates `userId`
    /// 2. Looks the user up
    /// 3. Resolves the user's currency against the rate table
    /// 4. Fetches all items and converts their prices
    ///
    /// The two reads are not in one transaction, so items written between
    /// them are visible.
    ///
    /// # Errors
    ///
    /// Returns an `AppError` if:
    /// - `userId` is missing or not an integer
    /// - No user has that id (`NoUser`)
    /// - The user's currency has no rate any more (`UnsupportedCurrency`)
    /// - Either read fails, or a converted price overflows
    #[instrument(skip(self, params), fields(user_id = ?params.user_id))]
    pub async fn list_items(&self, params: &ListItemsParams) -> Result<ListingReport, AppError> {
        let user_id = params.validate().inspect_err(|e| {
            warn!(error = %e, "Validation failed for list items request");
        })?;

        let user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or(AppError::NoUser)?;

        // Users are validated on creation, but the table may have changed since.
        let rate = self
            .rates
            .rate(&user.currency)
            .ok_or_else(|| AppError::UnsupportedCurrency(user.currency.clone()))?;

        let items = self.items.list_items().await?;
        let report = ListingReport::convert(&items, rate)?;

        info!(
            user_id,
            currency = %user.currency,
            items = report.len(),
            "Listing built"
        );
        metrics::counter!("listings_served_total").increment(1);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewItem, ValidationError};
    use crate::test_utils::MockDatabaseClient;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn service_with(db: &Arc<MockDatabaseClient>, rates: ExchangeRates) -> AppService {
        AppService::new(db.clone(), db.clone(), Arc::new(rates))
    }

    fn list_params(id: UserId) -> ListItemsParams {
        ListItemsParams {
            user_id: Some(id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let db = Arc::new(MockDatabaseClient::new());
        let service = service_with(&db, ExchangeRates::default());

        let params = CreateUserParams {
            currency: Some("eur".to_string()),
        };
        let id = service.create_user(&params).await.unwrap();

        let stored = db.find_user(id).await.unwrap().unwrap();
        assert_eq!(stored.currency, "eur");
    }

    #[tokio::test]
    async fn test_create_user_unknown_currency_does_not_insert() {
        let db = Arc::new(MockDatabaseClient::new());
        let service = service_with(&db, ExchangeRates::default());

        let params = CreateUserParams {
            currency: Some("gbp".to_string()),
        };
        let result = service.create_user(&params).await;

        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::NotOneOf { .. }))
        ));
        assert_eq!(db.call_count(), 0);
    }

    #[tokio::test]
    async fn test_create_item_invalid_price_does_not_insert() {
        let db = Arc::new(MockDatabaseClient::new());
        let service = service_with(&db, ExchangeRates::default());

        let params = CreateItemParams {
            name: Some("Widget".to_string()),
            price: Some("cheap".to_string()),
        };
        let result = service.create_item(&params).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(db.get_all_items().is_empty());
    }

    #[tokio::test]
    async fn test_create_item_database_failure() {
        let db = Arc::new(MockDatabaseClient::failing("Database error"));
        let service = service_with(&db, ExchangeRates::default());

        let params = CreateItemParams {
            name: Some("Widget".to_string()),
            price: Some("1".to_string()),
        };
        let result = service.create_item(&params).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_list_items_converts_prices() {
        let db = Arc::new(MockDatabaseClient::new());
        let service = service_with(&db, ExchangeRates::default());

        let user_id = db.insert_user("usd").await.unwrap();
        db.insert_item(&NewItem::new("Widget", Decimal::from_str("2.50").unwrap()))
            .await
            .unwrap();
        db.insert_item(&NewItem::new("Gadget", Decimal::from_str("0.1").unwrap()))
            .await
            .unwrap();

        let report = service.list_items(&list_params(user_id)).await.unwrap();
        assert_eq!(report.to_string(), "Widget: 175.00\nGadget: 7.0");
    }

    #[tokio::test]
    async fn test_list_items_no_user() {
        let db = Arc::new(MockDatabaseClient::new());
        let service = service_with(&db, ExchangeRates::default());

        let result = service.list_items(&list_params(404)).await;
        assert!(matches!(result, Err(AppError::NoUser)));
    }

    #[tokio::test]
    async fn test_list_items_unsupported_currency_skips_item_fetch() {
        let db = Arc::new(MockDatabaseClient::new());
        let user_id = db.insert_user("usd").await.unwrap();

        let service = service_with(&db, ExchangeRates::parse("rub=1").unwrap());
        let calls_before = db.call_count();

        let result = service.list_items(&list_params(user_id)).await;

        match result {
            Err(AppError::UnsupportedCurrency(code)) => assert_eq!(code, "usd"),
            other => panic!("Expected UnsupportedCurrency, got {:?}", other),
        }
        // Only the user lookup ran
        assert_eq!(db.call_count(), calls_before + 1);
    }

    #[tokio::test]
    async fn test_list_items_invalid_user_id_skips_store() {
        let db = Arc::new(MockDatabaseClient::new());
        let service = service_with(&db, ExchangeRates::default());

        let params = ListItemsParams {
            user_id: Some("abc".to_string()),
        };
        let result = service.list_items(&params).await;

        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::NotInteger("userId")))
        ));
        assert_eq!(db.call_count(), 0);
    }

    #[tokio::test]
    async fn test_list_items_store_failure() {
        let db = Arc::new(MockDatabaseClient::new());
        let user_id = db.insert_user("rub").await.unwrap();
        db.set_failing(true);

        let service = service_with(&db, ExchangeRates::default());
        let result = service.list_items(&list_params(user_id)).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_list_items_is_repeatable() {
        let db = Arc::new(MockDatabaseClient::new());
        let service = service_with(&db, ExchangeRates::default());
        let user_id = db.insert_user("eur").await.unwrap();
        db.insert_item(&NewItem::new("Lamp", Decimal::from_str("12.34").unwrap()))
            .await
            .unwrap();

        let first = service.list_items(&list_params(user_id)).await.unwrap();
        let second = service.list_items(&list_params(user_id)).await.unwrap();
        assert_eq!(first.to_string(), second.to_string());
    }
}
