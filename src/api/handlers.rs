//! HTTP request handlers and the mapping from `AppError` to responses.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::app::AppState;
use crate::domain::{AppError, CreateItemParams, CreateUserParams, ListItemsParams, QueryParams};

/// Register a user: `PUT /user?currency=<code>`
///
/// Responds with the generated id as plain text.
pub async fn create_user_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryParams>,
) -> Result<String, AppError> {
    let params = CreateUserParams::from_query(&query);
    let id = state.service.create_user(&params).await?;
    Ok(id.to_string())
}

/// Store an item: `PUT /item?name=<string>&price=<decimal>`
///
/// Responds with the generated id as plain text.
pub async fn create_item_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryParams>,
) -> Result<String, AppError> {
    let params = CreateItemParams::from_query(&query);
    let id = state.service.create_item(&params).await?;
    Ok(id.to_string())
}

/// Converted price list: `GET /list?userId=<int>`
///
/// Responds with one `name: price` line per item.
pub async fn list_items_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryParams>,
) -> Result<String, AppError> {
    let params = ListItemsParams::from_query(&query);
    let report = state.service.list_items(&params).await?;
    Ok(report.to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        metrics::counter!("request_failures_total", "kind" => self.kind()).increment(1);

        match &self {
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            AppError::NoUser => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            AppError::UnsupportedCurrency(code) => {
                warn!(currency = %code, "User currency missing from rate table");
                (StatusCode::NOT_IMPLEMENTED, self.to_string()).into_response()
            }
            // Infrastructure details stay in the logs.
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                error!(error_type = %self.kind(), message = %self, "Server error");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
