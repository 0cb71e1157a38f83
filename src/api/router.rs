//! HTTP routing configuration.
//!
//! Paths match exactly. A registered path called with the wrong method gets
//! `405 Method Not Allowed`; any other path gets `404 Not Found`. Both
//! responses have an empty body. `HEAD /list` is rejected like any other
//! non-GET method rather than falling through to the listing handler.

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, put},
};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::app::AppState;

use super::handlers::{create_item_handler, create_user_handler, list_items_handler};

/// Build the router with request tracing.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let middleware = ServiceBuilder::new().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Router::new()
        .route("/user", put(create_user_handler))
        .route("/item", put(create_item_handler))
        .route(
            "/list",
            get(list_items_handler).head(|| async { StatusCode::METHOD_NOT_ALLOWED }),
        )
        .layer(middleware)
        .with_state(app_state)
}
