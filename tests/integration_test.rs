//! Integration tests for the API.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use std::str::FromStr;
use tower::ServiceExt;

use price_list_service::api::create_router;
use price_list_service::app::AppState;
use price_list_service::domain::{ExchangeRates, UserRepository};
use price_list_service::test_utils::MockDatabaseClient;

fn create_test_state(db: &Arc<MockDatabaseClient>, rates: ExchangeRates) -> Arc<AppState> {
    Arc::new(AppState::new(db.clone(), db.clone(), Arc::new(rates)))
}

fn create_test_router() -> (Router, Arc<MockDatabaseClient>) {
    let db = Arc::new(MockDatabaseClient::new());
    let router = create_router(create_test_state(&db, ExchangeRates::default()));
    (router, db)
}

async fn call(router: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_create_user_success() {
    let (router, db) = create_test_router();

    for currency in ["rub", "usd", "eur"] {
        let (status, body) = call(&router, "PUT", &format!("/user?currency={currency}")).await;
        assert_eq!(status, StatusCode::OK);

        let id: i32 = body.parse().expect("numeric id");
        let stored = db.find_user(id).await.unwrap().unwrap();
        assert_eq!(stored.currency, currency);
    }
}

#[tokio::test]
async fn test_create_user_rejects_unknown_currency() {
    let (router, db) = create_test_router();

    for uri in ["/user?currency=gbp", "/user?currency=USD", "/user", "/user?currency="] {
        let (status, body) = call(&router, "PUT", uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(body, "Parameter 'currency' must be one of [eur, rub, usd]");
    }
    assert!(db.get_all_users().is_empty());
    assert_eq!(db.call_count(), 0);
}

#[tokio::test]
async fn test_create_item_success() {
    let (router, db) = create_test_router();

    let (status, body) = call(&router, "PUT", "/item?name=Widget&price=2.50").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "1");

    let items = db.get_all_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Widget");
    assert_eq!(items[0].price, Decimal::from_str("2.50").unwrap());
}

#[tokio::test]
async fn test_create_item_decodes_query_string() {
    let (router, db) = create_test_router();

    let (status, _) = call(&router, "PUT", "/item?name=Blue%20Lamp&price=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db.get_all_items()[0].name, "Blue Lamp");
}

#[tokio::test]
async fn test_create_item_validation_errors() {
    let (router, db) = create_test_router();

    let cases = [
        ("/item?price=1", "Parameter 'name' must be present"),
        ("/item", "Parameter 'name' must be present"),
        (
            "/item?name=Widget",
            "Parameter 'price' must be present and be a valid decimal",
        ),
        (
            "/item?name=Widget&price=abc",
            "Parameter 'price' must be present and be a valid decimal",
        ),
        (
            "/item?name=Widget&price=-5",
            "Parameter 'price' must not be negative",
        ),
    ];

    for (uri, expected) in cases {
        let (status, body) = call(&router, "PUT", uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(body, expected);
    }
    assert!(db.get_all_items().is_empty());
    assert_eq!(db.call_count(), 0);
}

#[tokio::test]
async fn test_list_items_missing_user_id() {
    let (router, db) = create_test_router();

    for uri in ["/list", "/list?userId=abc", "/list?userId="] {
        let (status, body) = call(&router, "GET", uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert_eq!(body, "Parameter 'userId' must be present and be an integer");
    }
    assert_eq!(db.call_count(), 0);
}

#[tokio::test]
async fn test_list_items_unknown_user() {
    let (router, _db) = create_test_router();

    let (status, body) = call(&router, "GET", "/list?userId=12345").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "No such user");
}

#[tokio::test]
async fn test_list_items_currency_removed_from_table() {
    let db = Arc::new(MockDatabaseClient::new());

    // Created while usd was supported
    let router = create_router(create_test_state(&db, ExchangeRates::default()));
    let (status, user_id) = call(&router, "PUT", "/user?currency=usd").await;
    assert_eq!(status, StatusCode::OK);

    // Restarted with a smaller table over the same store
    let router = create_router(create_test_state(
        &db,
        ExchangeRates::parse("rub=1,eur=80").unwrap(),
    ));
    let (status, body) = call(&router, "GET", &format!("/list?userId={user_id}")).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body, "Currency usd is not supported");
}

#[tokio::test]
async fn test_store_failure_is_internal_error_with_empty_body() {
    let (router, db) = create_test_router();
    let (_, user_id) = call(&router, "PUT", "/user?currency=rub").await;

    db.set_failing(true);

    let (status, body) = call(&router, "GET", &format!("/list?userId={user_id}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());

    let (status, body) = call(&router, "PUT", "/user?currency=rub").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());

    let (status, body) = call(&router, "PUT", "/item?name=x&price=1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_list_items_empty_store() {
    let (router, _db) = create_test_router();
    let (_, user_id) = call(&router, "PUT", "/user?currency=eur").await;

    let (status, body) = call(&router, "GET", &format!("/list?userId={user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_first_query_value_wins() {
    let (router, db) = create_test_router();

    let (status, _) = call(&router, "PUT", "/user?currency=eur&currency=usd").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(db.get_all_users()[0].currency, "eur");
}
