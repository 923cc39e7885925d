//! End-to-end API tests: ephemeral PG, real router, requests via `oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sweetshop_api::{AppState, config::ApiConfig};
use sweetshop_core::db::{DbError, LocalDbManager};
use tower::ServiceExt;

/// Spin up an ephemeral PostgreSQL instance and build the router on top.
///
/// Returns `None` (skipping the test) when PostgreSQL is not installed.
async fn test_app() -> Option<(LocalDbManager, Router)> {
    let mut db = match LocalDbManager::ephemeral().await {
        Ok(db) => db,
        Err(DbError::PgConfigNotFound) => {
            eprintln!("skipping: pg_config not on PATH");
            return None;
        }
        Err(e) => panic!("ephemeral PostgreSQL: {e}"),
    };
    db.setup().await.expect("db setup");
    db.start().await.expect("db start");

    let pool = sqlx::PgPool::connect(&db.connection_url())
        .await
        .expect("connect to ephemeral PG");
    sweetshop_api::migrate(&pool).await.expect("run migrations");

    let state = AppState {
        pool,
        config: ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            pg_connection_url: db.connection_url(),
            jwt_secret: "test-secret".into(),
        },
    };

    Some((db, sweetshop_api::router(state)))
}

/// Fire one request and return (status, parsed envelope).
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn register(app: &Router, name: &str, email: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({"name": name, "email": email, "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"].clone()
}

#[tokio::test]
async fn catalog_crud_is_admin_gated() {
    let Some((mut db, app)) = test_app().await else {
        return;
    };

    // First registered user is the admin, the second is a plain customer.
    let admin = register(&app, "Admin", "admin@shop.com").await;
    let customer = register(&app, "Customer", "customer@shop.com").await;
    let admin_token = admin["accessToken"].as_str().unwrap();
    let customer_token = customer["accessToken"].as_str().unwrap();

    let sweet = json!({
        "name": "Chocolate Bar",
        "description": "Classic milk chocolate bar.",
        "category": "Chocolate",
        "price": "2.50",
        "stock": 10
    });

    // No token → 401; customer token → 403; admin token → 201.
    let (status, body) = send(&app, "POST", "/api/v1/sweets/create", None, Some(sweet.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/sweets/create",
        Some(customer_token),
        Some(sweet.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/sweets/create",
        Some(admin_token),
        Some(sweet),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Sweet Created Successfully");
    assert_eq!(body["data"]["stock"], 10);
    let sweet_id = body["data"]["id"].as_str().unwrap().to_string();

    // Listing is public and wrapped in the same envelope.
    let (status, body) = send(&app, "GET", "/api/v1/sweets", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Restock is admin-only.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/sweets/{sweet_id}/addStock"),
        Some(customer_token),
        Some(json!({"quantity": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/sweets/{sweet_id}/addStock"),
        Some(admin_token),
        Some(json!({"quantity": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stock"], 15);

    // Invalid restock quantity is a 400.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/sweets/{sweet_id}/addStock"),
        Some(admin_token),
        Some(json!({"quantity": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn purchase_flow_and_history() {
    let Some((mut db, app)) = test_app().await else {
        return;
    };

    let admin = register(&app, "Admin", "admin@shop.com").await;
    let buyer = register(&app, "Buyer", "buyer@shop.com").await;
    let admin_token = admin["accessToken"].as_str().unwrap();
    let buyer_token = buyer["accessToken"].as_str().unwrap();

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/sweets/create",
        Some(admin_token),
        Some(json!({
            "name": "Gummy Bears",
            "description": "Assorted fruit flavored gummy bears.",
            "category": "Gummy",
            "price": "3.00",
            "stock": 5
        })),
    )
    .await;
    let sweet_id = body["data"]["id"].as_str().unwrap().to_string();

    // Purchasing requires a session.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/sweets/{sweet_id}/purchase"),
        None,
        Some(json!({"quantity": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/sweets/{sweet_id}/purchase"),
        Some(buyer_token),
        Some(json!({"quantity": 2, "comment": "for the office"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["sweetName"], "Gummy Bears");
    assert_eq!(body["data"]["quantity"], 2);

    // Requesting more than the remaining stock fails without a ledger row.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/sweets/{sweet_id}/purchase"),
        Some(buyer_token),
        Some(json!({"quantity": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = send(&app, "GET", "/api/v1/sweets", None, None).await;
    assert_eq!(body["data"][0]["stock"], 3);

    // History shows the one successful purchase with totals.
    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/users/purchase-history",
        Some(buyer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalPurchases"], 1);
    assert_eq!(body["data"]["purchases"][0]["sweetName"], "Gummy Bears");

    // The admin's history is empty: purchases belong to their buyer.
    let (_, body) = send(
        &app,
        "GET",
        "/api/v1/users/purchase-history",
        Some(admin_token),
        None,
    )
    .await;
    assert_eq!(body["data"]["totalPurchases"], 0);

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn search_is_public_and_filtered() {
    let Some((mut db, app)) = test_app().await else {
        return;
    };

    let admin = register(&app, "Admin", "admin@shop.com").await;
    let admin_token = admin["accessToken"].as_str().unwrap();

    for (name, category, price) in [
        ("Chocolate Bar", "Chocolate", "2.50"),
        ("Gummy Bears", "Gummy", "3.00"),
        ("Lollipop", "Hard Candy", "0.75"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/sweets/create",
            Some(admin_token),
            Some(json!({
                "name": name,
                "description": format!("{name} from the catalog."),
                "category": category,
                "price": price,
                "stock": 5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/sweets/search?category=Gummy",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Gummy Bears");

    let (_, body) = send(
        &app,
        "GET",
        "/api/v1/sweets/search?name=CHOC&maxPrice=3.00",
        None,
        None,
    )
    .await;
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Chocolate Bar");

    db.stop().await.expect("db stop");
}

#[tokio::test]
async fn auth_endpoints_cover_the_session_lifecycle() {
    let Some((mut db, app)) = test_app().await else {
        return;
    };

    let registered = register(&app, "A", "a@b.com").await;

    // Duplicate registration conflicts.
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/register",
        None,
        Some(json!({"name": "B", "email": "a@b.com", "password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // Wrong password → 401, unknown email → 404.
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({"email": "a@b.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({"email": "nobody@b.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/login",
        None,
        Some(json!({"email": "a@b.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let login_refresh = body["data"]["refreshToken"].as_str().unwrap().to_string();
    let access_token = body["data"]["accessToken"].as_str().unwrap().to_string();

    // Logging in rotated the refresh token issued at registration.
    let stale = registered["refreshToken"].as_str().unwrap();
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/refresh",
        None,
        Some(json!({"refreshToken": stale})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The current one refreshes, and rotation kills it for the next round.
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users/refresh",
        None,
        Some(json!({"refreshToken": login_refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["refreshToken"].as_str().unwrap() != login_refresh);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/refresh",
        None,
        Some(json!({"refreshToken": login_refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Missing token is rejected up front.
    let (status, _) = send(&app, "POST", "/api/v1/users/refresh", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The profile endpoint needs a valid access token.
    let (status, body) = send(&app, "GET", "/api/v1/users/current", Some(&access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "a@b.com");

    db.stop().await.expect("db stop");
}
