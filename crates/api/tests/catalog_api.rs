//! HTTP-level integration tests for the car catalog, company listings,
//! admin management endpoints, and the health check.

mod common;

use axum::http::StatusCode;
use common::{body_json, expect_json, get, get_auth, post_json_auth, seed_user, token_for};
use leaseflow_core::roles::{ROLE_ADMIN, ROLE_CLIENT, ROLE_MANAGER, ROLE_SUPPLIER};
use tower::ServiceExt;

fn car_body(brand: &str, price: i64, is_new: bool) -> serde_json::Value {
    serde_json::json!({
        "brand": brand,
        "model": "Fleetline",
        "year": 2024,
        "price": price,
        "transmission": "automatic",
        "is_new": is_new
    })
}

// ---------------------------------------------------------------------------
// Cars
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_supplier_adds_car() {
    let (app, storage) = common::build_test_app();
    let supplier = seed_user(&storage, "dealer", ROLE_SUPPLIER).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/cars",
        &token_for(&supplier),
        car_body("Volvo", 4_200_000, true),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["status"], "available");
    assert_eq!(json["data"]["supplier_id"], supplier.id);

    let mine = body_json(get_auth(app, "/api/v1/cars/mine", &token_for(&supplier)).await).await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_client_cannot_add_car() {
    let (app, storage) = common::build_test_app();
    let client = seed_user(&storage, "shopper", ROLE_CLIENT).await;

    let response = post_json_auth(
        app,
        "/api/v1/cars",
        &token_for(&client),
        car_body("Volvo", 4_200_000, true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_car_filters_are_anded() {
    let (app, storage) = common::build_test_app();
    let supplier = seed_user(&storage, "dealer", ROLE_SUPPLIER).await;
    let client = seed_user(&storage, "shopper", ROLE_CLIENT).await;

    for (brand, price, is_new) in [
        ("Volvo", 4_200_000, true),
        ("Volvo", 1_900_000, false),
        ("Scania", 6_000_000, true),
    ] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/cars",
            &token_for(&supplier),
            car_body(brand, price, is_new),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(
        get_auth(
            app.clone(),
            "/api/v1/cars?brand=Volvo&is_new=true",
            &token_for(&client),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["brand"], "Volvo");

    // No filters returns the whole catalog.
    let json = body_json(get_auth(app, "/api/v1/cars", &token_for(&client)).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Admin: users and companies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_admin_creates_manager_with_company() {
    let (app, storage) = common::build_test_app();
    let admin = seed_user(&storage, "admin", ROLE_ADMIN).await;

    let company = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/admin/companies",
            &token_for(&admin),
            serde_json::json!({
                "name": "Nordic Leasing",
                "min_amount": 500_000,
                "max_amount": 20_000_000
            }),
        )
        .await,
    )
    .await;
    let company_id = company["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/users",
        &token_for(&admin),
        serde_json::json!({
            "username": "nordic_mgr",
            "password": "a-long-enough-password",
            "role": ROLE_MANAGER,
            "company_id": company_id
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["company_id"], company_id);

    // Attaching a company to a non-manager is rejected.
    let response = post_json_auth(
        app,
        "/api/v1/admin/users",
        &token_for(&admin),
        serde_json::json!({
            "username": "confused",
            "password": "a-long-enough-password",
            "role": ROLE_CLIENT,
            "company_id": company_id
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_endpoints_require_admin() {
    let (app, storage) = common::build_test_app();
    let client = seed_user(&storage, "plain", ROLE_CLIENT).await;

    let response = get_auth(app, "/api/v1/admin/users", &token_for(&client)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let (app, storage) = common::build_test_app();
    let admin = seed_user(&storage, "admin", ROLE_ADMIN).await;

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/admin/users/{}", admin.id))
                .header("authorization", format!("Bearer {}", token_for(&admin)))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_company_listing_shows_active_only() {
    let (app, storage) = common::build_test_app();
    let admin = seed_user(&storage, "admin", ROLE_ADMIN).await;
    let client = seed_user(&storage, "shopper", ROLE_CLIENT).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/companies",
        &token_for(&admin),
        serde_json::json!({ "name": "Visible Leasing" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get_auth(app, "/api/v1/companies", &token_for(&client)).await).await;
    assert_eq!(json["data"][0]["name"], "Visible Leasing");
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let (app, _storage) = common::build_test_app();

    let response = get(app, "/health").await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
