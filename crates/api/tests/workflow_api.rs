//! HTTP-level integration tests for the application workflow: submission,
//! admin decisions, offer collection and selection, documents, messages,
//! and the notification fan-out.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, expect_json, get_auth, patch_json_auth, post_json_auth, seed_company_user,
    seed_user, token_for,
};
use leaseflow_core::roles::{ROLE_ADMIN, ROLE_AGENT, ROLE_CLIENT, ROLE_MANAGER};
use leaseflow_core::types::DbId;
use leaseflow_db::models::company::CreateCompany;
use leaseflow_db::store::{CompanyStore, MemStorage};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_company(storage: &MemStorage, name: &str, works_with_auto: bool) -> DbId {
    storage
        .create_company(CreateCompany {
            name: name.to_string(),
            description: None,
            min_amount: Some(Decimal::new(1_000_000, 0)),
            max_amount: Some(Decimal::new(10_000_000, 0)),
            min_term_months: Some(12),
            max_term_months: Some(60),
            interest_rate: Some(Decimal::new(129, 1)),
            works_with_auto,
            works_with_equipment: true,
            works_with_real_estate: true,
            works_with_used: true,
        })
        .await
        .expect("company creation should succeed")
        .id
}

fn application_body() -> serde_json::Value {
    serde_json::json!({
        "object_cost": 2_500_000,
        "down_payment_percent": 20,
        "term_months": 36,
        "leasing_type": "auto",
        "client_phone": "+15550001122",
        "client_tax_id": "7701234567"
    })
}

/// Submit an application as the given client token and return its id.
async fn submit_application(app: axum::Router, client_token: &str) -> DbId {
    let response = post_json_auth(app, "/api/v1/applications", client_token, application_body()).await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["status"], "pending");
    json["data"]["id"].as_i64().expect("application id")
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_client_submission_starts_pending() {
    let (app, storage) = common::build_test_app();
    let client = seed_user(&storage, "client1", ROLE_CLIENT).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;

    let response = get_auth(
        app,
        &format!("/api/v1/applications/{id}"),
        &token_for(&client),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["client_id"], client.id);
    assert_eq!(json["data"]["status"], "pending");
}

#[tokio::test]
async fn test_agent_submission_must_name_client() {
    let (app, storage) = common::build_test_app();
    let agent = seed_user(&storage, "agent1", ROLE_AGENT).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/applications",
        &token_for(&agent),
        application_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Naming the client works and records the agent.
    let client = seed_user(&storage, "represented", ROLE_CLIENT).await;
    let mut body = application_body();
    body["client_id"] = serde_json::json!(client.id);
    let response =
        post_json_auth(app, "/api/v1/applications", &token_for(&agent), body).await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["client_id"], client.id);
    assert_eq!(json["data"]["agent_id"], agent.id);
}

#[tokio::test]
async fn test_negative_cost_rejected() {
    let (app, storage) = common::build_test_app();
    let client = seed_user(&storage, "cheapskate", ROLE_CLIENT).await;

    let mut body = application_body();
    body["object_cost"] = serde_json::json!(-5);
    let response =
        post_json_auth(app, "/api/v1/applications", &token_for(&client), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_cannot_view_others_application() {
    let (app, storage) = common::build_test_app();
    let owner = seed_user(&storage, "owner", ROLE_CLIENT).await;
    let snoop = seed_user(&storage, "snoop", ROLE_CLIENT).await;

    let id = submit_application(app.clone(), &token_for(&owner)).await;

    let response = get_auth(
        app,
        &format!("/api/v1/applications/{id}"),
        &token_for(&snoop),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Admin decisions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_approval_fans_out_to_compatible_managers() {
    let (app, storage) = common::build_test_app();
    let admin = seed_user(&storage, "admin", ROLE_ADMIN).await;
    let client = seed_user(&storage, "applicant", ROLE_CLIENT).await;

    let fitting = seed_company(&storage, "Fits Leasing", true).await;
    let unfitting = seed_company(&storage, "No Autos Inc", false).await;
    let manager = seed_company_user(&storage, "goodmgr", ROLE_MANAGER, Some(fitting)).await;
    let bystander = seed_company_user(&storage, "othermgr", ROLE_MANAGER, Some(unfitting)).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/applications/{id}/approve"),
        &token_for(&admin),
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "collecting_offers");

    // The client hears about the approval.
    let response = get_auth(app.clone(), "/api/v1/notifications", &token_for(&client)).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"][0]["kind"], "success");

    // Only the manager at the compatible company is notified.
    let response = get_auth(app.clone(), "/api/v1/notifications", &token_for(&manager)).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app.clone(), "/api/v1/notifications", &token_for(&bystander)).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    // The approval leaves a system message on the thread.
    let response = get_auth(
        app,
        &format!("/api/v1/applications/{id}/messages"),
        &token_for(&client),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"][0]["is_system"], true);
}

#[tokio::test]
async fn test_approve_requires_admin() {
    let (app, storage) = common::build_test_app();
    let client = seed_user(&storage, "plainuser", ROLE_CLIENT).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/applications/{id}/approve"),
        &token_for(&client),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_approve_twice_conflicts() {
    let (app, storage) = common::build_test_app();
    let admin = seed_user(&storage, "admin", ROLE_ADMIN).await;
    let client = seed_user(&storage, "applicant", ROLE_CLIENT).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;

    let uri = format!("/api/v1/applications/{id}/approve");
    let response =
        post_json_auth(app.clone(), &uri, &token_for(&admin), serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(app, &uri, &token_for(&admin), serde_json::json!({})).await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn test_rejection_records_reason() {
    let (app, storage) = common::build_test_app();
    let admin = seed_user(&storage, "admin", ROLE_ADMIN).await;
    let client = seed_user(&storage, "applicant", ROLE_CLIENT).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/applications/{id}/reject"),
        &token_for(&admin),
        serde_json::json!({ "reason": "Incomplete tax records" }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["status"], "rejected");

    let response = get_auth(app, "/api/v1/notifications", &token_for(&client)).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"][0]["kind"], "error");
    assert!(json["data"][0]["message"]
        .as_str()
        .unwrap()
        .contains("Incomplete tax records"));
}

#[tokio::test]
async fn test_status_cannot_skip_states() {
    let (app, storage) = common::build_test_app();
    let admin = seed_user(&storage, "admin", ROLE_ADMIN).await;
    let client = seed_user(&storage, "applicant", ROLE_CLIENT).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;

    let response = patch_json_auth(
        app,
        &format!("/api/v1/applications/{id}/status"),
        &token_for(&admin),
        serde_json::json!({ "status": "issued" }),
    )
    .await;
    let json = expect_json(response, StatusCode::CONFLICT).await;
    assert_eq!(json["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Offers
// ---------------------------------------------------------------------------

/// Drive an application to `collecting_offers` and return
/// (application_id, manager, client).
async fn collecting_offers_fixture(
    app: &axum::Router,
    storage: &MemStorage,
) -> (
    DbId,
    leaseflow_db::models::user::User,
    leaseflow_db::models::user::User,
) {
    let admin = seed_user(storage, "admin", ROLE_ADMIN).await;
    let client = seed_user(storage, "applicant", ROLE_CLIENT).await;
    let company = seed_company(storage, "Fits Leasing", true).await;
    let manager = seed_company_user(storage, "mgr", ROLE_MANAGER, Some(company)).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/applications/{id}/approve"),
        &token_for(&admin),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    (id, manager, client)
}

fn offer_body(monthly: i64) -> serde_json::Value {
    serde_json::json!({
        "monthly_payment": monthly,
        "first_payment": 500_000,
        "buyout_payment": 10_000,
        "total_cost": 3_100_000,
        "interest_rate": 12.9
    })
}

#[tokio::test]
async fn test_offer_submission_and_selection() {
    let (app, storage) = common::build_test_app();
    let (id, manager, client) = collecting_offers_fixture(&app, &storage).await;

    let uri = format!("/api/v1/applications/{id}/offers");
    let first = body_json(
        post_json_auth(app.clone(), &uri, &token_for(&manager), offer_body(72_000)).await,
    )
    .await;
    let second = body_json(
        post_json_auth(app.clone(), &uri, &token_for(&manager), offer_body(69_500)).await,
    )
    .await;
    let first_id = first["data"]["id"].as_i64().unwrap();
    let second_id = second["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/offers/{second_id}/select"),
        &token_for(&client),
        serde_json::json!({}),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"]["is_selected"], true);

    // The sibling is unselected and the application moves on.
    let offers = body_json(get_auth(app.clone(), &uri, &token_for(&client)).await).await;
    for offer in offers["data"].as_array().unwrap() {
        let expected = offer["id"].as_i64().unwrap() == second_id;
        assert_eq!(offer["is_selected"], expected);
    }
    assert!(offers["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|o| o["id"].as_i64() == Some(first_id)));

    let application = body_json(
        get_auth(
            app,
            &format!("/api/v1/applications/{id}"),
            &token_for(&client),
        )
        .await,
    )
    .await;
    assert_eq!(application["data"]["status"], "collecting_documents");
}

#[tokio::test]
async fn test_offer_creation_notifies_client() {
    let (app, storage) = common::build_test_app();
    let (id, manager, client) = collecting_offers_fixture(&app, &storage).await;

    let before = body_json(get_auth(app.clone(), "/api/v1/notifications", &token_for(&client)).await)
        .await;
    let before = before["data"].as_array().unwrap().len();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/applications/{id}/offers"),
        &token_for(&manager),
        offer_body(72_000),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let after = body_json(get_auth(app, "/api/v1/notifications", &token_for(&client)).await).await;
    let notifications = after["data"].as_array().unwrap();
    assert_eq!(notifications.len(), before + 1);
    assert_eq!(notifications[0]["kind"], "success");
    assert!(notifications[0]["message"]
        .as_str()
        .unwrap()
        .contains(&format!("#{id}")));
}

#[tokio::test]
async fn test_manager_listing_follows_selected_application() {
    let (app, storage) = common::build_test_app();
    let (id, manager, client) = collecting_offers_fixture(&app, &storage).await;

    // Visible while collecting offers.
    let listed = body_json(get_auth(app.clone(), "/api/v1/applications", &token_for(&manager)).await)
        .await;
    assert!(listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["id"].as_i64() == Some(id)));

    let offer = body_json(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/applications/{id}/offers"),
            &token_for(&manager),
            offer_body(72_000),
        )
        .await,
    )
    .await;
    let offer_id = offer["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/offers/{offer_id}/select"),
        &token_for(&client),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Still visible after the client's selection moved the deal on.
    let listed = body_json(get_auth(app, "/api/v1/applications", &token_for(&manager)).await).await;
    let entry = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"].as_i64() == Some(id))
        .expect("selected application should stay in the manager listing");
    assert_eq!(entry["status"], "collecting_documents");
}

#[tokio::test]
async fn test_offer_rejected_while_pending() {
    let (app, storage) = common::build_test_app();
    let client = seed_user(&storage, "applicant", ROLE_CLIENT).await;
    let company = seed_company(&storage, "Fits Leasing", true).await;
    let manager = seed_company_user(&storage, "mgr", ROLE_MANAGER, Some(company)).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/applications/{id}/offers"),
        &token_for(&manager),
        offer_body(72_000),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_only_client_selects_offer() {
    let (app, storage) = common::build_test_app();
    let (id, manager, _client) = collecting_offers_fixture(&app, &storage).await;

    let offer = body_json(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/applications/{id}/offers"),
            &token_for(&manager),
            offer_body(72_000),
        )
        .await,
    )
    .await;
    let offer_id = offer["data"]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/offers/{offer_id}/select"),
        &token_for(&manager),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Compatible companies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_compatible_companies_listing() {
    let (app, storage) = common::build_test_app();
    let client = seed_user(&storage, "applicant", ROLE_CLIENT).await;
    seed_company(&storage, "Fits Leasing", true).await;
    seed_company(&storage, "No Autos Inc", false).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;

    let response = get_auth(
        app,
        &format!("/api/v1/applications/{id}/companies"),
        &token_for(&client),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Fits Leasing"]);
}

// ---------------------------------------------------------------------------
// Documents and messages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_documents_roundtrip() {
    let (app, storage) = common::build_test_app();
    let client = seed_user(&storage, "applicant", ROLE_CLIENT).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/applications/{id}/documents"),
        &token_for(&client),
        serde_json::json!({
            "file_name": "passport.pdf",
            "file_url": "https://files.test/passport.pdf",
            "document_type": "identity"
        }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["data"]["uploaded_by"], client.id);

    let response = get_auth(
        app,
        &format!("/api/v1/applications/{id}/documents"),
        &token_for(&client),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_message_thread_order() {
    let (app, storage) = common::build_test_app();
    let client = seed_user(&storage, "applicant", ROLE_CLIENT).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;
    let uri = format!("/api/v1/applications/{id}/messages");

    for body in ["first question", "second question"] {
        let response = post_json_auth(
            app.clone(),
            &uri,
            &token_for(&client),
            serde_json::json!({ "body": body }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let json = body_json(get_auth(app, &uri, &token_for(&client)).await).await;
    let bodies: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["first question", "second question"]);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_mark_notification_read() {
    let (app, storage) = common::build_test_app();
    let admin = seed_user(&storage, "admin", ROLE_ADMIN).await;
    let client = seed_user(&storage, "applicant", ROLE_CLIENT).await;

    let id = submit_application(app.clone(), &token_for(&client)).await;
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/applications/{id}/approve"),
        &token_for(&admin),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let unread = body_json(
        get_auth(
            app.clone(),
            "/api/v1/notifications/unread-count",
            &token_for(&client),
        )
        .await,
    )
    .await;
    assert_eq!(unread["data"]["unread"], 1);

    let list = body_json(get_auth(app.clone(), "/api/v1/notifications", &token_for(&client)).await)
        .await;
    let notification_id = list["data"][0]["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/notifications/{notification_id}/read"),
        &token_for(&client),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Another user cannot mark it (or even see it).
    let stranger = seed_user(&storage, "stranger", ROLE_CLIENT).await;
    let response = post_json_auth(
        app,
        &format!("/api/v1/notifications/{notification_id}/read"),
        &token_for(&stranger),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
