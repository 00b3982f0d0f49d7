//! Storage-level tests for the in-memory backend: workflow atomicity,
//! selection invariants, and notification ordering.

use leaseflow_core::roles::{ROLE_CLIENT, ROLE_MANAGER};
use leaseflow_core::status::ApplicationStatus;
use leaseflow_core::types::DbId;
use leaseflow_db::models::application::CreateApplication;
use leaseflow_db::models::company::CreateCompany;
use leaseflow_db::models::notification::CreateNotification;
use leaseflow_db::models::offer::CreateOffer;
use leaseflow_db::models::user::CreateUser;
use leaseflow_db::store::{
    ApplicationStore, CompanyStore, MemStorage, NotificationStore, OfferStore, StoreError,
    UserStore, WorkflowStore, NOTIFICATION_PAGE,
};
use rust_decimal::Decimal;

async fn seed_user(storage: &MemStorage, username: &str, role: &str, company: Option<DbId>) -> DbId {
    storage
        .create_user(CreateUser {
            username: username.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            role: role.to_string(),
            phone: None,
            tax_id: None,
            company_id: company,
        })
        .await
        .expect("user")
        .id
}

async fn seed_application(storage: &MemStorage, client_id: DbId) -> DbId {
    storage
        .create_application(CreateApplication {
            client_id,
            agent_id: None,
            object_cost: Decimal::new(2_500_000, 0),
            down_payment_percent: Decimal::new(20, 0),
            term_months: 36,
            leasing_type: "auto".to_string(),
            client_phone: "+15550001122".to_string(),
            client_tax_id: "7701234567".to_string(),
            is_new_object: true,
            is_for_rental: false,
            comment: None,
        })
        .await
        .expect("application")
        .id
}

async fn seed_company(storage: &MemStorage, name: &str) -> DbId {
    storage
        .create_company(CreateCompany {
            name: name.to_string(),
            description: None,
            min_amount: Some(Decimal::new(1_000_000, 0)),
            max_amount: Some(Decimal::new(10_000_000, 0)),
            min_term_months: Some(12),
            max_term_months: Some(60),
            interest_rate: None,
            works_with_auto: true,
            works_with_equipment: true,
            works_with_real_estate: true,
            works_with_used: true,
        })
        .await
        .expect("company")
        .id
}

fn offer_input(application_id: DbId, company_id: DbId, manager_id: DbId) -> CreateOffer {
    CreateOffer {
        application_id,
        company_id,
        manager_id: Some(manager_id),
        monthly_payment: Decimal::new(72_000, 0),
        first_payment: Decimal::new(500_000, 0),
        buyout_payment: Decimal::new(10_000, 0),
        total_cost: Decimal::new(3_100_000, 0),
        interest_rate: None,
    }
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let storage = MemStorage::new();
    seed_user(&storage, "dup", ROLE_CLIENT, None).await;

    let result = storage
        .create_user(CreateUser {
            username: "dup".to_string(),
            password_hash: "x".to_string(),
            email: None,
            first_name: None,
            last_name: None,
            role: ROLE_CLIENT.to_string(),
            phone: None,
            tax_id: None,
            company_id: None,
        })
        .await;
    assert!(matches!(result, Err(StoreError::Core(_))));
}

#[tokio::test]
async fn test_invalid_leasing_type_rejected() {
    let storage = MemStorage::new();
    let client = seed_user(&storage, "client", ROLE_CLIENT, None).await;

    let result = storage
        .create_application(CreateApplication {
            client_id: client,
            agent_id: None,
            object_cost: Decimal::new(1, 0),
            down_payment_percent: Decimal::ZERO,
            term_months: 12,
            leasing_type: "spaceship".to_string(),
            client_phone: String::new(),
            client_tax_id: String::new(),
            is_new_object: true,
            is_for_rental: false,
            comment: None,
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_selection_passes_through_reviewing() {
    let storage = MemStorage::new();
    let admin = seed_user(&storage, "admin", "admin", None).await;
    let client = seed_user(&storage, "client", ROLE_CLIENT, None).await;
    let company = seed_company(&storage, "Fits").await;
    let manager = seed_user(&storage, "mgr", ROLE_MANAGER, Some(company)).await;

    let app_id = seed_application(&storage, client).await;
    storage.approve_application(app_id, admin).await.expect("approve");

    let kept = storage
        .create_offer(offer_input(app_id, company, manager))
        .await
        .expect("offer");
    let dropped = storage
        .create_offer(offer_input(app_id, company, manager))
        .await
        .expect("offer");

    // The application is still collecting_offers; selection jumps the
    // reviewing step.
    let selected = storage.select_offer(kept.id).await.expect("select");
    assert!(selected.is_selected);

    let offers = storage
        .list_offers_by_application(app_id)
        .await
        .expect("list");
    let sibling = offers.iter().find(|o| o.id == dropped.id).unwrap();
    assert!(!sibling.is_selected);

    let app = storage
        .get_application(app_id)
        .await
        .expect("get")
        .expect("exists");
    assert_eq!(
        app.workflow_status().unwrap(),
        ApplicationStatus::CollectingDocuments
    );

    // A second selection is no longer a legal transition.
    assert!(storage.select_offer(dropped.id).await.is_err());
}

#[tokio::test]
async fn test_reject_requires_pending() {
    let storage = MemStorage::new();
    let admin = seed_user(&storage, "admin", "admin", None).await;
    let client = seed_user(&storage, "client", ROLE_CLIENT, None).await;

    let app_id = seed_application(&storage, client).await;
    storage.approve_application(app_id, admin).await.expect("approve");

    let result = storage.reject_application(app_id, admin, "late").await;
    assert!(result.is_err(), "rejecting after approval must fail");
}

#[tokio::test]
async fn test_notifications_newest_first_and_capped() {
    let storage = MemStorage::new();
    let user = seed_user(&storage, "busy", ROLE_CLIENT, None).await;

    for i in 0..(NOTIFICATION_PAGE + 10) {
        storage
            .create_notification(CreateNotification {
                user_id: user,
                title: format!("n{i}"),
                message: String::new(),
                kind: "info".to_string(),
            })
            .await
            .expect("notification");
    }

    let listed = storage
        .list_notifications_for_user(user)
        .await
        .expect("list");
    assert_eq!(listed.len(), NOTIFICATION_PAGE as usize);
    assert_eq!(listed[0].title, format!("n{}", NOTIFICATION_PAGE + 9));

    let unread = storage.unread_count(user).await.expect("count");
    assert_eq!(unread, NOTIFICATION_PAGE + 10);
}
