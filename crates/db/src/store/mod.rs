//! The storage façade.
//!
//! Route handlers only see the [`Storage`] trait object; the two
//! implementations ([`PgStorage`] and [`MemStorage`]) must produce
//! identical return shapes. Per-entity traits keep each implementation
//! split the same way on both sides.
//!
//! Workflow operations (approve, reject, status update, offer selection)
//! are whole operations on the trait rather than compositions of CRUD
//! calls, so each backend can make them atomic: `PgStorage` runs them in a
//! single transaction, `MemStorage` under its write lock.

mod mem;
mod pg;

pub use mem::MemStorage;
pub use pg::PgStorage;

use async_trait::async_trait;
use leaseflow_core::error::CoreError;
use leaseflow_core::leasing::LeasingType;
use leaseflow_core::matching::ApplicationTerms;
use leaseflow_core::status::ApplicationStatus;
use leaseflow_core::types::{DbId, Money};

use crate::models::application::{CreateApplication, LeasingApplication};
use crate::models::car::{Car, CarFilter, CreateCar};
use crate::models::company::{CreateCompany, LeasingCompany};
use crate::models::document::{CreateDocument, Document};
use crate::models::message::{ApplicationMessage, CreateMessage};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::offer::{CreateOffer, LeasingOffer};
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Errors surfaced by storage implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain-level error (not found, conflict, validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx. Never produced by `MemStorage`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for storage results.
pub type StoreResult<T> = Result<T, StoreError>;

/// User CRUD and lookups.
#[async_trait]
pub trait UserStore {
    /// Create a user. Fails with a conflict if the username is taken.
    async fn create_user(&self, input: CreateUser) -> StoreResult<User>;
    async fn get_user(&self, id: DbId) -> StoreResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: DbId, input: UpdateUser) -> StoreResult<Option<User>>;
    /// Delete a user. Returns `false` if no row matched.
    async fn delete_user(&self, id: DbId) -> StoreResult<bool>;
}

/// Application CRUD and role-scoped listings.
#[async_trait]
pub trait ApplicationStore {
    async fn create_application(
        &self,
        input: CreateApplication,
    ) -> StoreResult<LeasingApplication>;
    async fn get_application(&self, id: DbId) -> StoreResult<Option<LeasingApplication>>;
    async fn list_applications(&self) -> StoreResult<Vec<LeasingApplication>>;
    async fn list_applications_by_client(
        &self,
        client_id: DbId,
    ) -> StoreResult<Vec<LeasingApplication>>;
    async fn list_applications_by_agent(
        &self,
        agent_id: DbId,
    ) -> StoreResult<Vec<LeasingApplication>>;
    async fn list_applications_by_status(
        &self,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<LeasingApplication>>;
}

/// The status workflow: admin decisions, validated transitions, offer
/// selection, and the notification fan-out that rides along with them.
#[async_trait]
pub trait WorkflowStore {
    /// Admin approval of a `pending` application.
    ///
    /// Writes a system message on the thread, notifies the client, fans out
    /// notifications to active managers of compatible companies, and lands
    /// the application on `collecting_offers`.
    async fn approve_application(
        &self,
        id: DbId,
        admin_id: DbId,
    ) -> StoreResult<LeasingApplication>;

    /// Admin rejection of a `pending` application with a reason.
    ///
    /// Writes a system message and notifies the client; the reason is
    /// embedded in both.
    async fn reject_application(
        &self,
        id: DbId,
        admin_id: DbId,
        reason: &str,
    ) -> StoreResult<LeasingApplication>;

    /// Move an application to `status`, validating the workflow edge.
    /// Notifies the client of the change.
    async fn update_application_status(
        &self,
        id: DbId,
        status: ApplicationStatus,
    ) -> StoreResult<LeasingApplication>;

    /// Select an offer: mark it selected, unselect its siblings, and
    /// advance the application to `collecting_documents`.
    async fn select_offer(&self, offer_id: DbId) -> StoreResult<LeasingOffer>;

    /// Active companies able to serve the given application.
    async fn compatible_companies(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<LeasingCompany>>;
}

/// Offer CRUD.
#[async_trait]
pub trait OfferStore {
    /// Create an offer against an existing application.
    async fn create_offer(&self, input: CreateOffer) -> StoreResult<LeasingOffer>;
    async fn get_offer(&self, id: DbId) -> StoreResult<Option<LeasingOffer>>;
    async fn list_offers_by_application(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<LeasingOffer>>;
}

/// Leasing company CRUD.
#[async_trait]
pub trait CompanyStore {
    async fn create_company(&self, input: CreateCompany) -> StoreResult<LeasingCompany>;
    async fn get_company(&self, id: DbId) -> StoreResult<Option<LeasingCompany>>;
    /// Active companies only (the public listing).
    async fn list_active_companies(&self) -> StoreResult<Vec<LeasingCompany>>;
    /// Every company, active or not (admin listing).
    async fn list_all_companies(&self) -> StoreResult<Vec<LeasingCompany>>;
}

/// Car catalog CRUD and search.
#[async_trait]
pub trait CarStore {
    async fn create_car(&self, input: CreateCar) -> StoreResult<Car>;
    /// Search the catalog; an empty filter returns everything.
    async fn list_cars(&self, filter: &CarFilter) -> StoreResult<Vec<Car>>;
    async fn list_cars_by_supplier(&self, supplier_id: DbId) -> StoreResult<Vec<Car>>;
}

/// Application document CRUD.
#[async_trait]
pub trait DocumentStore {
    async fn create_document(&self, input: CreateDocument) -> StoreResult<Document>;
    async fn list_documents_by_application(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<Document>>;
}

/// In-app notifications.
#[async_trait]
pub trait NotificationStore {
    async fn create_notification(
        &self,
        input: CreateNotification,
    ) -> StoreResult<Notification>;
    /// Newest first, capped at [`NOTIFICATION_PAGE`].
    async fn list_notifications_for_user(
        &self,
        user_id: DbId,
    ) -> StoreResult<Vec<Notification>>;
    /// Mark one of the user's notifications read. Returns `false` if the
    /// notification does not exist or belongs to someone else.
    async fn mark_notification_read(
        &self,
        notification_id: DbId,
        user_id: DbId,
    ) -> StoreResult<bool>;
    async fn unread_count(&self, user_id: DbId) -> StoreResult<i64>;
}

/// Application message threads.
#[async_trait]
pub trait MessageStore {
    async fn create_message(&self, input: CreateMessage) -> StoreResult<ApplicationMessage>;
    /// Oldest first, the order a thread is read in.
    async fn list_messages_for_application(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<ApplicationMessage>>;
}

/// Refresh-token sessions.
#[async_trait]
pub trait SessionStore {
    async fn create_session(&self, input: CreateSession) -> StoreResult<Session>;
    /// Find an unexpired, unrevoked session by refresh-token hash.
    async fn find_session_by_token_hash(&self, hash: &str) -> StoreResult<Option<Session>>;
    async fn revoke_session(&self, id: DbId) -> StoreResult<()>;
    async fn revoke_all_sessions_for_user(&self, user_id: DbId) -> StoreResult<()>;
}

/// The full storage façade handed to the HTTP layer as `Arc<dyn Storage>`.
pub trait Storage:
    UserStore
    + ApplicationStore
    + WorkflowStore
    + OfferStore
    + CompanyStore
    + CarStore
    + DocumentStore
    + NotificationStore
    + MessageStore
    + SessionStore
    + Send
    + Sync
{
}

impl<T> Storage for T where
    T: UserStore
        + ApplicationStore
        + WorkflowStore
        + OfferStore
        + CompanyStore
        + CarStore
        + DocumentStore
        + NotificationStore
        + MessageStore
        + SessionStore
        + Send
        + Sync
{
}

/// Page size for notification listings.
pub const NOTIFICATION_PAGE: i64 = 50;

/// The subset of an application the compatibility filter consumes.
///
/// A malformed `leasing_type` column means the row was written outside the
/// application and is surfaced as an internal error.
pub(crate) fn application_terms(
    app: &LeasingApplication,
) -> Result<ApplicationTerms, CoreError> {
    let leasing_type = LeasingType::parse(&app.leasing_type).map_err(CoreError::Internal)?;
    Ok(ApplicationTerms {
        object_cost: app.object_cost,
        term_months: app.term_months,
        leasing_type,
        is_new_object: app.is_new_object,
    })
}

// ---------------------------------------------------------------------------
// Workflow text templates
//
// Shared by both backends so their system messages and notifications are
// byte-identical.
// ---------------------------------------------------------------------------

pub(crate) fn approval_system_message() -> String {
    "Application approved by an administrator and forwarded to managers for offers".to_string()
}

pub(crate) fn approval_client_notification(application_id: DbId) -> (String, String) {
    (
        "Application approved".to_string(),
        format!("Your application #{application_id} was approved and sent to leasing companies"),
    )
}

pub(crate) fn approval_manager_notification(
    application_id: DbId,
    object_cost: Money,
) -> (String, String) {
    (
        "New application".to_string(),
        format!("New application #{application_id} received, object cost {object_cost}"),
    )
}

pub(crate) fn rejection_system_message(reason: &str) -> String {
    format!("Application rejected by an administrator. Reason: {reason}")
}

pub(crate) fn rejection_client_notification(
    application_id: DbId,
    reason: &str,
) -> (String, String) {
    (
        "Application rejected".to_string(),
        format!("Your application #{application_id} was rejected. Reason: {reason}"),
    )
}

pub(crate) fn status_change_notification(
    application_id: DbId,
    status: ApplicationStatus,
) -> (String, String) {
    (
        "Application status changed".to_string(),
        format!("Your application #{application_id} moved to status: {status}"),
    )
}

pub(crate) fn offer_selected_notification(application_id: DbId) -> (String, String) {
    (
        "Offer selected".to_string(),
        format!("An offer was selected for application #{application_id}; document collection starts"),
    )
}
