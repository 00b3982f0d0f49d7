//! In-memory storage implementation.
//!
//! Backs development without a database and the integration test suite.
//! State lives behind a single `RwLock`, so workflow operations are atomic
//! with respect to each other. The instance is injected through
//! `AppState`; nothing here is process-global.

use async_trait::async_trait;
use chrono::Utc;
use leaseflow_core::error::CoreError;
use leaseflow_core::leasing::{LeasingType, NOTIFY_ERROR, NOTIFY_INFO, NOTIFY_SUCCESS};
use leaseflow_core::matching::is_compatible;
use leaseflow_core::roles::ROLE_MANAGER;
use leaseflow_core::status::{validate_transition, ApplicationStatus};
use leaseflow_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::application::{CreateApplication, LeasingApplication};
use crate::models::car::{Car, CarFilter, CreateCar, CAR_AVAILABLE};
use crate::models::company::{CreateCompany, LeasingCompany};
use crate::models::document::{CreateDocument, Document};
use crate::models::message::{ApplicationMessage, CreateMessage};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::offer::{CreateOffer, LeasingOffer};
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, UpdateUser, User};

use super::{
    approval_client_notification, approval_manager_notification, approval_system_message,
    offer_selected_notification, rejection_client_notification, rejection_system_message,
    status_change_notification, ApplicationStore, CarStore, CompanyStore, DocumentStore,
    MessageStore, NotificationStore, OfferStore, SessionStore, StoreResult, UserStore,
    WorkflowStore, NOTIFICATION_PAGE,
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    applications: Vec<LeasingApplication>,
    offers: Vec<LeasingOffer>,
    companies: Vec<LeasingCompany>,
    cars: Vec<Car>,
    documents: Vec<Document>,
    notifications: Vec<Notification>,
    messages: Vec<ApplicationMessage>,
    sessions: Vec<Session>,
    next_id: DbId,
}

impl Inner {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn push_notification(&mut self, user_id: DbId, title: String, message: String, kind: &str) {
        let id = self.next_id();
        self.notifications.push(Notification {
            id,
            user_id,
            title,
            message,
            kind: kind.to_string(),
            is_read: false,
            created_at: Utc::now(),
        });
    }

    fn push_system_message(&mut self, application_id: DbId, sender_id: DbId, body: String) {
        let id = self.next_id();
        self.messages.push(ApplicationMessage {
            id,
            application_id,
            sender_id,
            body,
            is_system: true,
            created_at: Utc::now(),
        });
    }

    fn compatible_company_ids(&self, app: &LeasingApplication) -> Result<Vec<DbId>, CoreError> {
        let terms = super::application_terms(app)?;
        Ok(self
            .companies
            .iter()
            .filter(|c| is_compatible(&terms, &c.terms()))
            .map(|c| c.id)
            .collect())
    }
}

/// In-memory [`super::Storage`] implementation.
pub struct MemStorage {
    inner: RwLock<Inner>,
}

impl MemStorage {
    pub fn new() -> Self {
        MemStorage {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemStorage {
    async fn create_user(&self, input: CreateUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.username == input.username) {
            return Err(CoreError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            ))
            .into());
        }
        let now = Utc::now();
        let id = inner.next_id();
        let user = User {
            id,
            username: input.username,
            password_hash: input.password_hash,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role,
            phone: input.phone,
            tax_id: input.tax_id,
            company_id: input.company_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: DbId) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.clone())
    }

    async fn update_user(&self, id: DbId, input: UpdateUser) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = input.email {
            user.email = Some(email);
        }
        if let Some(first_name) = input.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = input.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(phone) = input.phone {
            user.phone = Some(phone);
        }
        if let Some(tax_id) = input.tax_id {
            user.tax_id = Some(tax_id);
        }
        if let Some(company_id) = input.company_id {
            user.company_id = Some(company_id);
        }
        if let Some(is_active) = input.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: DbId) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        Ok(inner.users.len() < before)
    }
}

#[async_trait]
impl ApplicationStore for MemStorage {
    async fn create_application(
        &self,
        input: CreateApplication,
    ) -> StoreResult<LeasingApplication> {
        LeasingType::parse(&input.leasing_type)
            .map_err(CoreError::Validation)?;
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let id = inner.next_id();
        let app = LeasingApplication {
            id,
            client_id: input.client_id,
            agent_id: input.agent_id,
            object_cost: input.object_cost,
            down_payment_percent: input.down_payment_percent,
            term_months: input.term_months,
            leasing_type: input.leasing_type,
            client_phone: input.client_phone,
            client_tax_id: input.client_tax_id,
            is_new_object: input.is_new_object,
            is_for_rental: input.is_for_rental,
            comment: input.comment,
            status: ApplicationStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.applications.push(app.clone());
        Ok(app)
    }

    async fn get_application(&self, id: DbId) -> StoreResult<Option<LeasingApplication>> {
        let inner = self.inner.read().await;
        Ok(inner.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list_applications(&self) -> StoreResult<Vec<LeasingApplication>> {
        let inner = self.inner.read().await;
        Ok(inner.applications.clone())
    }

    async fn list_applications_by_client(
        &self,
        client_id: DbId,
    ) -> StoreResult<Vec<LeasingApplication>> {
        let inner = self.inner.read().await;
        Ok(inner
            .applications
            .iter()
            .filter(|a| a.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn list_applications_by_agent(
        &self,
        agent_id: DbId,
    ) -> StoreResult<Vec<LeasingApplication>> {
        let inner = self.inner.read().await;
        Ok(inner
            .applications
            .iter()
            .filter(|a| a.agent_id == Some(agent_id))
            .cloned()
            .collect())
    }

    async fn list_applications_by_status(
        &self,
        status: ApplicationStatus,
    ) -> StoreResult<Vec<LeasingApplication>> {
        let inner = self.inner.read().await;
        Ok(inner
            .applications
            .iter()
            .filter(|a| a.status == status.as_str())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkflowStore for MemStorage {
    async fn approve_application(
        &self,
        id: DbId,
        admin_id: DbId,
    ) -> StoreResult<LeasingApplication> {
        let mut inner = self.inner.write().await;

        let app = inner
            .applications
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "LeasingApplication",
                id,
            })?;
        let current = app.workflow_status()?;
        validate_transition(current, ApplicationStatus::ApprovedByAdmin)?;

        inner.push_system_message(id, admin_id, approval_system_message());

        let (title, message) = approval_client_notification(id);
        inner.push_notification(app.client_id, title, message, NOTIFY_SUCCESS);

        // Fan out to active managers of compatible companies.
        let compatible = inner.compatible_company_ids(&app)?;
        let manager_ids: Vec<DbId> = inner
            .users
            .iter()
            .filter(|u| {
                u.role == ROLE_MANAGER
                    && u.is_active
                    && u.company_id.map(|c| compatible.contains(&c)).unwrap_or(false)
            })
            .map(|u| u.id)
            .collect();
        for manager_id in manager_ids {
            let (title, message) = approval_manager_notification(id, app.object_cost);
            inner.push_notification(manager_id, title, message, NOTIFY_INFO);
        }

        let updated = {
            let app = inner
                .applications
                .iter_mut()
                .find(|a| a.id == id)
                .expect("application disappeared under write lock");
            app.status = ApplicationStatus::CollectingOffers.as_str().to_string();
            app.updated_at = Utc::now();
            app.clone()
        };
        Ok(updated)
    }

    async fn reject_application(
        &self,
        id: DbId,
        admin_id: DbId,
        reason: &str,
    ) -> StoreResult<LeasingApplication> {
        let mut inner = self.inner.write().await;

        let app = inner
            .applications
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "LeasingApplication",
                id,
            })?;
        let current = app.workflow_status()?;
        validate_transition(current, ApplicationStatus::Rejected)?;

        inner.push_system_message(id, admin_id, rejection_system_message(reason));
        let (title, message) = rejection_client_notification(id, reason);
        inner.push_notification(app.client_id, title, message, NOTIFY_ERROR);

        let updated = {
            let app = inner
                .applications
                .iter_mut()
                .find(|a| a.id == id)
                .expect("application disappeared under write lock");
            app.status = ApplicationStatus::Rejected.as_str().to_string();
            app.updated_at = Utc::now();
            app.clone()
        };
        Ok(updated)
    }

    async fn update_application_status(
        &self,
        id: DbId,
        status: ApplicationStatus,
    ) -> StoreResult<LeasingApplication> {
        let mut inner = self.inner.write().await;

        let app = inner
            .applications
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "LeasingApplication",
                id,
            })?;
        validate_transition(app.workflow_status()?, status)?;

        let (title, message) = status_change_notification(id, status);
        inner.push_notification(app.client_id, title, message, NOTIFY_INFO);

        let updated = {
            let app = inner
                .applications
                .iter_mut()
                .find(|a| a.id == id)
                .expect("application disappeared under write lock");
            app.status = status.as_str().to_string();
            app.updated_at = Utc::now();
            app.clone()
        };
        Ok(updated)
    }

    async fn select_offer(&self, offer_id: DbId) -> StoreResult<LeasingOffer> {
        let mut inner = self.inner.write().await;

        let offer = inner
            .offers
            .iter()
            .find(|o| o.id == offer_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "LeasingOffer",
                id: offer_id,
            })?;
        let application_id = offer.application_id;

        let app = inner
            .applications
            .iter()
            .find(|a| a.id == application_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "LeasingApplication",
                id: application_id,
            })?;

        // Selection straight from collecting_offers passes through the
        // reviewing step implicitly.
        let mut current = app.workflow_status()?;
        if current == ApplicationStatus::CollectingOffers {
            validate_transition(current, ApplicationStatus::ReviewingOffers)?;
            current = ApplicationStatus::ReviewingOffers;
        }
        validate_transition(current, ApplicationStatus::CollectingDocuments)?;

        for o in inner
            .offers
            .iter_mut()
            .filter(|o| o.application_id == application_id)
        {
            o.is_selected = o.id == offer_id;
        }

        {
            let app = inner
                .applications
                .iter_mut()
                .find(|a| a.id == application_id)
                .expect("application disappeared under write lock");
            app.status = ApplicationStatus::CollectingDocuments.as_str().to_string();
            app.updated_at = Utc::now();
        }

        let (title, message) = offer_selected_notification(application_id);
        inner.push_notification(app.client_id, title, message, NOTIFY_SUCCESS);

        let selected = inner
            .offers
            .iter()
            .find(|o| o.id == offer_id)
            .cloned()
            .expect("offer disappeared under write lock");
        Ok(selected)
    }

    async fn compatible_companies(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<LeasingCompany>> {
        let inner = self.inner.read().await;
        let app = inner
            .applications
            .iter()
            .find(|a| a.id == application_id)
            .ok_or(CoreError::NotFound {
                entity: "LeasingApplication",
                id: application_id,
            })?;
        let terms = super::application_terms(app)?;
        Ok(inner
            .companies
            .iter()
            .filter(|c| is_compatible(&terms, &c.terms()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OfferStore for MemStorage {
    async fn create_offer(&self, input: CreateOffer) -> StoreResult<LeasingOffer> {
        let mut inner = self.inner.write().await;
        if !inner
            .applications
            .iter()
            .any(|a| a.id == input.application_id)
        {
            return Err(CoreError::NotFound {
                entity: "LeasingApplication",
                id: input.application_id,
            }
            .into());
        }
        let id = inner.next_id();
        let offer = LeasingOffer {
            id,
            application_id: input.application_id,
            company_id: input.company_id,
            manager_id: input.manager_id,
            monthly_payment: input.monthly_payment,
            first_payment: input.first_payment,
            buyout_payment: input.buyout_payment,
            total_cost: input.total_cost,
            interest_rate: input.interest_rate,
            is_selected: false,
            created_at: Utc::now(),
        };
        inner.offers.push(offer.clone());
        Ok(offer)
    }

    async fn get_offer(&self, id: DbId) -> StoreResult<Option<LeasingOffer>> {
        let inner = self.inner.read().await;
        Ok(inner.offers.iter().find(|o| o.id == id).cloned())
    }

    async fn list_offers_by_application(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<LeasingOffer>> {
        let inner = self.inner.read().await;
        Ok(inner
            .offers
            .iter()
            .filter(|o| o.application_id == application_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CompanyStore for MemStorage {
    async fn create_company(&self, input: CreateCompany) -> StoreResult<LeasingCompany> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let company = LeasingCompany {
            id,
            name: input.name,
            description: input.description,
            is_active: true,
            min_amount: input.min_amount,
            max_amount: input.max_amount,
            min_term_months: input.min_term_months,
            max_term_months: input.max_term_months,
            interest_rate: input.interest_rate,
            works_with_auto: input.works_with_auto,
            works_with_equipment: input.works_with_equipment,
            works_with_real_estate: input.works_with_real_estate,
            works_with_used: input.works_with_used,
            created_at: Utc::now(),
        };
        inner.companies.push(company.clone());
        Ok(company)
    }

    async fn get_company(&self, id: DbId) -> StoreResult<Option<LeasingCompany>> {
        let inner = self.inner.read().await;
        Ok(inner.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn list_active_companies(&self) -> StoreResult<Vec<LeasingCompany>> {
        let inner = self.inner.read().await;
        Ok(inner
            .companies
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    async fn list_all_companies(&self) -> StoreResult<Vec<LeasingCompany>> {
        let inner = self.inner.read().await;
        Ok(inner.companies.clone())
    }
}

#[async_trait]
impl CarStore for MemStorage {
    async fn create_car(&self, input: CreateCar) -> StoreResult<Car> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let id = inner.next_id();
        let car = Car {
            id,
            brand: input.brand,
            model: input.model,
            year: input.year,
            price: input.price,
            engine: input.engine,
            transmission: input.transmission,
            drive: input.drive,
            status: CAR_AVAILABLE.to_string(),
            is_new: input.is_new,
            supplier_id: input.supplier_id,
            created_at: now,
            updated_at: now,
        };
        inner.cars.push(car.clone());
        Ok(car)
    }

    async fn list_cars(&self, filter: &CarFilter) -> StoreResult<Vec<Car>> {
        let inner = self.inner.read().await;
        Ok(inner
            .cars
            .iter()
            .filter(|car| {
                if let Some(brand) = &filter.brand {
                    if !car.brand.eq_ignore_ascii_case(brand) {
                        return false;
                    }
                }
                if let Some(model) = &filter.model {
                    if !car.model.eq_ignore_ascii_case(model) {
                        return false;
                    }
                }
                if let Some(year) = filter.year {
                    if car.year != year {
                        return false;
                    }
                }
                if let Some(min) = filter.min_price {
                    if car.price < min {
                        return false;
                    }
                }
                if let Some(max) = filter.max_price {
                    if car.price > max {
                        return false;
                    }
                }
                if let Some(is_new) = filter.is_new {
                    if car.is_new != is_new {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect())
    }

    async fn list_cars_by_supplier(&self, supplier_id: DbId) -> StoreResult<Vec<Car>> {
        let inner = self.inner.read().await;
        Ok(inner
            .cars
            .iter()
            .filter(|c| c.supplier_id == Some(supplier_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DocumentStore for MemStorage {
    async fn create_document(&self, input: CreateDocument) -> StoreResult<Document> {
        let mut inner = self.inner.write().await;
        if !inner
            .applications
            .iter()
            .any(|a| a.id == input.application_id)
        {
            return Err(CoreError::NotFound {
                entity: "LeasingApplication",
                id: input.application_id,
            }
            .into());
        }
        let id = inner.next_id();
        let document = Document {
            id,
            application_id: input.application_id,
            file_name: input.file_name,
            file_url: input.file_url,
            document_type: input.document_type,
            uploaded_by: input.uploaded_by,
            created_at: Utc::now(),
        };
        inner.documents.push(document.clone());
        Ok(document)
    }

    async fn list_documents_by_application(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .documents
            .iter()
            .filter(|d| d.application_id == application_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationStore for MemStorage {
    async fn create_notification(
        &self,
        input: CreateNotification,
    ) -> StoreResult<Notification> {
        let mut inner = self.inner.write().await;
        inner.push_notification(input.user_id, input.title, input.message, &input.kind);
        Ok(inner
            .notifications
            .last()
            .cloned()
            .expect("notification just pushed"))
    }

    async fn list_notifications_for_user(
        &self,
        user_id: DbId,
    ) -> StoreResult<Vec<Notification>> {
        let inner = self.inner.read().await;
        let mut notifications: Vec<Notification> = inner
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        // Newest first; ids are monotonic so they break created_at ties.
        notifications.sort_by(|a, b| b.id.cmp(&a.id));
        notifications.truncate(NOTIFICATION_PAGE as usize);
        Ok(notifications)
    }

    async fn mark_notification_read(
        &self,
        notification_id: DbId,
        user_id: DbId,
    ) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id && n.user_id == user_id)
        {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn unread_count(&self, user_id: DbId) -> StoreResult<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }
}

#[async_trait]
impl MessageStore for MemStorage {
    async fn create_message(&self, input: CreateMessage) -> StoreResult<ApplicationMessage> {
        let mut inner = self.inner.write().await;
        if !inner
            .applications
            .iter()
            .any(|a| a.id == input.application_id)
        {
            return Err(CoreError::NotFound {
                entity: "LeasingApplication",
                id: input.application_id,
            }
            .into());
        }
        let id = inner.next_id();
        let message = ApplicationMessage {
            id,
            application_id: input.application_id,
            sender_id: input.sender_id,
            body: input.body,
            is_system: input.is_system,
            created_at: Utc::now(),
        };
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages_for_application(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<ApplicationMessage>> {
        let inner = self.inner.read().await;
        let mut messages: Vec<ApplicationMessage> = inner
            .messages
            .iter()
            .filter(|m| m.application_id == application_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(messages)
    }
}

#[async_trait]
impl SessionStore for MemStorage {
    async fn create_session(&self, input: CreateSession) -> StoreResult<Session> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let session = Session {
            id,
            user_id: input.user_id,
            refresh_token_hash: input.refresh_token_hash,
            expires_at: input.expires_at,
            revoked_at: None,
            created_at: Utc::now(),
        };
        inner.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_session_by_token_hash(&self, hash: &str) -> StoreResult<Option<Session>> {
        let inner = self.inner.read().await;
        let now = Utc::now();
        Ok(inner
            .sessions
            .iter()
            .find(|s| s.refresh_token_hash == hash && s.revoked_at.is_none() && s.expires_at > now)
            .cloned())
    }

    async fn revoke_session(&self, id: DbId) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(session) = inner.sessions.iter_mut().find(|s| s.id == id) {
            session.revoked_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn revoke_all_sessions_for_user(&self, user_id: DbId) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        for session in inner
            .sessions
            .iter_mut()
            .filter(|s| s.user_id == user_id && s.revoked_at.is_none())
        {
            session.revoked_at = Some(now);
        }
        Ok(())
    }
}
