//! Workflow operations over `leasing_applications` and `leasing_offers`.
//!
//! Every operation here runs in a single transaction so the status change,
//! the system message, and the notification fan-out commit or roll back
//! together.

use async_trait::async_trait;
use leaseflow_core::error::CoreError;
use leaseflow_core::leasing::{NOTIFY_ERROR, NOTIFY_INFO, NOTIFY_SUCCESS};
use leaseflow_core::matching::is_compatible;
use leaseflow_core::roles::ROLE_MANAGER;
use leaseflow_core::status::{validate_transition, ApplicationStatus};
use leaseflow_core::types::DbId;
use sqlx::{PgConnection, Postgres, Transaction};

use crate::models::application::LeasingApplication;
use crate::models::company::LeasingCompany;
use crate::models::offer::LeasingOffer;
use crate::store::{
    approval_client_notification, approval_manager_notification, approval_system_message,
    offer_selected_notification, rejection_client_notification, rejection_system_message,
    status_change_notification, StoreResult, WorkflowStore,
};

use super::{applications, companies, offers, PgStorage};

/// Load an application row and lock it for the rest of the transaction.
async fn lock_application(
    conn: &mut PgConnection,
    id: DbId,
) -> StoreResult<LeasingApplication> {
    let query = format!(
        "SELECT {} FROM leasing_applications WHERE id = $1 FOR UPDATE",
        applications::COLUMNS
    );
    sqlx::query_as::<_, LeasingApplication>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "LeasingApplication",
                id,
            }
            .into()
        })
}

async fn set_status(
    conn: &mut PgConnection,
    id: DbId,
    status: ApplicationStatus,
) -> StoreResult<LeasingApplication> {
    let query = format!(
        "UPDATE leasing_applications \
         SET status = $2, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {}",
        applications::COLUMNS
    );
    Ok(sqlx::query_as::<_, LeasingApplication>(&query)
        .bind(id)
        .bind(status.as_str())
        .fetch_one(conn)
        .await?)
}

async fn insert_system_message(
    conn: &mut PgConnection,
    application_id: DbId,
    sender_id: DbId,
    body: &str,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO application_messages (application_id, sender_id, body, is_system) \
         VALUES ($1, $2, $3, true)",
    )
    .bind(application_id)
    .bind(sender_id)
    .bind(body)
    .execute(conn)
    .await?;
    Ok(())
}

async fn insert_notification(
    conn: &mut PgConnection,
    user_id: DbId,
    title: &str,
    message: &str,
    kind: &str,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO notifications (user_id, title, message, kind) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(title)
    .bind(message)
    .bind(kind)
    .execute(conn)
    .await?;
    Ok(())
}

/// Active companies compatible with the application, computed in one place
/// so the approval fan-out and the listing endpoint never disagree.
async fn compatible_companies_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    app: &LeasingApplication,
) -> StoreResult<Vec<LeasingCompany>> {
    let terms = crate::store::application_terms(app)?;
    let query = format!(
        "SELECT {} FROM leasing_companies WHERE is_active = true",
        companies::COLUMNS
    );
    let active = sqlx::query_as::<_, LeasingCompany>(&query)
        .fetch_all(&mut **tx)
        .await?;
    Ok(active
        .into_iter()
        .filter(|c| is_compatible(&terms, &c.terms()))
        .collect())
}

#[async_trait]
impl WorkflowStore for PgStorage {
    async fn approve_application(
        &self,
        id: DbId,
        admin_id: DbId,
    ) -> StoreResult<LeasingApplication> {
        let mut tx = self.pool().begin().await?;

        let app = lock_application(&mut *tx, id).await?;
        validate_transition(app.workflow_status()?, ApplicationStatus::ApprovedByAdmin)?;

        insert_system_message(&mut *tx, id, admin_id, &approval_system_message()).await?;

        let (title, message) = approval_client_notification(id);
        insert_notification(&mut *tx, app.client_id, &title, &message, NOTIFY_SUCCESS).await?;

        let compatible = compatible_companies_in_tx(&mut tx, &app).await?;
        let company_ids: Vec<DbId> = compatible.iter().map(|c| c.id).collect();
        let manager_ids: Vec<DbId> = sqlx::query_scalar(
            "SELECT id FROM users \
             WHERE role = $1 AND is_active = true AND company_id = ANY($2)",
        )
        .bind(ROLE_MANAGER)
        .bind(&company_ids)
        .fetch_all(&mut *tx)
        .await?;
        for manager_id in manager_ids {
            let (title, message) = approval_manager_notification(id, app.object_cost);
            insert_notification(&mut *tx, manager_id, &title, &message, NOTIFY_INFO).await?;
        }

        let updated = set_status(&mut *tx, id, ApplicationStatus::CollectingOffers).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn reject_application(
        &self,
        id: DbId,
        admin_id: DbId,
        reason: &str,
    ) -> StoreResult<LeasingApplication> {
        let mut tx = self.pool().begin().await?;

        let app = lock_application(&mut *tx, id).await?;
        validate_transition(app.workflow_status()?, ApplicationStatus::Rejected)?;

        insert_system_message(&mut *tx, id, admin_id, &rejection_system_message(reason)).await?;
        let (title, message) = rejection_client_notification(id, reason);
        insert_notification(&mut *tx, app.client_id, &title, &message, NOTIFY_ERROR).await?;

        let updated = set_status(&mut *tx, id, ApplicationStatus::Rejected).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn update_application_status(
        &self,
        id: DbId,
        status: ApplicationStatus,
    ) -> StoreResult<LeasingApplication> {
        let mut tx = self.pool().begin().await?;

        let app = lock_application(&mut *tx, id).await?;
        validate_transition(app.workflow_status()?, status)?;

        let (title, message) = status_change_notification(id, status);
        insert_notification(&mut *tx, app.client_id, &title, &message, NOTIFY_INFO).await?;

        let updated = set_status(&mut *tx, id, status).await?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn select_offer(&self, offer_id: DbId) -> StoreResult<LeasingOffer> {
        let mut tx = self.pool().begin().await?;

        let query = format!(
            "SELECT {} FROM leasing_offers WHERE id = $1 FOR UPDATE",
            offers::COLUMNS
        );
        let offer = sqlx::query_as::<_, LeasingOffer>(&query)
            .bind(offer_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "LeasingOffer",
                id: offer_id,
            })?;

        let app = lock_application(&mut *tx, offer.application_id).await?;

        // Selection straight from collecting_offers passes through the
        // reviewing step implicitly.
        let mut current = app.workflow_status()?;
        if current == ApplicationStatus::CollectingOffers {
            validate_transition(current, ApplicationStatus::ReviewingOffers)?;
            current = ApplicationStatus::ReviewingOffers;
        }
        validate_transition(current, ApplicationStatus::CollectingDocuments)?;

        sqlx::query(
            "UPDATE leasing_offers \
             SET is_selected = (id = $1) \
             WHERE application_id = $2",
        )
        .bind(offer_id)
        .bind(offer.application_id)
        .execute(&mut *tx)
        .await?;

        set_status(&mut *tx, offer.application_id, ApplicationStatus::CollectingDocuments)
            .await?;

        let (title, message) = offer_selected_notification(offer.application_id);
        insert_notification(&mut *tx, app.client_id, &title, &message, NOTIFY_SUCCESS).await?;

        let query = format!("SELECT {} FROM leasing_offers WHERE id = $1", offers::COLUMNS);
        let selected = sqlx::query_as::<_, LeasingOffer>(&query)
            .bind(offer_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(selected)
    }

    async fn compatible_companies(
        &self,
        application_id: DbId,
    ) -> StoreResult<Vec<LeasingCompany>> {
        let mut tx = self.pool().begin().await?;
        let app = lock_application(&mut *tx, application_id).await?;
        let compatible = compatible_companies_in_tx(&mut tx, &app).await?;
        tx.commit().await?;
        Ok(compatible)
    }
}
