//! Application status workflow.
//!
//! The status is a closed enum and every mutation goes through
//! [`validate_transition`], which rejects edges outside the workflow. The
//! happy path is linear; `rejected` and `needs_revision` are side exits
//! available from every non-terminal state after admin review, and
//! `needs_revision` loops back to `pending` once the client resubmits.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Workflow state of a leasing application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Submitted by a client, awaiting admin review.
    Pending,
    /// Admin approved; about to be dispatched to managers.
    ApprovedByAdmin,
    /// Managers at compatible companies are preparing offers.
    CollectingOffers,
    /// The client is comparing received offers.
    ReviewingOffers,
    /// An offer was selected; documents are being gathered.
    CollectingDocuments,
    /// Lease approved by the chosen company.
    Approved,
    /// Client must amend and resubmit the application.
    NeedsRevision,
    /// Leasing contract issued. Terminal.
    Issued,
    /// Declined. Terminal.
    Rejected,
}

impl ApplicationStatus {
    /// The canonical column value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::ApprovedByAdmin => "approved_by_admin",
            ApplicationStatus::CollectingOffers => "collecting_offers",
            ApplicationStatus::ReviewingOffers => "reviewing_offers",
            ApplicationStatus::CollectingDocuments => "collecting_documents",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::NeedsRevision => "needs_revision",
            ApplicationStatus::Issued => "issued",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parse a stored column value.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved_by_admin" => Ok(ApplicationStatus::ApprovedByAdmin),
            "collecting_offers" => Ok(ApplicationStatus::CollectingOffers),
            "reviewing_offers" => Ok(ApplicationStatus::ReviewingOffers),
            "collecting_documents" => Ok(ApplicationStatus::CollectingDocuments),
            "approved" => Ok(ApplicationStatus::Approved),
            "needs_revision" => Ok(ApplicationStatus::NeedsRevision),
            "issued" => Ok(ApplicationStatus::Issued),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("Invalid application status '{other}'")),
        }
    }

    /// Whether no further transitions are allowed from this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Issued | ApplicationStatus::Rejected)
    }

    /// The states reachable from this one.
    pub fn allowed_next(self) -> &'static [ApplicationStatus] {
        use ApplicationStatus::*;
        match self {
            Pending => &[ApprovedByAdmin, Rejected],
            ApprovedByAdmin => &[CollectingOffers, Rejected, NeedsRevision],
            CollectingOffers => &[ReviewingOffers, Rejected, NeedsRevision],
            ReviewingOffers => &[CollectingDocuments, Rejected, NeedsRevision],
            CollectingDocuments => &[Approved, Rejected, NeedsRevision],
            Approved => &[Issued, Rejected, NeedsRevision],
            NeedsRevision => &[Pending],
            Issued | Rejected => &[],
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a status transition, returning `CoreError::Conflict` for any
/// edge outside the workflow.
pub fn validate_transition(from: ApplicationStatus, to: ApplicationStatus) -> CoreResult<()> {
    if from.allowed_next().contains(&to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Cannot move application from '{from}' to '{to}'"
        )))
    }
}
