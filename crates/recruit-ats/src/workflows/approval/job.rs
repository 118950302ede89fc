//! Job approval state machine.
//!
//! ```text
//! draft ──submit_for_review──▶ pending_review ──approve──▶ approved
//!                                 ▲       │
//!              submit_for_review  │       └──reject──▶ rejected
//!                                 └──────────────────────┘
//! ```
//!
//! Each method returns the next state and leaves `self` untouched, so a failed
//! transition can never leave a half-applied posting behind.

use chrono::{DateTime, Utc};

use super::domain::{
    Actor, AuditEntry, Capability, JobApprovalAction, JobApprovalStatus, JobPosting,
};
use super::error::{ValidationError, WorkflowError};

const ENTITY: &str = "job";

impl JobPosting {
    pub fn submit_for_review(
        &self,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<Self, WorkflowError> {
        match self.approval_status {
            JobApprovalStatus::Draft => self.ensure_reviewable()?,
            JobApprovalStatus::Rejected => {}
            other => {
                return Err(WorkflowError::invalid(
                    ENTITY,
                    other.label(),
                    "submit_for_review",
                ))
            }
        }

        let mut next = self.clone();
        next.approval_status = JobApprovalStatus::PendingReview;
        next.rejection_reason = None;
        next.record(JobApprovalAction::SubmittedForReview, actor, at, None);
        Ok(next)
    }

    pub fn approve(&self, actor: &Actor, at: DateTime<Utc>) -> Result<Self, WorkflowError> {
        self.ensure_pending("approve")?;
        require_approver(actor)?;

        let mut next = self.clone();
        next.approval_status = JobApprovalStatus::Approved;
        next.record(JobApprovalAction::Approved, actor, at, None);
        Ok(next)
    }

    pub fn reject(
        &self,
        actor: &Actor,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<Self, WorkflowError> {
        self.ensure_pending("reject")?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ValidationError::EmptyRejectionReason.into());
        }
        require_approver(actor)?;

        let mut next = self.clone();
        next.approval_status = JobApprovalStatus::Rejected;
        next.rejection_reason = Some(reason.to_string());
        next.record(
            JobApprovalAction::Rejected,
            actor,
            at,
            Some(reason.to_string()),
        );
        Ok(next)
    }

    /// Most recent approval action, as shown on the job detail panel.
    pub fn last_action(&self) -> Option<&AuditEntry<JobApprovalAction>> {
        self.approval_history.last()
    }

    fn ensure_pending(&self, operation: &'static str) -> Result<(), WorkflowError> {
        if self.approval_status == JobApprovalStatus::PendingReview {
            Ok(())
        } else {
            Err(WorkflowError::invalid(
                ENTITY,
                self.approval_status.label(),
                operation,
            ))
        }
    }

    fn ensure_reviewable(&self) -> Result<(), ValidationError> {
        let fields = [
            ("title", &self.title),
            ("client", &self.client),
            ("description", &self.description),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField { field });
            }
        }
        Ok(())
    }

    fn record(
        &mut self,
        action: JobApprovalAction,
        actor: &Actor,
        at: DateTime<Utc>,
        note: Option<String>,
    ) {
        self.approval_history.push(AuditEntry {
            action,
            actor: actor.id.clone(),
            timestamp: at,
            note,
        });
    }
}

fn require_approver(actor: &Actor) -> Result<(), ValidationError> {
    if actor.has(Capability::Approver) {
        Ok(())
    } else {
        Err(ValidationError::MissingCapability {
            actor: actor.id.clone(),
            capability: Capability::Approver,
        })
    }
}
