//! Candidate submission state machine.
//!
//! `not_submitted` is the only state in which the screening checklist may be
//! edited; passing the gate freezes it as the record of what was verified.

use chrono::{DateTime, Utc};

use super::domain::{
    Actor, AuditEntry, CandidateSubmission, ClientFeedback, FeedbackInput, FeedbackStatus,
    Interview, InterviewRequest, InterviewStatus, SubmissionAction, SubmissionStatus,
};
use super::error::{ValidationError, WorkflowError};
use super::screening::{is_screening_complete, ScreeningCheck, ScreeningChecklist};

const ENTITY: &str = "submission";

impl CandidateSubmission {
    pub fn update_checklist(
        &self,
        checklist: ScreeningChecklist,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<Self, WorkflowError> {
        self.ensure_status(&[SubmissionStatus::NotSubmitted], "update_checklist")?;

        let mut next = self.clone();
        let required = ScreeningCheck::MANDATORY.len();
        let note = format!(
            "{} of {required} mandatory checks complete",
            required - checklist.missing_mandatory().len(),
        );
        next.screening_checklist = checklist;
        next.record(SubmissionAction::ScreeningUpdated, actor, at, Some(note));
        Ok(next)
    }

    pub fn submit(&self, actor: &Actor, at: DateTime<Utc>) -> Result<Self, WorkflowError> {
        self.ensure_status(&[SubmissionStatus::NotSubmitted], "submit")?;
        is_screening_complete(&self.screening_checklist)?;

        let mut next = self.clone();
        next.status = SubmissionStatus::Submitted;
        next.submitted_at = Some(at);
        next.submitted_by = Some(actor.id.clone());
        next.record(SubmissionAction::Submitted, actor, at, None);
        Ok(next)
    }

    pub fn record_client_feedback(
        &self,
        feedback: FeedbackInput,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<Self, WorkflowError> {
        let allowed: &[FeedbackStatus] = match self.status {
            SubmissionStatus::Submitted => &[
                FeedbackStatus::Shortlisted,
                FeedbackStatus::Interview,
                FeedbackStatus::Rejected,
            ],
            SubmissionStatus::Shortlisted => &[FeedbackStatus::Rejected],
            SubmissionStatus::Interview => &[FeedbackStatus::Offered, FeedbackStatus::Rejected],
            _ => &[],
        };
        if !allowed.contains(&feedback.status) {
            return Err(WorkflowError::invalid(
                ENTITY,
                self.status.label(),
                "record_client_feedback",
            ));
        }

        if let Some(rating) = feedback.rating {
            if !(1..=5).contains(&rating) {
                return Err(ValidationError::RatingOutOfRange { rating }.into());
            }
        }
        if feedback.feedback_by.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "feedback_by",
            }
            .into());
        }

        let mut next = self.clone();
        next.status = feedback.status.target();
        let note = format!("client marked {}", next.status.label());
        next.client_feedback = Some(ClientFeedback {
            status: feedback.status,
            rating: feedback.rating,
            comments: feedback.comments,
            feedback_by: feedback.feedback_by,
            feedback_date: at,
        });
        next.record(SubmissionAction::ClientFeedback, actor, at, Some(note));
        Ok(next)
    }

    pub fn schedule_interview(
        &self,
        request: InterviewRequest,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<Self, WorkflowError> {
        self.ensure_status(
            &[SubmissionStatus::Shortlisted, SubmissionStatus::Interview],
            "schedule_interview",
        )?;

        if request.scheduled_at < at {
            return Err(ValidationError::InterviewInPast.into());
        }
        if request.duration_minutes == 0 {
            return Err(ValidationError::InvalidInterviewDuration.into());
        }
        if request.round.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "round" }.into());
        }
        if request.interviewer.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "interviewer",
            }
            .into());
        }

        let mut next = self.clone();
        let interview = Interview {
            id: format!("INT-{:03}", next.interviews.len() + 1),
            round: request.round,
            format: request.format,
            scheduled_at: request.scheduled_at,
            duration_minutes: request.duration_minutes,
            interviewer: request.interviewer,
            meeting_link: request.meeting_link,
            location: request.location,
            notes: request.notes,
            status: InterviewStatus::Scheduled,
        };
        let note = format!(
            "{} on {}",
            interview.round,
            interview.scheduled_at.format("%Y-%m-%d %H:%M UTC")
        );
        next.interviews.push(interview);
        next.status = SubmissionStatus::Interview;
        next.record(SubmissionAction::InterviewScheduled, actor, at, Some(note));
        Ok(next)
    }

    pub fn candidate_accepts(
        &self,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<Self, WorkflowError> {
        self.ensure_status(&[SubmissionStatus::Offered], "candidate_accepts")?;

        let mut next = self.clone();
        next.status = SubmissionStatus::Accepted;
        next.record(SubmissionAction::CandidateAccepted, actor, at, None);
        Ok(next)
    }

    pub fn candidate_declines(
        &self,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Result<Self, WorkflowError> {
        self.ensure_status(&[SubmissionStatus::Offered], "candidate_declines")?;

        let mut next = self.clone();
        next.status = SubmissionStatus::Rejected;
        next.record(
            SubmissionAction::CandidateDeclined,
            actor,
            at,
            Some("candidate declined offer".to_string()),
        );
        Ok(next)
    }

    fn ensure_status(
        &self,
        allowed: &[SubmissionStatus],
        operation: &'static str,
    ) -> Result<(), WorkflowError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(WorkflowError::invalid(
                ENTITY,
                self.status.label(),
                operation,
            ))
        }
    }

    fn record(
        &mut self,
        action: SubmissionAction,
        actor: &Actor,
        at: DateTime<Utc>,
        note: Option<String>,
    ) {
        self.history.push(AuditEntry {
            action,
            actor: actor.id.clone(),
            timestamp: at,
            note,
        });
    }
}
