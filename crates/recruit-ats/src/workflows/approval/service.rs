use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::clock::{Clock, SystemClock};
use super::domain::{
    Actor, ActorId, CandidateId, CandidateSubmission, Capability, FeedbackInput,
    InterviewRequest, JobApprovalStatus, JobDraft, JobId, JobPosting, SubmissionId,
};
use super::error::{ValidationError, WorkflowError};
use super::report::PipelineSummary;
use super::repository::{
    IdentityProvider, JobRepository, NotificationPublisher, RepositoryError,
    SubmissionRepository, WorkflowNotification,
};
use super::screening::ScreeningChecklist;

/// Caller of the approval engine: loads records, checks the caller's expected
/// version, applies one transition, saves, then notifies.
pub struct ApprovalWorkflowService<R, N> {
    store: Arc<R>,
    notifications: Arc<N>,
    identities: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
    pending_limit: usize,
}

const DEFAULT_PENDING_LIMIT: usize = 25;

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SUBMISSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("JOB-{id:06}"))
}

fn next_submission_id() -> SubmissionId {
    let id = SUBMISSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SubmissionId(format!("SUB-{id:06}"))
}

impl<R, N> ApprovalWorkflowService<R, N>
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(
        store: Arc<R>,
        notifications: Arc<N>,
        identities: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            store,
            notifications,
            identities,
            clock: Arc::new(SystemClock),
            pending_limit: DEFAULT_PENDING_LIMIT,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_pending_limit(mut self, limit: usize) -> Self {
        self.pending_limit = limit.max(1);
        self
    }

    /// Page size used when a review queue request names no limit.
    pub fn pending_limit(&self) -> usize {
        self.pending_limit
    }

    pub fn resolve_actor(&self, actor_id: &ActorId) -> Result<Actor, WorkflowServiceError> {
        self.identities
            .resolve(actor_id)
            .ok_or_else(|| WorkflowServiceError::UnknownActor(actor_id.clone()))
    }

    /// Store a new job posting in `draft`.
    pub fn create_job(
        &self,
        draft: JobDraft,
        actor: &Actor,
    ) -> Result<JobPosting, WorkflowServiceError> {
        let job = JobPosting::draft(next_job_id(), draft);
        let stored = self.store.insert_job(job)?;
        info!(job_id = %stored.id, actor = %actor.id, "job drafted");
        Ok(stored)
    }

    pub fn get_job(&self, job_id: &JobId) -> Result<JobPosting, WorkflowServiceError> {
        let job = self
            .store
            .load_job(job_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(job)
    }

    pub fn submit_job_for_review(
        &self,
        job_id: &JobId,
        expected_version: u64,
        actor: &Actor,
    ) -> Result<JobPosting, WorkflowServiceError> {
        self.transition_job(
            job_id,
            expected_version,
            actor,
            "job_submitted_for_review",
            |job, at| job.submit_for_review(actor, at),
        )
    }

    pub fn approve_job(
        &self,
        job_id: &JobId,
        expected_version: u64,
        actor: &Actor,
    ) -> Result<JobPosting, WorkflowServiceError> {
        self.transition_job(job_id, expected_version, actor, "job_approved", |job, at| {
            job.approve(actor, at)
        })
    }

    pub fn reject_job(
        &self,
        job_id: &JobId,
        expected_version: u64,
        actor: &Actor,
        reason: &str,
    ) -> Result<JobPosting, WorkflowServiceError> {
        self.transition_job(job_id, expected_version, actor, "job_rejected", |job, at| {
            job.reject(actor, reason, at)
        })
    }

    /// Jobs waiting on an approver, oldest first.
    pub fn pending_reviews(&self, limit: usize) -> Result<Vec<JobPosting>, WorkflowServiceError> {
        Ok(self.store.pending_review(limit)?)
    }

    /// Open a screening record for a candidate against an approved job. A second
    /// open record for the same candidate is refused by the store as `Conflict`.
    pub fn begin_screening(
        &self,
        job_id: &JobId,
        candidate_id: CandidateId,
        actor: &Actor,
    ) -> Result<CandidateSubmission, WorkflowServiceError> {
        if !actor.has(Capability::Recruiter) {
            return Err(WorkflowError::from(ValidationError::MissingCapability {
                actor: actor.id.clone(),
                capability: Capability::Recruiter,
            })
            .into());
        }

        let job = self.get_job(job_id)?;
        if job.approval_status != JobApprovalStatus::Approved {
            return Err(WorkflowError::from(ValidationError::JobNotApproved {
                job_id: job.id.0.clone(),
                status: job.approval_status.label(),
            })
            .into());
        }

        let submission = CandidateSubmission::begin(
            next_submission_id(),
            job.id,
            candidate_id,
            actor.id.clone(),
        );
        let stored = self.store.insert_submission(submission)?;
        info!(submission_id = %stored.id, job_id = %stored.job_id, "screening started");
        Ok(stored)
    }

    pub fn get_submission(
        &self,
        submission_id: &SubmissionId,
    ) -> Result<CandidateSubmission, WorkflowServiceError> {
        let submission = self
            .store
            .load_submission(submission_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(submission)
    }

    pub fn update_checklist(
        &self,
        submission_id: &SubmissionId,
        expected_version: u64,
        checklist: ScreeningChecklist,
        actor: &Actor,
    ) -> Result<CandidateSubmission, WorkflowServiceError> {
        self.transition_submission(submission_id, expected_version, actor, None, |current, at| {
            current.update_checklist(checklist, actor, at)
        })
    }

    pub fn submit_candidate(
        &self,
        submission_id: &SubmissionId,
        expected_version: u64,
        actor: &Actor,
    ) -> Result<CandidateSubmission, WorkflowServiceError> {
        self.transition_submission(
            submission_id,
            expected_version,
            actor,
            Some("candidate_submitted"),
            |current, at| current.submit(actor, at),
        )
    }

    pub fn record_client_feedback(
        &self,
        submission_id: &SubmissionId,
        expected_version: u64,
        feedback: FeedbackInput,
        actor: &Actor,
    ) -> Result<CandidateSubmission, WorkflowServiceError> {
        self.transition_submission(
            submission_id,
            expected_version,
            actor,
            Some("client_feedback_recorded"),
            |current, at| current.record_client_feedback(feedback, actor, at),
        )
    }

    pub fn schedule_interview(
        &self,
        submission_id: &SubmissionId,
        expected_version: u64,
        request: InterviewRequest,
        actor: &Actor,
    ) -> Result<CandidateSubmission, WorkflowServiceError> {
        self.transition_submission(
            submission_id,
            expected_version,
            actor,
            Some("interview_scheduled"),
            |current, at| current.schedule_interview(request, actor, at),
        )
    }

    pub fn candidate_accepts(
        &self,
        submission_id: &SubmissionId,
        expected_version: u64,
        actor: &Actor,
    ) -> Result<CandidateSubmission, WorkflowServiceError> {
        self.transition_submission(
            submission_id,
            expected_version,
            actor,
            Some("offer_accepted"),
            |current, at| current.candidate_accepts(actor, at),
        )
    }

    pub fn candidate_declines(
        &self,
        submission_id: &SubmissionId,
        expected_version: u64,
        actor: &Actor,
    ) -> Result<CandidateSubmission, WorkflowServiceError> {
        self.transition_submission(
            submission_id,
            expected_version,
            actor,
            Some("offer_declined"),
            |current, at| current.candidate_declines(actor, at),
        )
    }

    /// Submission counts by status for a job's pipeline widget.
    pub fn pipeline(&self, job_id: &JobId) -> Result<PipelineSummary, WorkflowServiceError> {
        let job = self.get_job(job_id)?;
        let submissions = self.store.submissions_for_job(job_id)?;
        Ok(PipelineSummary::from_submissions(&job, &submissions))
    }

    fn transition_job<F>(
        &self,
        job_id: &JobId,
        expected_version: u64,
        actor: &Actor,
        template: &str,
        apply: F,
    ) -> Result<JobPosting, WorkflowServiceError>
    where
        F: FnOnce(&JobPosting, DateTime<Utc>) -> Result<JobPosting, WorkflowError>,
    {
        let current = self.get_job(job_id)?;
        ensure_version(current.version, expected_version)?;

        let mut next = apply(&current, self.clock.now())?;
        next.version = self.store.save_job(next.clone(), expected_version)?;

        info!(
            job_id = %next.id,
            from = current.approval_status.label(),
            to = next.approval_status.label(),
            version = next.version,
            "job approval transition applied"
        );

        let mut details = BTreeMap::new();
        details.insert("status".to_string(), next.approval_status.label().to_string());
        if let Some(reason) = &next.rejection_reason {
            details.insert("reason".to_string(), reason.clone());
        }
        self.notify(template, next.id.0.clone(), actor, details);

        Ok(next)
    }

    fn transition_submission<F>(
        &self,
        submission_id: &SubmissionId,
        expected_version: u64,
        actor: &Actor,
        template: Option<&str>,
        apply: F,
    ) -> Result<CandidateSubmission, WorkflowServiceError>
    where
        F: FnOnce(
            &CandidateSubmission,
            DateTime<Utc>,
        ) -> Result<CandidateSubmission, WorkflowError>,
    {
        let current = self.get_submission(submission_id)?;
        ensure_version(current.version, expected_version)?;

        let mut next = apply(&current, self.clock.now())?;
        next.version = self
            .store
            .save_submission(next.clone(), expected_version)?;

        info!(
            submission_id = %next.id,
            from = current.status.label(),
            to = next.status.label(),
            version = next.version,
            "submission transition applied"
        );

        if let Some(template) = template {
            let mut details = BTreeMap::new();
            details.insert("status".to_string(), next.status.label().to_string());
            details.insert("job_id".to_string(), next.job_id.0.clone());
            details.insert("candidate_id".to_string(), next.candidate_id.0.clone());
            self.notify(template, next.id.0.clone(), actor, details);
        }

        Ok(next)
    }

    fn notify(
        &self,
        template: &str,
        subject_id: String,
        actor: &Actor,
        details: BTreeMap<String, String>,
    ) {
        let notification = WorkflowNotification {
            template: template.to_string(),
            subject_id,
            actor: actor.id.clone(),
            details,
        };
        if let Err(error) = self.notifications.publish(notification) {
            warn!(%error, template, "workflow notification dropped");
        }
    }
}

fn ensure_version(found: u64, expected: u64) -> Result<(), WorkflowError> {
    if found == expected {
        Ok(())
    } else {
        Err(WorkflowError::StaleState { expected, found })
    }
}

/// Error raised by the approval workflow service.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowServiceError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Repository(RepositoryError),
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),
}

impl From<RepositoryError> for WorkflowServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::StaleState { expected, found } => {
                Self::Workflow(WorkflowError::StaleState { expected, found })
            }
            other => Self::Repository(other),
        }
    }
}
