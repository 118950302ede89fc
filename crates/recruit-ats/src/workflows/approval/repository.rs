use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Actor, ActorId, CandidateSubmission, JobId, JobPosting, SubmissionId};

/// Job storage with optimistic concurrency on `save`.
pub trait JobRepository: Send + Sync {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn load_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    /// Persist `job` if the stored version still equals `expected_version`,
    /// returning the new version.
    fn save_job(&self, job: JobPosting, expected_version: u64) -> Result<u64, RepositoryError>;
    fn pending_review(&self, limit: usize) -> Result<Vec<JobPosting>, RepositoryError>;
}

/// Submission storage with the same versioning contract as [`JobRepository`].
pub trait SubmissionRepository: Send + Sync {
    /// Store a new submission. Fails with `Conflict` when the id exists or when
    /// a non-terminal submission already covers the same job and candidate; the
    /// check and the insert must be atomic.
    fn insert_submission(
        &self,
        submission: CandidateSubmission,
    ) -> Result<CandidateSubmission, RepositoryError>;
    fn load_submission(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<CandidateSubmission>, RepositoryError>;
    fn save_submission(
        &self,
        submission: CandidateSubmission,
        expected_version: u64,
    ) -> Result<u64, RepositoryError>;
    fn submissions_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<CandidateSubmission>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("stale write: expected version {expected}, found {found}")]
    StaleState { expected: u64, found: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the caller of a workflow operation.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, actor_id: &ActorId) -> Option<Actor>;
}

/// Outbound notification hook (e-mail, chat, dashboard feed).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: WorkflowNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNotification {
    pub template: String,
    pub subject_id: String,
    pub actor: ActorId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
