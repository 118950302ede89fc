use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{
    CandidateSubmission, JobApprovalStatus, JobId, JobPosting, SubmissionId,
};
use super::repository::{JobRepository, RepositoryError, SubmissionRepository};

/// Process-local store used by the demo service and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWorkflowStore {
    jobs: Arc<Mutex<HashMap<JobId, JobPosting>>>,
    submissions: Arc<Mutex<SubmissionTable>>,
}

/// Submissions plus the order they were inserted in.
#[derive(Debug, Default)]
struct SubmissionTable {
    rows: HashMap<SubmissionId, CandidateSubmission>,
    order: Vec<SubmissionId>,
}

impl JobRepository for InMemoryWorkflowStore {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.jobs.lock().expect("job store mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn load_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.jobs.lock().expect("job store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_job(&self, mut job: JobPosting, expected_version: u64) -> Result<u64, RepositoryError> {
        let mut guard = self.jobs.lock().expect("job store mutex poisoned");
        let stored = guard.get_mut(&job.id).ok_or(RepositoryError::NotFound)?;
        if stored.version != expected_version {
            return Err(RepositoryError::StaleState {
                expected: expected_version,
                found: stored.version,
            });
        }
        job.version = expected_version + 1;
        let version = job.version;
        *stored = job;
        Ok(version)
    }

    fn pending_review(&self, limit: usize) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.jobs.lock().expect("job store mutex poisoned");
        let mut pending: Vec<JobPosting> = guard
            .values()
            .filter(|job| job.approval_status == JobApprovalStatus::PendingReview)
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            let a_at = a.last_action().map(|entry| entry.timestamp);
            let b_at = b.last_action().map(|entry| entry.timestamp);
            a_at.cmp(&b_at).then_with(|| a.id.cmp(&b.id))
        });
        pending.truncate(limit);
        Ok(pending)
    }
}

impl SubmissionRepository for InMemoryWorkflowStore {
    fn insert_submission(
        &self,
        submission: CandidateSubmission,
    ) -> Result<CandidateSubmission, RepositoryError> {
        let mut guard = self
            .submissions
            .lock()
            .expect("submission store mutex poisoned");
        if guard.rows.contains_key(&submission.id) {
            return Err(RepositoryError::Conflict);
        }
        let open_for_pair = guard.rows.values().any(|existing| {
            existing.job_id == submission.job_id
                && existing.candidate_id == submission.candidate_id
                && !existing.status.is_terminal()
        });
        if open_for_pair {
            return Err(RepositoryError::Conflict);
        }
        guard.order.push(submission.id.clone());
        guard.rows.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    fn load_submission(
        &self,
        id: &SubmissionId,
    ) -> Result<Option<CandidateSubmission>, RepositoryError> {
        let guard = self
            .submissions
            .lock()
            .expect("submission store mutex poisoned");
        Ok(guard.rows.get(id).cloned())
    }

    fn save_submission(
        &self,
        mut submission: CandidateSubmission,
        expected_version: u64,
    ) -> Result<u64, RepositoryError> {
        let mut guard = self
            .submissions
            .lock()
            .expect("submission store mutex poisoned");
        let stored = guard
            .rows
            .get_mut(&submission.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.version != expected_version {
            return Err(RepositoryError::StaleState {
                expected: expected_version,
                found: stored.version,
            });
        }
        submission.version = expected_version + 1;
        let version = submission.version;
        *stored = submission;
        Ok(version)
    }

    /// Submissions for `job_id` in insertion order.
    fn submissions_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<CandidateSubmission>, RepositoryError> {
        let guard = self
            .submissions
            .lock()
            .expect("submission store mutex poisoned");
        Ok(guard
            .order
            .iter()
            .filter_map(|id| guard.rows.get(id))
            .filter(|submission| &submission.job_id == job_id)
            .cloned()
            .collect())
    }
}
