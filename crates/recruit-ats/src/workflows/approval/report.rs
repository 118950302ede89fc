use serde::Serialize;

use super::domain::{CandidateSubmission, JobId, JobPosting, SubmissionStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStageCount {
    pub status: SubmissionStatus,
    pub label: &'static str,
    pub count: usize,
}

/// Per-job view of where every candidate stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub job_id: JobId,
    pub approval_status: &'static str,
    pub total: usize,
    pub stages: Vec<PipelineStageCount>,
    /// Screenings whose mandatory checks are all done but which are not yet submitted.
    pub ready_to_submit: usize,
}

impl PipelineSummary {
    pub fn from_submissions(job: &JobPosting, submissions: &[CandidateSubmission]) -> Self {
        let relevant: Vec<&CandidateSubmission> = submissions
            .iter()
            .filter(|submission| submission.job_id == job.id)
            .collect();

        let stages = SubmissionStatus::ordered()
            .into_iter()
            .map(|status| PipelineStageCount {
                status,
                label: status.label(),
                count: relevant
                    .iter()
                    .filter(|submission| submission.status == status)
                    .count(),
            })
            .collect();

        let ready_to_submit = relevant
            .iter()
            .filter(|submission| {
                submission.status == SubmissionStatus::NotSubmitted
                    && submission.screening_checklist.missing_mandatory().is_empty()
            })
            .count();

        Self {
            job_id: job.id.clone(),
            approval_status: job.approval_status.label(),
            total: relevant.len(),
            stages,
            ready_to_submit,
        }
    }

    pub fn count(&self, status: SubmissionStatus) -> usize {
        self.stages
            .iter()
            .find(|stage| stage.status == status)
            .map(|stage| stage.count)
            .unwrap_or(0)
    }
}
