use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::screening::ScreeningChecklist;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for candidate submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// Reference to a candidate owned by the (external) candidate directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier of the user performing a workflow action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permissions granted to an actor by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Approver,
    Recruiter,
}

impl Capability {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approver => "approver",
            Self::Recruiter => "recruiter",
        }
    }
}

/// A resolved user together with the capabilities they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub capabilities: BTreeSet<Capability>,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ActorId(id.into()),
            name: name.into(),
            capabilities: BTreeSet::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// One append-only audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry<A> {
    pub action: A,
    pub actor: ActorId,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobApprovalStatus {
    Draft,
    PendingReview,
    Approved,
    Rejected,
}

impl JobApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobApprovalAction {
    SubmittedForReview,
    Approved,
    Rejected,
}

impl JobApprovalAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubmittedForReview => "submitted_for_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Fields a recruiter supplies when drafting a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub client: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub priority: JobPriority,
}

/// A job order moving through the internal approval workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub client: String,
    pub description: String,
    pub location: Option<String>,
    pub priority: JobPriority,
    pub approval_status: JobApprovalStatus,
    pub approval_history: Vec<AuditEntry<JobApprovalAction>>,
    pub rejection_reason: Option<String>,
    pub version: u64,
}

impl JobPosting {
    /// New postings always start as drafts with an empty history.
    pub fn draft(id: JobId, draft: JobDraft) -> Self {
        Self {
            id,
            title: draft.title,
            client: draft.client,
            description: draft.description,
            location: draft.location,
            priority: draft.priority,
            approval_status: JobApprovalStatus::Draft,
            approval_history: Vec::new(),
            rejection_reason: None,
            version: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    NotSubmitted,
    Submitted,
    Shortlisted,
    Interview,
    Rejected,
    Offered,
    Accepted,
}

impl SubmissionStatus {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::NotSubmitted,
            Self::Submitted,
            Self::Shortlisted,
            Self::Interview,
            Self::Offered,
            Self::Accepted,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotSubmitted => "not_submitted",
            Self::Submitted => "submitted",
            Self::Shortlisted => "shortlisted",
            Self::Interview => "interview",
            Self::Rejected => "rejected",
            Self::Offered => "offered",
            Self::Accepted => "accepted",
        }
    }

    /// Accepted and rejected submissions take no further transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionAction {
    ScreeningUpdated,
    Submitted,
    ClientFeedback,
    InterviewScheduled,
    CandidateAccepted,
    CandidateDeclined,
}

impl SubmissionAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ScreeningUpdated => "screening_updated",
            Self::Submitted => "submitted",
            Self::ClientFeedback => "client_feedback",
            Self::InterviewScheduled => "interview_scheduled",
            Self::CandidateAccepted => "candidate_accepted",
            Self::CandidateDeclined => "candidate_declined",
        }
    }
}

/// Outcome a client can report for a submitted candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Shortlisted,
    Interview,
    Rejected,
    Offered,
}

impl FeedbackStatus {
    pub const fn target(self) -> SubmissionStatus {
        match self {
            Self::Shortlisted => SubmissionStatus::Shortlisted,
            Self::Interview => SubmissionStatus::Interview,
            Self::Rejected => SubmissionStatus::Rejected,
            Self::Offered => SubmissionStatus::Offered,
        }
    }
}

/// Client feedback as entered by the recruiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackInput {
    pub status: FeedbackStatus,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub comments: String,
    pub feedback_by: String,
}

/// Latest client feedback recorded on a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFeedback {
    pub status: FeedbackStatus,
    pub rating: Option<u8>,
    pub comments: String,
    pub feedback_by: String,
    pub feedback_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewFormat {
    Video,
    Phone,
    InPerson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRequest {
    pub round: String,
    pub format: InterviewFormat,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub interviewer: String,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: String,
    pub round: String,
    pub format: InterviewFormat,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub interviewer: String,
    pub meeting_link: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub status: InterviewStatus,
}

/// A candidate presented (or being prepared for presentation) to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    pub id: SubmissionId,
    pub job_id: JobId,
    pub candidate_id: CandidateId,
    pub recruiter: ActorId,
    pub screening_checklist: ScreeningChecklist,
    pub status: SubmissionStatus,
    pub client_feedback: Option<ClientFeedback>,
    pub interviews: Vec<Interview>,
    pub history: Vec<AuditEntry<SubmissionAction>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub submitted_by: Option<ActorId>,
    pub version: u64,
}

impl CandidateSubmission {
    pub fn begin(
        id: SubmissionId,
        job_id: JobId,
        candidate_id: CandidateId,
        recruiter: ActorId,
    ) -> Self {
        Self {
            id,
            job_id,
            candidate_id,
            recruiter,
            screening_checklist: ScreeningChecklist::default(),
            status: SubmissionStatus::NotSubmitted,
            client_feedback: None,
            interviews: Vec::new(),
            history: Vec::new(),
            submitted_at: None,
            submitted_by: None,
            version: 1,
        }
    }
}
