//! Job approval and candidate submission workflows.
//!
//! The state machines in [`job`] and [`submission`] are pure: every transition
//! takes the current record plus a timestamp and returns either the next record
//! or a [`WorkflowError`]. [`ApprovalWorkflowService`] is the caller that wires
//! persistence, identity, clock and notification collaborators around them.

mod clock;
pub mod domain;
mod error;
mod job;
pub mod memory;
pub mod report;
pub mod repository;
pub mod router;
pub mod screening;
pub mod service;
mod submission;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    Actor, ActorId, AuditEntry, CandidateId, CandidateSubmission, Capability, ClientFeedback,
    FeedbackInput, FeedbackStatus, Interview, InterviewFormat, InterviewRequest, InterviewStatus,
    JobApprovalAction, JobApprovalStatus, JobDraft, JobId, JobPosting, JobPriority,
    SubmissionAction, SubmissionId, SubmissionStatus,
};
pub use error::{ValidationError, WorkflowError};
pub use memory::InMemoryWorkflowStore;
pub use report::{PipelineStageCount, PipelineSummary};
pub use repository::{
    IdentityProvider, JobRepository, NotificationError, NotificationPublisher, RepositoryError,
    SubmissionRepository, WorkflowNotification,
};
pub use router::{approval_router, ACTOR_HEADER};
pub use screening::{is_screening_complete, ScreeningCheck, ScreeningChecklist};
pub use service::{ApprovalWorkflowService, WorkflowServiceError};
