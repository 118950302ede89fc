use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::approval::clock::FixedClock;
use crate::workflows::approval::domain::{
    Actor, ActorId, CandidateId, CandidateSubmission, Capability, FeedbackInput, FeedbackStatus,
    InterviewFormat, InterviewRequest, JobDraft, JobId, JobPosting, JobPriority, SubmissionId,
};
use crate::workflows::approval::memory::InMemoryWorkflowStore;
use crate::workflows::approval::repository::{
    IdentityProvider, NotificationError, NotificationPublisher, WorkflowNotification,
};
use crate::workflows::approval::screening::ScreeningChecklist;
use crate::workflows::approval::service::ApprovalWorkflowService;

pub(super) fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn now() -> DateTime<Utc> {
    at(15, 9)
}

pub(super) fn approver() -> Actor {
    Actor::new("team-lead", "Team Lead").with_capability(Capability::Approver)
}

pub(super) fn recruiter() -> Actor {
    Actor::new("sarah", "Sarah Johnson").with_capability(Capability::Recruiter)
}

pub(super) fn draft() -> JobDraft {
    JobDraft {
        title: "Senior Java Developer".to_string(),
        client: "TechCorp Solutions".to_string(),
        description: "Backend services on the JVM, Spring Boot and PostgreSQL.".to_string(),
        location: Some("Brussels".to_string()),
        priority: JobPriority::High,
    }
}

pub(super) fn draft_job() -> JobPosting {
    JobPosting::draft(JobId("JOB-T01".to_string()), draft())
}

pub(super) fn pending_job() -> JobPosting {
    draft_job()
        .submit_for_review(&recruiter(), at(14, 16))
        .expect("draft can be submitted")
}

pub(super) fn approved_job() -> JobPosting {
    pending_job()
        .approve(&approver(), at(15, 8))
        .expect("pending job can be approved")
}

pub(super) fn complete_checklist() -> ScreeningChecklist {
    ScreeningChecklist {
        phone_screen_done: true,
        rate_discussed: true,
        rtr_confirmed: true,
        other_submissions_checked: true,
        availability_confirmed: true,
        visa_status_checked: true,
        candidate_rate: Some("€650/day".to_string()),
        ..ScreeningChecklist::default()
    }
}

pub(super) fn fresh_submission() -> CandidateSubmission {
    CandidateSubmission::begin(
        SubmissionId("SUB-T01".to_string()),
        JobId("JOB-T01".to_string()),
        CandidateId("C-001".to_string()),
        recruiter().id,
    )
}

pub(super) fn screened_submission() -> CandidateSubmission {
    fresh_submission()
        .update_checklist(complete_checklist(), &recruiter(), at(14, 16))
        .expect("checklist editable before submission")
}

pub(super) fn submitted_submission() -> CandidateSubmission {
    screened_submission()
        .submit(&recruiter(), at(15, 10))
        .expect("complete screening submits")
}

pub(super) fn feedback(status: FeedbackStatus, rating: Option<u8>) -> FeedbackInput {
    FeedbackInput {
        status,
        rating,
        comments: "Good fit".to_string(),
        feedback_by: "Mike Anderson (Client)".to_string(),
    }
}

pub(super) fn interview_at(scheduled_at: DateTime<Utc>) -> InterviewRequest {
    InterviewRequest {
        round: "Technical Interview".to_string(),
        format: InterviewFormat::Video,
        scheduled_at,
        duration_minutes: 60,
        interviewer: "Mike Anderson".to_string(),
        meeting_link: Some("https://meet.example.com/abc-defg-hij".to_string()),
        location: None,
        notes: None,
    }
}

pub(super) fn interviewing_submission() -> CandidateSubmission {
    submitted_submission()
        .record_client_feedback(
            feedback(FeedbackStatus::Shortlisted, Some(4)),
            &recruiter(),
            at(16, 14),
        )
        .expect("shortlist")
        .schedule_interview(interview_at(at(20, 14)), &recruiter(), at(16, 15))
        .expect("interview scheduled")
}

pub(super) fn offered_submission() -> CandidateSubmission {
    interviewing_submission()
        .record_client_feedback(
            feedback(FeedbackStatus::Offered, Some(5)),
            &recruiter(),
            at(21, 9),
        )
        .expect("offer")
}

#[derive(Default)]
pub(super) struct StaticDirectory {
    actors: HashMap<ActorId, Actor>,
}

impl StaticDirectory {
    pub(super) fn standard() -> Self {
        let mut actors = HashMap::new();
        for actor in [approver(), recruiter()] {
            actors.insert(actor.id.clone(), actor);
        }
        Self { actors }
    }
}

impl IdentityProvider for StaticDirectory {
    fn resolve(&self, actor_id: &ActorId) -> Option<Actor> {
        self.actors.get(actor_id).cloned()
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<WorkflowNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<WorkflowNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }

    pub(super) fn templates(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|event| event.template)
            .collect()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: WorkflowNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifications;

impl NotificationPublisher for OfflineNotifications {
    fn publish(&self, _notification: WorkflowNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

pub(super) type TestService = ApprovalWorkflowService<InMemoryWorkflowStore, MemoryNotifications>;

pub(super) fn build_service() -> (
    TestService,
    Arc<InMemoryWorkflowStore>,
    Arc<MemoryNotifications>,
) {
    let store = Arc::new(InMemoryWorkflowStore::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = ApprovalWorkflowService::new(
        store.clone(),
        notifications.clone(),
        Arc::new(StaticDirectory::standard()),
    )
    .with_clock(Arc::new(FixedClock(now())));
    (service, store, notifications)
}

/// Drives a fresh job through review and approval, returning it at version 3.
pub(super) fn seed_approved_job(service: &TestService) -> JobPosting {
    let job = service
        .create_job(draft(), &recruiter())
        .expect("job drafted");
    let job = service
        .submit_job_for_review(&job.id, job.version, &recruiter())
        .expect("submitted for review");
    service
        .approve_job(&job.id, job.version, &approver())
        .expect("approved")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
