use crate::infra::{LoggingNotifier, StaticDirectory};
use chrono::{Duration, Utc};
use clap::Args;
use recruit_ats::config::WorkflowConfig;
use recruit_ats::error::AppError;
use recruit_ats::workflows::approval::{
    Actor, ActorId, ApprovalWorkflowService, AuditEntry, CandidateId, CandidateSubmission,
    FeedbackInput, FeedbackStatus, InMemoryWorkflowStore, InterviewFormat, InterviewRequest,
    JobDraft, JobPosting, JobPriority, ScreeningCheck, ScreeningChecklist, WorkflowServiceError,
};
use std::fmt::Debug;
use std::sync::Arc;

const APPROVER: &str = "team-lead";
const RECRUITER: &str = "recruiter";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Candidate reference used for the submission walkthrough.
    #[arg(long, default_value = "CAND-001")]
    pub(crate) candidate: String,
    /// Reject the job once before approving it, to show the resubmission loop.
    #[arg(long)]
    pub(crate) reject_first: bool,
    /// Have the candidate decline the offer instead of accepting it.
    #[arg(long)]
    pub(crate) decline_offer: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        candidate,
        reject_first,
        decline_offer,
    } = args;

    let config = WorkflowConfig {
        pending_review_limit: 25,
        approvers: vec![APPROVER.to_string()],
        recruiters: vec![RECRUITER.to_string()],
    };
    let notifier = Arc::new(LoggingNotifier::default());
    let service = ApprovalWorkflowService::new(
        Arc::new(InMemoryWorkflowStore::default()),
        notifier.clone(),
        Arc::new(StaticDirectory::from_config(&config)),
    );
    let approver = service.resolve_actor(&ActorId(APPROVER.to_string()))?;
    let recruiter = service.resolve_actor(&ActorId(RECRUITER.to_string()))?;

    println!("Recruiting workflow demo");
    let job = approve_demo_job(&service, &recruiter, &approver, reject_first)?;
    render_job(&job);

    let submission = walk_submission(
        &service,
        &job,
        CandidateId(candidate),
        &recruiter,
        decline_offer,
    )?;
    render_submission(&submission);

    let pipeline = service.pipeline(&job.id)?;
    println!("\nPipeline for {}", pipeline.job_id);
    for stage in pipeline.stages.iter().filter(|stage| stage.count > 0) {
        println!("  {:<14} {}", stage.label, stage.count);
    }

    let events = notifier.events();
    println!("\nNotifications dispatched: {}", events.len());
    for event in events {
        println!("  {} -> {}", event.template, event.subject_id);
    }

    Ok(())
}

fn approve_demo_job(
    service: &DemoService,
    recruiter: &Actor,
    approver: &Actor,
    reject_first: bool,
) -> Result<JobPosting, WorkflowServiceError> {
    let job = service.create_job(demo_job(), recruiter)?;
    let mut job = service.submit_job_for_review(&job.id, job.version, recruiter)?;

    if reject_first {
        job = service.reject_job(
            &job.id,
            job.version,
            approver,
            "Bill rate missing from description",
        )?;
        job = service.submit_job_for_review(&job.id, job.version, recruiter)?;
    }

    service.approve_job(&job.id, job.version, approver)
}

fn walk_submission(
    service: &DemoService,
    job: &JobPosting,
    candidate: CandidateId,
    recruiter: &Actor,
    decline_offer: bool,
) -> Result<CandidateSubmission, WorkflowServiceError> {
    let submission = service.begin_screening(&job.id, candidate, recruiter)?;

    let mut checklist = ScreeningChecklist {
        candidate_rate: Some("€600/day".to_string()),
        notice_period: Some("2 weeks".to_string()),
        ..ScreeningChecklist::default()
    };
    for check in ScreeningCheck::MANDATORY {
        checklist.set(check, true);
    }
    checklist.set(ScreeningCheck::SkillsVerified, true);

    let submission =
        service.update_checklist(&submission.id, submission.version, checklist, recruiter)?;
    let submission = service.submit_candidate(&submission.id, submission.version, recruiter)?;
    let submission = service.record_client_feedback(
        &submission.id,
        submission.version,
        client_feedback(FeedbackStatus::Shortlisted, 4, "Good fit"),
        recruiter,
    )?;
    let submission = service.schedule_interview(
        &submission.id,
        submission.version,
        InterviewRequest {
            round: "Technical Interview".to_string(),
            format: InterviewFormat::Video,
            scheduled_at: Utc::now() + Duration::days(3),
            duration_minutes: 60,
            interviewer: "Hiring Manager".to_string(),
            meeting_link: Some("https://meet.example.com/demo".to_string()),
            location: None,
            notes: None,
        },
        recruiter,
    )?;
    let submission = service.record_client_feedback(
        &submission.id,
        submission.version,
        client_feedback(FeedbackStatus::Offered, 5, "Strong technical round"),
        recruiter,
    )?;

    if decline_offer {
        service.candidate_declines(&submission.id, submission.version, recruiter)
    } else {
        service.candidate_accepts(&submission.id, submission.version, recruiter)
    }
}

type DemoService = ApprovalWorkflowService<InMemoryWorkflowStore, LoggingNotifier>;

fn demo_job() -> JobDraft {
    JobDraft {
        title: "Senior Java Developer".to_string(),
        client: "TechCorp Solutions".to_string(),
        description: "Spring Boot microservices, PostgreSQL, Kafka.".to_string(),
        location: Some("Hybrid".to_string()),
        priority: JobPriority::High,
    }
}

fn client_feedback(status: FeedbackStatus, rating: u8, comments: &str) -> FeedbackInput {
    FeedbackInput {
        status,
        rating: Some(rating),
        comments: comments.to_string(),
        feedback_by: "Client Hiring Manager".to_string(),
    }
}

fn render_job(job: &JobPosting) {
    println!(
        "\nJob {} \"{}\" for {} is {} (version {})",
        job.id,
        job.title,
        job.client,
        job.approval_status.label(),
        job.version
    );
    render_timeline(&job.approval_history);
}

fn render_submission(submission: &CandidateSubmission) {
    println!(
        "\nSubmission {} for candidate {} is {} (version {})",
        submission.id,
        submission.candidate_id.0,
        submission.status.label(),
        submission.version
    );
    println!(
        "  Screening: {} checks complete",
        submission.screening_checklist.completed_count()
    );
    for interview in &submission.interviews {
        println!(
            "  Interview {}: {} with {} at {}",
            interview.id,
            interview.round,
            interview.interviewer,
            interview.scheduled_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    render_timeline(&submission.history);
}

fn render_timeline<A: Debug>(entries: &[AuditEntry<A>]) {
    for entry in entries {
        let note = entry
            .note
            .as_deref()
            .map(|note| format!(" ({note})"))
            .unwrap_or_default();
        println!(
            "  {} {:?} by {}{}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.action,
            entry.actor,
            note
        );
    }
}
