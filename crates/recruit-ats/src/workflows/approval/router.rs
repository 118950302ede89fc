use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    Actor, ActorId, CandidateId, FeedbackInput, InterviewRequest, JobDraft, JobId, SubmissionId,
};
use super::error::WorkflowError;
use super::repository::{
    JobRepository, NotificationPublisher, RepositoryError, SubmissionRepository,
};
use super::screening::ScreeningChecklist;
use super::service::{ApprovalWorkflowService, WorkflowServiceError};

/// Header carrying the caller's actor id; resolution goes through the identity provider.
pub const ACTOR_HEADER: &str = "x-actor-id";

type SharedService<R, N> = Arc<ApprovalWorkflowService<R, N>>;

#[derive(Debug, Deserialize)]
pub struct VersionedRequest {
    pub expected_version: u64,
}

#[derive(Debug, Deserialize)]
pub struct RejectJobRequest {
    pub expected_version: u64,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct BeginScreeningRequest {
    pub job_id: String,
    pub candidate_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChecklistRequest {
    pub expected_version: u64,
    pub checklist: ScreeningChecklist,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub expected_version: u64,
    #[serde(flatten)]
    pub feedback: FeedbackInput,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleInterviewRequest {
    pub expected_version: u64,
    #[serde(flatten)]
    pub interview: InterviewRequest,
}

#[derive(Debug, Deserialize)]
pub struct PendingQuery {
    pub limit: Option<usize>,
}

/// Router exposing the job approval and submission workflows over JSON.
pub fn approval_router<R, N>(service: SharedService<R, N>) -> Router
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/jobs", post(create_job_handler::<R, N>))
        .route("/api/v1/jobs/:job_id", get(job_handler::<R, N>))
        .route(
            "/api/v1/jobs/:job_id/submit-for-review",
            post(submit_for_review_handler::<R, N>),
        )
        .route("/api/v1/jobs/:job_id/approve", post(approve_handler::<R, N>))
        .route("/api/v1/jobs/:job_id/reject", post(reject_handler::<R, N>))
        .route(
            "/api/v1/jobs/:job_id/pipeline",
            get(pipeline_handler::<R, N>),
        )
        .route("/api/v1/reviews/pending", get(pending_handler::<R, N>))
        .route(
            "/api/v1/submissions",
            post(begin_screening_handler::<R, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id",
            get(submission_handler::<R, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/checklist",
            put(checklist_handler::<R, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/submit",
            post(submit_candidate_handler::<R, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/feedback",
            post(feedback_handler::<R, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/interviews",
            post(interview_handler::<R, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/accept",
            post(accept_handler::<R, N>),
        )
        .route(
            "/api/v1/submissions/:submission_id/decline",
            post(decline_handler::<R, N>),
        )
        .with_state(service)
}

fn resolve_actor<R, N>(
    service: &ApprovalWorkflowService<R, N>,
    headers: &HeaderMap,
) -> Result<Actor, WorkflowServiceError>
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let raw = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();
    service.resolve_actor(&ActorId(raw.to_string()))
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, WorkflowServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Map service failures onto HTTP statuses; screening gaps are echoed verbatim.
pub fn error_response(error: WorkflowServiceError) -> Response {
    match error {
        WorkflowServiceError::Workflow(error) => {
            let status = match &error {
                WorkflowError::InvalidTransition { .. } | WorkflowError::StaleState { .. } => {
                    StatusCode::CONFLICT
                }
                WorkflowError::Validation(_) | WorkflowError::ScreeningIncomplete { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            };
            let mut payload = json!({
                "error": error.to_string(),
                "kind": error.kind(),
            });
            if let WorkflowError::ScreeningIncomplete { missing_fields } = &error {
                payload["missing_fields"] = json!(missing_fields);
            }
            (status, Json(payload)).into_response()
        }
        WorkflowServiceError::Repository(error) => {
            let status = match error {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict | RepositoryError::StaleState { .. } => {
                    StatusCode::CONFLICT
                }
                RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let payload = json!({ "error": error.to_string() });
            (status, Json(payload)).into_response()
        }
        WorkflowServiceError::UnknownActor(actor) => {
            let payload = json!({
                "error": format!("unknown actor '{}'", actor.0),
            });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn create_job_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result =
        resolve_actor(&service, &headers).and_then(|actor| service.create_job(draft, &actor));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn job_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond(StatusCode::OK, service.get_job(&JobId(job_id)))
}

pub(crate) async fn submit_for_review_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<VersionedRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers).and_then(|actor| {
        service.submit_job_for_review(&JobId(job_id), request.expected_version, &actor)
    });
    respond(StatusCode::OK, result)
}

pub(crate) async fn approve_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<VersionedRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers)
        .and_then(|actor| service.approve_job(&JobId(job_id), request.expected_version, &actor));
    respond(StatusCode::OK, result)
}

pub(crate) async fn reject_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<RejectJobRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers).and_then(|actor| {
        service.reject_job(
            &JobId(job_id),
            request.expected_version,
            &actor,
            &request.reason,
        )
    });
    respond(StatusCode::OK, result)
}

pub(crate) async fn pipeline_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond(StatusCode::OK, service.pipeline(&JobId(job_id)))
}

pub(crate) async fn pending_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Query(query): Query<PendingQuery>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let limit = query.limit.unwrap_or_else(|| service.pending_limit());
    respond(StatusCode::OK, service.pending_reviews(limit))
}

pub(crate) async fn begin_screening_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    headers: HeaderMap,
    Json(request): Json<BeginScreeningRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers).and_then(|actor| {
        service.begin_screening(
            &JobId(request.job_id),
            CandidateId(request.candidate_id),
            &actor,
        )
    });
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn submission_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(submission_id): Path<String>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    respond(
        StatusCode::OK,
        service.get_submission(&SubmissionId(submission_id)),
    )
}

pub(crate) async fn checklist_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(submission_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<ChecklistRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers).and_then(|actor| {
        service.update_checklist(
            &SubmissionId(submission_id),
            request.expected_version,
            request.checklist,
            &actor,
        )
    });
    respond(StatusCode::OK, result)
}

pub(crate) async fn submit_candidate_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(submission_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<VersionedRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers).and_then(|actor| {
        service.submit_candidate(
            &SubmissionId(submission_id),
            request.expected_version,
            &actor,
        )
    });
    respond(StatusCode::OK, result)
}

pub(crate) async fn feedback_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(submission_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<FeedbackRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers).and_then(|actor| {
        service.record_client_feedback(
            &SubmissionId(submission_id),
            request.expected_version,
            request.feedback,
            &actor,
        )
    });
    respond(StatusCode::OK, result)
}

pub(crate) async fn interview_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(submission_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<ScheduleInterviewRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers).and_then(|actor| {
        service.schedule_interview(
            &SubmissionId(submission_id),
            request.expected_version,
            request.interview,
            &actor,
        )
    });
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn accept_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(submission_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<VersionedRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers).and_then(|actor| {
        service.candidate_accepts(
            &SubmissionId(submission_id),
            request.expected_version,
            &actor,
        )
    });
    respond(StatusCode::OK, result)
}

pub(crate) async fn decline_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(submission_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<VersionedRequest>,
) -> Response
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let result = resolve_actor(&service, &headers).and_then(|actor| {
        service.candidate_declines(
            &SubmissionId(submission_id),
            request.expected_version,
            &actor,
        )
    });
    respond(StatusCode::OK, result)
}
