use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::approval::domain::{CandidateId, FeedbackStatus};
use crate::workflows::approval::memory::InMemoryWorkflowStore;
use crate::workflows::approval::router::{
    self, approval_router, RejectJobRequest, VersionedRequest, ACTOR_HEADER,
};

fn actor_headers(actor_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACTOR_HEADER,
        HeaderValue::from_str(actor_id).expect("header value"),
    );
    headers
}

fn json_request(method: &str, uri: &str, actor_id: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header(ACTOR_HEADER, actor_id)
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn approve_handler_refuses_recruiters() {
    let (service, _store, _notifications) = build_service();
    let job = service.create_job(draft(), &recruiter()).expect("drafted");
    let pending = service
        .submit_job_for_review(&job.id, job.version, &recruiter())
        .expect("submitted");
    let service = Arc::new(service);

    let response = router::approve_handler::<InMemoryWorkflowStore, MemoryNotifications>(
        State(service),
        Path(pending.id.0.clone()),
        actor_headers("sarah"),
        axum::Json(VersionedRequest {
            expected_version: pending.version,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "validation_error");
}

#[tokio::test]
async fn reject_handler_returns_updated_job() {
    let (service, _store, _notifications) = build_service();
    let job = service.create_job(draft(), &recruiter()).expect("drafted");
    let pending = service
        .submit_job_for_review(&job.id, job.version, &recruiter())
        .expect("submitted");
    let service = Arc::new(service);

    let response = router::reject_handler::<InMemoryWorkflowStore, MemoryNotifications>(
        State(service),
        Path(pending.id.0.clone()),
        actor_headers("team-lead"),
        axum::Json(RejectJobRequest {
            expected_version: pending.version,
            reason: "Rate too low".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["approval_status"], "rejected");
    assert_eq!(payload["rejection_reason"], "Rate too low");
    assert_eq!(payload["version"], 3);
}

#[tokio::test]
async fn unknown_actor_header_is_unauthorized() {
    let (service, _store, _notifications) = build_service();
    let app = approval_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/jobs",
            "mallory",
            serde_json::to_value(draft()).expect("draft json"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stale_version_maps_to_conflict() {
    let (service, _store, _notifications) = build_service();
    let job = service.create_job(draft(), &recruiter()).expect("drafted");
    let app = approval_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/jobs/{}/submit-for-review", job.id),
            "sarah",
            json!({ "expected_version": 7 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "stale_state");
}

#[tokio::test]
async fn invalid_transition_maps_to_conflict() {
    let (service, _store, _notifications) = build_service();
    let job = service.create_job(draft(), &recruiter()).expect("drafted");
    let app = approval_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/jobs/{}/approve", job.id),
            "team-lead",
            json!({ "expected_version": job.version }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "invalid_transition");
}

#[tokio::test]
async fn incomplete_screening_lists_missing_fields() {
    let (service, _store, _notifications) = build_service();
    let job = seed_approved_job(&service);
    let submission = service
        .begin_screening(&job.id, CandidateId("C-100".to_string()), &recruiter())
        .expect("screening");
    let app = approval_router(Arc::new(service));

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/submissions/{}/checklist", submission.id),
            "sarah",
            json!({
                "expected_version": submission.version,
                "checklist": {
                    "phone_screen_done": true,
                    "rate_discussed": true,
                    "other_submissions_checked": true,
                    "availability_confirmed": true,
                    "visa_status_checked": true
                }
            }),
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let saved = read_json_body(response).await;

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/submissions/{}/submit", submission.id),
            "sarah",
            json!({ "expected_version": saved["version"] }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kind"], "screening_incomplete");
    assert_eq!(payload["missing_fields"], json!(["rtr_confirmed"]));
}

#[tokio::test]
async fn missing_submission_is_not_found() {
    let (service, _store, _notifications) = build_service();
    let app = approval_router(Arc::new(service));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/submissions/SUB-404")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pending_queue_honours_limit_query() {
    let (service, _store, _notifications) = build_service();
    for _ in 0..3 {
        let job = service.create_job(draft(), &recruiter()).expect("drafted");
        service
            .submit_job_for_review(&job.id, job.version, &recruiter())
            .expect("submitted");
    }
    let app = approval_router(Arc::new(service));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/reviews/pending?limit=2")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn interview_scheduling_returns_created() {
    let (service, _store, _notifications) = build_service();
    let job = seed_approved_job(&service);
    let submission = service
        .begin_screening(&job.id, CandidateId("C-200".to_string()), &recruiter())
        .expect("screening");
    let submission = service
        .update_checklist(
            &submission.id,
            submission.version,
            complete_checklist(),
            &recruiter(),
        )
        .expect("checklist");
    let submission = service
        .submit_candidate(&submission.id, submission.version, &recruiter())
        .expect("submitted");
    let submission = service
        .record_client_feedback(
            &submission.id,
            submission.version,
            feedback(FeedbackStatus::Shortlisted, Some(4)),
            &recruiter(),
        )
        .expect("shortlisted");
    let app = approval_router(Arc::new(service));

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/submissions/{}/interviews", submission.id),
            "sarah",
            json!({
                "expected_version": submission.version,
                "round": "Technical Interview",
                "format": "video",
                "scheduled_at": "2025-01-20T14:00:00Z",
                "duration_minutes": 60,
                "interviewer": "Mike Anderson"
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "interview");
    assert_eq!(payload["interviews"][0]["id"], "INT-001");
}
