use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use recruit_ats::workflows::approval::{
    approval_router, ApprovalWorkflowService, JobRepository, NotificationPublisher,
    SubmissionRepository,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_workflow_routes<R, N>(
    service: Arc<ApprovalWorkflowService<R, N>>,
) -> axum::Router
where
    R: JobRepository + SubmissionRepository + 'static,
    N: NotificationPublisher + 'static,
{
    approval_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{LoggingNotifier, StaticDirectory};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use recruit_ats::config::WorkflowConfig;
    use recruit_ats::workflows::approval::{InMemoryWorkflowStore, ACTOR_HEADER};
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let config = WorkflowConfig {
            pending_review_limit: 5,
            approvers: vec!["team-lead".to_string()],
            recruiters: vec!["recruiter".to_string()],
        };
        let service = Arc::new(
            ApprovalWorkflowService::new(
                Arc::new(InMemoryWorkflowStore::default()),
                Arc::new(LoggingNotifier::default()),
                Arc::new(StaticDirectory::from_config(&config)),
            )
            .with_pending_limit(config.pending_review_limit),
        );
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_workflow_routes(service).layer(Extension(state))
    }

    async fn status_of(app: axum::Router, request: Request<Body>) -> StatusCode {
        app.oneshot(request).await.expect("router responds").status()
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let request = || {
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .expect("request")
        };

        assert_eq!(
            status_of(app(false), request()).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(app(true), request()).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_workflow_routes_share_one_router() {
        let health = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");
        assert_eq!(status_of(app(true), health).await, StatusCode::OK);

        let create = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs")
            .header("content-type", "application/json")
            .header(ACTOR_HEADER, "recruiter")
            .body(Body::from(
                json!({
                    "title": "Data Engineer",
                    "client": "Northwind",
                    "description": "Batch and streaming pipelines.",
                    "priority": "medium"
                })
                .to_string(),
            ))
            .expect("request");
        assert_eq!(status_of(app(true), create).await, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn configured_approver_resolves_from_header() {
        let pending = Request::builder()
            .uri("/api/v1/reviews/pending")
            .body(Body::empty())
            .expect("request");
        assert_eq!(status_of(app(true), pending).await, StatusCode::OK);

        let anonymous = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs/JOB-000001/approve")
            .header("content-type", "application/json")
            .header(ACTOR_HEADER, "intruder")
            .body(Body::from(json!({ "expected_version": 2 }).to_string()))
            .expect("request");
        assert_eq!(
            status_of(app(true), anonymous).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
