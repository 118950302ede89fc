use crate::cli::ServeArgs;
use crate::infra::{AppState, LoggingNotifier, StaticDirectory};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_ats::config::AppConfig;
use recruit_ats::error::AppError;
use recruit_ats::telemetry;
use recruit_ats::workflows::approval::{ApprovalWorkflowService, InMemoryWorkflowStore};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryWorkflowStore::default());
    let notifier = Arc::new(LoggingNotifier::default());
    let directory = Arc::new(StaticDirectory::from_config(&config.workflow));
    let workflow_service = Arc::new(
        ApprovalWorkflowService::new(store, notifier, directory)
            .with_pending_limit(config.workflow.pending_review_limit),
    );

    let app = with_workflow_routes(workflow_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        approvers = config.workflow.approvers.len(),
        recruiters = config.workflow.recruiters.len(),
        "recruiting workflow service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
