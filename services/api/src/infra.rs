use metrics_exporter_prometheus::PrometheusHandle;
use recruit_ats::config::WorkflowConfig;
use recruit_ats::workflows::approval::{
    Actor, ActorId, Capability, IdentityProvider, NotificationError, NotificationPublisher,
    WorkflowNotification,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps every notification in memory and mirrors it to the log.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier {
    events: Arc<Mutex<Vec<WorkflowNotification>>>,
}

impl NotificationPublisher for LoggingNotifier {
    fn publish(&self, notification: WorkflowNotification) -> Result<(), NotificationError> {
        info!(
            template = %notification.template,
            subject = %notification.subject_id,
            actor = %notification.actor,
            "workflow notification queued"
        );
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl LoggingNotifier {
    pub(crate) fn events(&self) -> Vec<WorkflowNotification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

/// Actor directory seeded from configuration. An id listed as both approver
/// and recruiter carries both capabilities.
#[derive(Debug, Default, Clone)]
pub(crate) struct StaticDirectory {
    actors: HashMap<ActorId, Actor>,
}

impl StaticDirectory {
    pub(crate) fn from_config(config: &WorkflowConfig) -> Self {
        let mut directory = Self::default();
        for id in &config.approvers {
            directory.grant(id, Capability::Approver);
        }
        for id in &config.recruiters {
            directory.grant(id, Capability::Recruiter);
        }
        directory
    }

    fn grant(&mut self, id: &str, capability: Capability) {
        let actor = self
            .actors
            .entry(ActorId(id.to_string()))
            .or_insert_with(|| Actor::new(id, id));
        actor.capabilities.insert(capability);
    }
}

impl IdentityProvider for StaticDirectory {
    fn resolve(&self, actor_id: &ActorId) -> Option<Actor> {
        self.actors.get(actor_id).cloned()
    }
}
