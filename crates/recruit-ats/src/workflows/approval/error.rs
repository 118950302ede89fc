use super::domain::{ActorId, Capability};
use super::screening::ScreeningCheck;

/// Errors raised by the job approval and candidate submission state machines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{operation} is not allowed for {entity} in state {from}")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        operation: &'static str,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("screening incomplete, missing: {}", format_missing(.missing_fields))]
    ScreeningIncomplete { missing_fields: Vec<ScreeningCheck> },
    #[error("stale state: expected version {expected}, found {found}")]
    StaleState { expected: u64, found: u64 },
}

impl WorkflowError {
    pub(crate) fn invalid(
        entity: &'static str,
        from: &'static str,
        operation: &'static str,
    ) -> Self {
        Self::InvalidTransition {
            entity,
            from,
            operation,
        }
    }

    /// Machine readable kind used by HTTP payloads.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Validation(_) => "validation_error",
            Self::ScreeningIncomplete { .. } => "screening_incomplete",
            Self::StaleState { .. } => "stale_state",
        }
    }
}

fn format_missing(fields: &[ScreeningCheck]) -> String {
    fields
        .iter()
        .map(|field| field.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Precondition failures on transition input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("a rejection reason is required")]
    EmptyRejectionReason,
    #[error("rating must be between 1 and 5, found {rating}")]
    RatingOutOfRange { rating: u8 },
    #[error("interview cannot be scheduled in the past")]
    InterviewInPast,
    #[error("interview duration must be greater than zero")]
    InvalidInterviewDuration,
    #[error("actor {actor} lacks the {} capability", .capability.label())]
    MissingCapability {
        actor: ActorId,
        capability: Capability,
    },
    #[error("job {job_id} must be approved before screening begins (status {status})")]
    JobNotApproved {
        job_id: String,
        status: &'static str,
    },
}
