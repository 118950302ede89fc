use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

const WORKFLOW_TARGET: &str = "recruit_ats::workflows";

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(f, "invalid log level/filter '{}'", value)
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Expand a bare `warn` or `error` level into a directive that keeps workflow
/// transitions at `info`, since they double as the audit trail in the logs.
/// `off` and full directives (containing `=` or `,`) pass through untouched.
pub fn filter_directive(log_level: &str) -> String {
    let level = log_level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    match level.to_ascii_lowercase().as_str() {
        "warn" | "error" => format!("{level},{WORKFLOW_TARGET}=info"),
        _ => level.to_string(),
    }
}

pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = filter_directive(&config.log_level);
    EnvFilter::try_new(&directive).map_err(|source| TelemetryError::EnvFilter {
        value: directive,
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(config.ansi)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_levels_keep_workflow_transitions_visible() {
        assert_eq!(filter_directive("warn"), "warn,recruit_ats::workflows=info");
        assert_eq!(filter_directive("info"), "info");
    }

    #[test]
    fn off_silences_everything() {
        assert_eq!(filter_directive("off"), "off");
        assert_eq!(filter_directive(" OFF "), "OFF");
    }

    #[test]
    fn explicit_directives_pass_through() {
        let directive = "error,tower_http=debug";
        assert_eq!(filter_directive(directive), directive);
    }
}
