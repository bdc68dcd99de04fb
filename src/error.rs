// Error taxonomy for the monitor
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("unknown or untracked metric name: {0}")]
    InvalidMetricName(String),
    #[error("request to {endpoint} failed: {reason}")]
    NetworkFailure { endpoint: String, reason: String },
    #[error("form submission failed: {0}")]
    FormSubmissionFailure(String),
    #[error("polling interval must be greater than zero")]
    InvalidInterval,
}

impl MonitorError {
    pub fn network(endpoint: &str, reason: impl std::fmt::Display) -> Self {
        Self::NetworkFailure {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}
