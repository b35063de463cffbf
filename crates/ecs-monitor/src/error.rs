//! Error types for the ECS monitor.

use thiserror::Error;

/// Errors that can occur during a monitoring pass.
///
/// None of these are recovered from: the first error aborts the pass and is
/// surfaced to the caller (the function runtime or the CLI).
#[derive(Debug, Error)]
pub enum MonitorError {
    /// An ECS API call failed.
    #[error("ECS {operation} failed: {message}")]
    Orchestration {
        operation: &'static str,
        message: String,
    },

    /// The cluster does not exist (or was not returned).
    #[error("Cluster not found: {0}")]
    ClusterNotFound(String),

    /// The service does not exist (or was not returned).
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// The API returned data we cannot interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Publishing a metric datum failed.
    #[error("Failed to publish metric {metric}: {message}")]
    Publish { metric: String, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MonitorError {
    /// Build an orchestration error for the named ECS operation.
    pub fn orchestration(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Orchestration {
            operation,
            message: message.into(),
        }
    }

    /// Build a publish error for the named metric.
    pub fn publish(metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            metric: metric.into(),
            message: message.into(),
        }
    }
}
