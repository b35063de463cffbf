//! Container orchestration API abstraction.
//!
//! The monitor only needs three read operations from ECS. They sit behind
//! [`OrchestrationApi`] so the polling logic can run against the real SDK
//! client ([`EcsClient`]) or a test double.

mod ecs;

pub use ecs::EcsClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// The only status string that counts as healthy.
pub const ACTIVE_STATUS: &str = "ACTIVE";

/// Cluster state as reported by ECS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterState {
    /// Cluster is `ACTIVE`.
    Active,
    /// Any other status (`INACTIVE`, `PROVISIONING`, `FAILED`, ...).
    Other(String),
}

impl ClusterState {
    /// Classify a raw ECS status string. Matching is exact.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == ACTIVE_STATUS {
            Self::Active
        } else {
            Self::Other(raw.to_string())
        }
    }

    /// Whether the cluster is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for ClusterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "{ACTIVE_STATUS}"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// Snapshot of a cluster's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStatus {
    /// Cluster name.
    pub name: String,
    /// Current state.
    pub state: ClusterState,
}

/// Snapshot of a service's running tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRuntime {
    /// Service name.
    pub name: String,
    /// Number of tasks in the `RUNNING` state.
    pub running_task_count: u32,
}

/// Read operations the monitor needs from the orchestration service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrchestrationApi: Send + Sync {
    /// Describe one cluster by name.
    async fn describe_cluster(&self, cluster: &str) -> Result<ClusterStatus, MonitorError>;

    /// List the identifiers (ARNs) of every service in the cluster.
    async fn list_services(&self, cluster: &str) -> Result<Vec<String>, MonitorError>;

    /// Describe one service of the cluster.
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<ServiceRuntime, MonitorError>;
}

/// Extract the service name from a service ARN.
///
/// Handles both the long format
/// (`arn:aws:ecs:region:account:service/cluster/name`) and the legacy one
/// (`arn:aws:ecs:region:account:service/name`). Anything without a `/` is
/// returned unchanged.
#[must_use]
pub fn service_name_from_arn(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}
