//! Monitor configuration.
//!
//! Every setting has a default matching the deployed function, so an
//! invocation with no environment at all polls cluster `Cluster` in
//! `eu-north-1` and writes to the `Monitoring` namespace. The environment
//! variables below override individual settings:
//!
//! - `ECS_MONITOR_CLUSTER`: cluster to poll
//! - `ECS_MONITOR_REGION`: region of the ECS API
//! - `ECS_MONITOR_METRICS_REGION`: region of the CloudWatch API (defaults to
//!   the ambient AWS region of the runtime)
//! - `ECS_MONITOR_NAMESPACE`: CloudWatch namespace

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MonitorError;

/// Default cluster name.
pub const DEFAULT_CLUSTER: &str = "Cluster";

/// Default ECS region.
pub const DEFAULT_REGION: &str = "eu-north-1";

/// Default CloudWatch namespace.
pub const DEFAULT_NAMESPACE: &str = "Monitoring";

/// Environment variable overriding the cluster name.
pub const ENV_CLUSTER: &str = "ECS_MONITOR_CLUSTER";

/// Environment variable overriding the ECS region.
pub const ENV_REGION: &str = "ECS_MONITOR_REGION";

/// Environment variable overriding the CloudWatch region.
pub const ENV_METRICS_REGION: &str = "ECS_MONITOR_METRICS_REGION";

/// Environment variable overriding the CloudWatch namespace.
pub const ENV_NAMESPACE: &str = "ECS_MONITOR_NAMESPACE";

/// Settings for one monitoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Cluster to poll.
    pub cluster: String,
    /// Region of the ECS API.
    pub region: String,
    /// Region of the CloudWatch API. `None` uses the default provider chain.
    pub metrics_region: Option<String>,
    /// CloudWatch namespace for all data points.
    pub namespace: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cluster: DEFAULT_CLUSTER.to_string(),
            region: DEFAULT_REGION.to_string(),
            metrics_region: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Build a configuration from defaults and environment overrides.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(cluster) = env_override(ENV_CLUSTER) {
            config.cluster = cluster;
        }
        if let Some(region) = env_override(ENV_REGION) {
            config.region = region;
        }
        if let Some(region) = env_override(ENV_METRICS_REGION) {
            config.metrics_region = Some(region);
        }
        if let Some(namespace) = env_override(ENV_NAMESPACE) {
            config.namespace = namespace;
        }

        debug!(
            cluster = %config.cluster,
            region = %config.region,
            metrics_region = ?config.metrics_region,
            namespace = %config.namespace,
            "Loaded monitor configuration"
        );

        config
    }

    /// Set the cluster name.
    #[must_use]
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    /// Set the ECS region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the CloudWatch region.
    #[must_use]
    pub fn with_metrics_region(mut self, region: impl Into<String>) -> Self {
        self.metrics_region = Some(region.into());
        self
    }

    /// Set the CloudWatch namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Reject blank settings before any API call is made.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.cluster.trim().is_empty() {
            return Err(MonitorError::Config("cluster name is empty".to_string()));
        }
        if self.region.trim().is_empty() {
            return Err(MonitorError::Config("region is empty".to_string()));
        }
        if self.namespace.trim().is_empty() {
            return Err(MonitorError::Config("namespace is empty".to_string()));
        }
        if matches!(&self.metrics_region, Some(r) if r.trim().is_empty()) {
            return Err(MonitorError::Config("metrics region is empty".to_string()));
        }
        Ok(())
    }
}

/// Read a non-blank environment variable.
fn env_override(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
