//! Metric data points and the sinks that publish them.
//!
//! Every observation becomes exactly one [`MetricDatum`], handed to a
//! [`MetricsSink`] immediately. There is no batching.

mod cloudwatch;
mod dry_run;

pub use cloudwatch::CloudWatchSink;
pub use dry_run::DryRunSink;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// Prefix of every metric name.
pub const METRIC_PREFIX: &str = "ECSMonitoring";

/// Name of the single dimension attached to every datum.
pub const DIMENSION_NAME: &str = "ECSMonitoring";

/// Which observation a datum carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    /// Cluster health: 1 when active, 0 otherwise.
    ClusterStatus,
    /// Running task count of a service.
    RunningTasks,
}

impl MetricKey {
    /// Key as it appears in the metric name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClusterStatus => "clusterstatus",
            Self::RunningTasks => "runningtasks",
        }
    }

    /// Full metric name, e.g. `ECSMonitoring-clusterstatus`.
    #[must_use]
    pub fn metric_name(self) -> String {
        format!("{METRIC_PREFIX}-{}", self.as_str())
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a datum. Only counts are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MetricUnit {
    #[default]
    Count,
}

/// One data point destined for the monitoring backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDatum {
    /// Metric name (`ECSMonitoring-<key>`).
    pub name: String,
    /// Dimension name.
    pub dimension_name: String,
    /// Dimension value: the cluster or service name.
    pub dimension_value: String,
    /// Unit.
    pub unit: MetricUnit,
    /// Observed value.
    pub value: f64,
    /// Namespace the datum is written to.
    pub namespace: String,
    /// Observation time.
    pub timestamp: DateTime<Utc>,
}

impl MetricDatum {
    /// Build a datum for `resource` under `key`.
    #[must_use]
    pub fn new(
        key: MetricKey,
        resource: impl Into<String>,
        value: u32,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            name: key.metric_name(),
            dimension_name: DIMENSION_NAME.to_string(),
            dimension_value: resource.into(),
            unit: MetricUnit::Count,
            value: f64::from(value),
            namespace: namespace.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Destination for metric data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Sink name, for logging.
    fn name(&self) -> &'static str;

    /// Publish a single datum. One call per datum, no batching.
    async fn publish(&self, datum: &MetricDatum) -> Result<(), MonitorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert_eq!(
            MetricKey::ClusterStatus.metric_name(),
            "ECSMonitoring-clusterstatus"
        );
        assert_eq!(
            MetricKey::RunningTasks.metric_name(),
            "ECSMonitoring-runningtasks"
        );
    }

    #[test]
    fn test_datum_shape() {
        let datum = MetricDatum::new(MetricKey::RunningTasks, "web", 3, "Monitoring");
        assert_eq!(datum.name, "ECSMonitoring-runningtasks");
        assert_eq!(datum.dimension_name, "ECSMonitoring");
        assert_eq!(datum.dimension_value, "web");
        assert_eq!(datum.unit, MetricUnit::Count);
        assert!((datum.value - 3.0).abs() < f64::EPSILON);
        assert_eq!(datum.namespace, "Monitoring");
    }

    #[test]
    fn test_key_serialization() {
        let json = serde_json::to_string(&MetricKey::ClusterStatus).unwrap();
        assert_eq!(json, "\"clusterstatus\"");
    }
}
