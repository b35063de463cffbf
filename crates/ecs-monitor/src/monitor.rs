//! One monitoring pass: poll ECS, classify, publish.
//!
//! The pass is strictly sequential. The cluster is checked first, then each
//! service in listing order, one describe call and one publish per service.
//! The first error aborts the pass; data points already sent stay sent, and
//! nothing further is published.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::metrics::{MetricDatum, MetricKey, MetricsSink};
use crate::orchestration::{ClusterStatus, OrchestrationApi, ServiceRuntime};

/// Summary of what one pass observed and published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorReport {
    /// Cluster snapshot.
    pub cluster: ClusterStatus,
    /// Service snapshots, in the order they were checked.
    pub services: Vec<ServiceRuntime>,
    /// Data points published, in order.
    pub datapoints: Vec<MetricDatum>,
}

impl MonitorReport {
    /// Services with at least one running task.
    #[must_use]
    pub fn healthy_services(&self) -> usize {
        self.services
            .iter()
            .filter(|s| s.running_task_count > 0)
            .count()
    }

    /// Services with no running tasks.
    #[must_use]
    pub fn unhealthy_services(&self) -> usize {
        self.services.len() - self.healthy_services()
    }

    /// Render the report as JSON for the function response.
    pub fn to_json(&self) -> Result<serde_json::Value, MonitorError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Value published for a cluster: 1 when active, 0 for every other status.
#[must_use]
pub fn cluster_value(cluster: &ClusterStatus) -> u32 {
    u32::from(cluster.state.is_active())
}

/// Value published for a service: the running task count, unchanged.
#[must_use]
pub fn service_value(service: &ServiceRuntime) -> u32 {
    service.running_task_count
}

/// Polls one cluster and reports its health.
pub struct HealthMonitor<A, S> {
    api: A,
    sink: S,
    config: MonitorConfig,
}

impl<A, S> HealthMonitor<A, S>
where
    A: OrchestrationApi,
    S: MetricsSink,
{
    /// Create a monitor.
    pub fn new(api: A, sink: S, config: MonitorConfig) -> Self {
        Self { api, sink, config }
    }

    /// Run one full pass.
    pub async fn run(&self) -> Result<MonitorReport, MonitorError> {
        self.config.validate()?;

        info!(
            cluster = %self.config.cluster,
            region = %self.config.region,
            sink = self.sink.name(),
            "Starting ECS health check"
        );

        let mut datapoints = Vec::new();

        let cluster = self.check_cluster(&mut datapoints).await?;
        let services = self.check_services(&mut datapoints).await?;

        let report = MonitorReport {
            cluster,
            services,
            datapoints,
        };

        info!(
            cluster = %report.cluster.name,
            status = %report.cluster.state,
            services = report.services.len(),
            healthy = report.healthy_services(),
            unhealthy = report.unhealthy_services(),
            datapoints = report.datapoints.len(),
            "ECS health check complete"
        );

        Ok(report)
    }

    async fn check_cluster(
        &self,
        datapoints: &mut Vec<MetricDatum>,
    ) -> Result<ClusterStatus, MonitorError> {
        let cluster = self.api.describe_cluster(&self.config.cluster).await?;
        let value = cluster_value(&cluster);

        if value == 0 {
            warn!(cluster = %cluster.name, status = %cluster.state, "Cluster is not active");
        }

        datapoints.push(
            self.report(MetricKey::ClusterStatus, &cluster.name, value)
                .await?,
        );
        Ok(cluster)
    }

    async fn check_services(
        &self,
        datapoints: &mut Vec<MetricDatum>,
    ) -> Result<Vec<ServiceRuntime>, MonitorError> {
        let arns = self.api.list_services(&self.config.cluster).await?;
        let mut services = Vec::with_capacity(arns.len());

        for arn in &arns {
            let service = self.api.describe_service(&self.config.cluster, arn).await?;
            let value = service_value(&service);

            if value == 0 {
                warn!(service = %service.name, "Service has no running tasks");
            }

            datapoints.push(
                self.report(MetricKey::RunningTasks, &service.name, value)
                    .await?,
            );
            services.push(service);
        }

        Ok(services)
    }

    /// Publish one datum for `resource`.
    async fn report(
        &self,
        key: MetricKey,
        resource: &str,
        value: u32,
    ) -> Result<MetricDatum, MonitorError> {
        let datum = MetricDatum::new(key, resource, value, &self.config.namespace);
        self.sink.publish(&datum).await?;

        info!(
            metric = %datum.name,
            resource = %resource,
            value,
            "Published metric"
        );
        Ok(datum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MockMetricsSink;
    use crate::orchestration::{ClusterState, MockOrchestrationApi};
    use mockall::Sequence;

    const ARN_WEB: &str = "arn:aws:ecs:eu-north-1:123456789012:service/Cluster/web";
    const ARN_WORKER: &str = "arn:aws:ecs:eu-north-1:123456789012:service/Cluster/worker";

    fn cluster(state: &str) -> ClusterStatus {
        ClusterStatus {
            name: "Cluster".to_string(),
            state: ClusterState::parse(state),
        }
    }

    fn api_with_cluster(state: &'static str) -> MockOrchestrationApi {
        let mut api = MockOrchestrationApi::new();
        api.expect_describe_cluster()
            .withf(|cluster| cluster == "Cluster")
            .times(1)
            .returning(move |_| Ok(cluster(state)));
        api
    }

    fn sink_expecting(metric: &'static str, resource: &'static str, value: f64) -> MockMetricsSink {
        let mut sink = MockMetricsSink::new();
        sink.expect_name().return_const("mock");
        sink.expect_publish()
            .withf(move |d| {
                d.name == metric
                    && d.dimension_name == "ECSMonitoring"
                    && d.dimension_value == resource
                    && d.namespace == "Monitoring"
                    && (d.value - value).abs() < f64::EPSILON
            })
            .times(1)
            .returning(|_| Ok(()));
        sink
    }

    #[tokio::test]
    async fn test_report_to_json() {
        let mut api = api_with_cluster("ACTIVE");
        api.expect_list_services().returning(|_| Ok(vec![]));
        let sink = sink_expecting("ECSMonitoring-clusterstatus", "Cluster", 1.0);

        let report = HealthMonitor::new(api, sink, MonitorConfig::default())
            .run()
            .await
            .unwrap();
        let json = report.to_json().unwrap();

        assert_eq!(json["cluster"]["name"], "Cluster");
        assert_eq!(json["datapoints"][0]["name"], "ECSMonitoring-clusterstatus");
        assert_eq!(json["datapoints"][0]["dimension_name"], "ECSMonitoring");
        assert!(json["services"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_active_cluster_reports_one() {
        let mut api = api_with_cluster("ACTIVE");
        api.expect_list_services().returning(|_| Ok(vec![]));
        let sink = sink_expecting("ECSMonitoring-clusterstatus", "Cluster", 1.0);

        let report = HealthMonitor::new(api, sink, MonitorConfig::default())
            .run()
            .await
            .unwrap();

        assert!(report.cluster.state.is_active());
        assert_eq!(report.datapoints.len(), 1);
    }

    #[tokio::test]
    async fn test_inactive_cluster_reports_zero() {
        let mut api = api_with_cluster("INACTIVE");
        api.expect_list_services().returning(|_| Ok(vec![]));
        let sink = sink_expecting("ECSMonitoring-clusterstatus", "Cluster", 0.0);

        let report = HealthMonitor::new(api, sink, MonitorConfig::default())
            .run()
            .await
            .unwrap();

        assert_eq!(report.datapoints.len(), 1);
        assert!((report.datapoints[0].value).abs() < f64::EPSILON);
    }

    #[test]
    fn test_every_cluster_state_maps_to_exactly_one_value() {
        for raw in ["ACTIVE", "INACTIVE", "PROVISIONING", "DEPROVISIONING", "FAILED", ""] {
            let value = cluster_value(&cluster(raw));
            assert_eq!(value, u32::from(raw == "ACTIVE"), "status {raw:?}");
        }
    }

    #[test]
    fn test_service_value_is_running_count() {
        for count in [0, 1, 3, 250, u32::MAX] {
            let service = ServiceRuntime {
                name: "web".to_string(),
                running_task_count: count,
            };
            assert_eq!(service_value(&service), count);
        }
    }

    #[tokio::test]
    async fn test_services_report_running_counts_in_order() {
        let mut api = api_with_cluster("ACTIVE");
        api.expect_list_services()
            .withf(|cluster| cluster == "Cluster")
            .times(1)
            .returning(|_| Ok(vec![ARN_WEB.to_string(), ARN_WORKER.to_string()]));
        api.expect_describe_service()
            .returning(|_, arn| {
                let running_task_count = if arn == ARN_WEB { 3 } else { 0 };
                Ok(ServiceRuntime {
                    name: crate::orchestration::service_name_from_arn(arn).to_string(),
                    running_task_count,
                })
            });

        let mut seq = Sequence::new();
        let mut sink = MockMetricsSink::new();
        sink.expect_name().return_const("mock");
        sink.expect_publish()
            .withf(|d| d.name == "ECSMonitoring-clusterstatus")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_publish()
            .withf(|d| {
                d.name == "ECSMonitoring-runningtasks"
                    && d.dimension_value == "web"
                    && (d.value - 3.0).abs() < f64::EPSILON
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        sink.expect_publish()
            .withf(|d| {
                d.name == "ECSMonitoring-runningtasks"
                    && d.dimension_value == "worker"
                    && d.value.abs() < f64::EPSILON
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let report = HealthMonitor::new(api, sink, MonitorConfig::default())
            .run()
            .await
            .unwrap();

        assert_eq!(report.datapoints.len(), 3);
        assert_eq!(report.healthy_services(), 1);
        assert_eq!(report.unhealthy_services(), 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_stops_the_pass() {
        let mut api = api_with_cluster("ACTIVE");
        api.expect_list_services()
            .returning(|_| Ok(vec![ARN_WEB.to_string(), ARN_WORKER.to_string()]));
        api.expect_describe_service()
            .withf(|cluster, arn| cluster == "Cluster" && arn == ARN_WEB)
            .times(1)
            .returning(|_, _| Err(MonitorError::orchestration("DescribeServices", "throttled")));
        api.expect_describe_service()
            .withf(|_, arn| arn == ARN_WORKER)
            .never();

        // Only the cluster datum goes out.
        let sink = sink_expecting("ECSMonitoring-clusterstatus", "Cluster", 1.0);

        let err = HealthMonitor::new(api, sink, MonitorConfig::default())
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MonitorError::Orchestration {
                operation: "DescribeServices",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cluster_failure_publishes_nothing() {
        let mut api = MockOrchestrationApi::new();
        api.expect_describe_cluster()
            .returning(|name| Err(MonitorError::ClusterNotFound(name.to_string())));
        api.expect_list_services().never();

        let mut sink = MockMetricsSink::new();
        sink.expect_name().return_const("mock");
        sink.expect_publish().never();

        let err = HealthMonitor::new(api, sink, MonitorConfig::default())
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, MonitorError::ClusterNotFound(name) if name == "Cluster"));
    }

    #[tokio::test]
    async fn test_publish_failure_stops_the_pass() {
        let mut api = api_with_cluster("ACTIVE");
        api.expect_list_services().never();

        let mut sink = MockMetricsSink::new();
        sink.expect_name().return_const("mock");
        sink.expect_publish()
            .times(1)
            .returning(|d| Err(MonitorError::publish(&d.name, "AccessDenied")));

        let err = HealthMonitor::new(api, sink, MonitorConfig::default())
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, MonitorError::Publish { .. }));
    }

    #[tokio::test]
    async fn test_invalid_config_makes_no_calls() {
        let mut api = MockOrchestrationApi::new();
        api.expect_describe_cluster().never();
        let mut sink = MockMetricsSink::new();
        sink.expect_publish().never();

        let config = MonitorConfig::default().with_cluster("");
        let err = HealthMonitor::new(api, sink, config).run().await.unwrap_err();

        assert!(matches!(err, MonitorError::Config(_)));
    }

    #[tokio::test]
    async fn test_custom_namespace_and_cluster() {
        let mut api = MockOrchestrationApi::new();
        api.expect_describe_cluster()
            .withf(|cluster| cluster == "prod")
            .returning(|name| {
                Ok(ClusterStatus {
                    name: name.to_string(),
                    state: ClusterState::Active,
                })
            });
        api.expect_list_services()
            .withf(|cluster| cluster == "prod")
            .returning(|_| Ok(vec![]));

        let mut sink = MockMetricsSink::new();
        sink.expect_name().return_const("mock");
        sink.expect_publish()
            .withf(|d| d.namespace == "Staging" && d.dimension_value == "prod")
            .times(1)
            .returning(|_| Ok(()));

        let config = MonitorConfig::default()
            .with_cluster("prod")
            .with_namespace("Staging");
        let report = HealthMonitor::new(api, sink, config).run().await.unwrap();

        assert_eq!(report.cluster.name, "prod");
    }
}
