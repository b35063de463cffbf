//! ECS implementation of [`OrchestrationApi`] backed by the AWS SDK.

use async_trait::async_trait;
use aws_sdk_ecs::error::DisplayErrorContext;
use aws_sdk_ecs::types::Failure;
use aws_sdk_ecs::Client;
use tracing::{debug, info};

use super::{service_name_from_arn, ClusterState, ClusterStatus, OrchestrationApi, ServiceRuntime};
use crate::error::MonitorError;

/// ECS API client.
#[derive(Clone, Debug)]
pub struct EcsClient {
    client: Client,
}

impl EcsClient {
    /// Wrap an SDK client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client for `region` on top of a shared SDK configuration.
    #[must_use]
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, region: &str) -> Self {
        let config = aws_sdk_ecs::config::Builder::from(sdk_config)
            .region(aws_config::Region::new(region.to_string()))
            .build();
        Self::new(Client::from_conf(config))
    }
}

/// Render API-reported failures as `arn (reason)` pairs.
fn describe_failures(failures: &[Failure]) -> String {
    failures
        .iter()
        .map(|f| {
            format!(
                "{} ({})",
                f.arn().unwrap_or("unknown"),
                f.reason().unwrap_or("no reason")
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait]
impl OrchestrationApi for EcsClient {
    async fn describe_cluster(&self, cluster: &str) -> Result<ClusterStatus, MonitorError> {
        debug!(cluster = %cluster, "DescribeClusters");

        let output = self
            .client
            .describe_clusters()
            .clusters(cluster)
            .send()
            .await
            .map_err(|e| {
                MonitorError::orchestration("DescribeClusters", DisplayErrorContext(&e).to_string())
            })?;

        let Some(found) = output.clusters().first() else {
            let failures = describe_failures(output.failures());
            debug!(cluster = %cluster, failures = %failures, "Cluster missing from response");
            return Err(MonitorError::ClusterNotFound(cluster.to_string()));
        };

        let status = found.status().ok_or_else(|| {
            MonitorError::InvalidResponse(format!("cluster {cluster} has no status"))
        })?;

        Ok(ClusterStatus {
            name: found.cluster_name().unwrap_or(cluster).to_string(),
            state: ClusterState::parse(status),
        })
    }

    async fn list_services(&self, cluster: &str) -> Result<Vec<String>, MonitorError> {
        debug!(cluster = %cluster, "ListServices");

        let mut pages = self
            .client
            .list_services()
            .cluster(cluster)
            .into_paginator()
            .send();

        let mut arns = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                MonitorError::orchestration("ListServices", DisplayErrorContext(&e).to_string())
            })?;
            arns.extend(page.service_arns().iter().cloned());
        }

        info!(cluster = %cluster, service_count = arns.len(), "Listed services");
        Ok(arns)
    }

    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<ServiceRuntime, MonitorError> {
        debug!(cluster = %cluster, service = %service, "DescribeServices");

        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .services(service)
            .send()
            .await
            .map_err(|e| {
                MonitorError::orchestration("DescribeServices", DisplayErrorContext(&e).to_string())
            })?;

        let Some(found) = output.services().first() else {
            let failures = describe_failures(output.failures());
            debug!(service = %service, failures = %failures, "Service missing from response");
            return Err(MonitorError::ServiceNotFound(service.to_string()));
        };

        let running = found.running_count();
        let running_task_count = u32::try_from(running).map_err(|_| {
            MonitorError::InvalidResponse(format!(
                "service {service} reported a negative running count ({running})"
            ))
        })?;

        Ok(ServiceRuntime {
            name: service_name_from_arn(service).to_string(),
            running_task_count,
        })
    }
}
