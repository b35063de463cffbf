//! ECS health monitoring.
//!
//! Polls one ECS cluster and its services and publishes one CloudWatch data
//! point per observation:
//!
//! - `ECSMonitoring-clusterstatus`: 1 when the cluster is `ACTIVE`, 0 otherwise
//! - `ECSMonitoring-runningtasks`: the running task count of each service
//!
//! Every datum is written to the `Monitoring` namespace with a single
//! `ECSMonitoring` dimension holding the cluster or service name. Alarms
//! should threshold on the value; healthy and unhealthy observations share
//! the same metric name.
//!
//! # Architecture
//!
//! - [`OrchestrationApi`] reads cluster and service state ([`EcsClient`])
//! - [`MetricsSink`] publishes data points ([`CloudWatchSink`], [`DryRunSink`])
//! - [`HealthMonitor`] runs one sequential, fail-fast pass over both
//!
//! The `bootstrap` binary serves the pass as a Lambda function; the
//! `ecs-monitor` binary runs it from a shell.

pub mod config;
pub mod error;
pub mod handler;
pub mod metrics;
pub mod monitor;
pub mod orchestration;
pub mod telemetry;

pub use config::MonitorConfig;
pub use error::MonitorError;
pub use metrics::{CloudWatchSink, DryRunSink, MetricDatum, MetricKey, MetricUnit, MetricsSink};
pub use monitor::{HealthMonitor, MonitorReport};
pub use orchestration::{
    ClusterState, ClusterStatus, EcsClient, OrchestrationApi, ServiceRuntime,
};
