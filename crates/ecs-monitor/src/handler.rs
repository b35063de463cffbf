//! Function runtime entry point.
//!
//! The trigger payload is accepted but not inspected; every invocation is an
//! independent pass with fresh clients and no carried-over state.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::metrics::CloudWatchSink;
use crate::monitor::{HealthMonitor, MonitorReport};
use crate::orchestration::EcsClient;

/// Build SDK-backed clients for `config` and run one pass.
pub async fn run_once(config: MonitorConfig) -> Result<MonitorReport, MonitorError> {
    config.validate()?;

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let api = EcsClient::from_sdk_config(&sdk_config, &config.region);
    let sink = CloudWatchSink::from_sdk_config(&sdk_config, config.metrics_region.as_deref());

    HealthMonitor::new(api, sink, config).run().await
}

/// Handle one invocation. Any failure is returned to the runtime unhandled.
pub async fn handle(event: LambdaEvent<Value>) -> Result<Value, Error> {
    info!(request_id = %event.context.request_id, "Invocation received");

    let report = run_once(MonitorConfig::from_env()).await?;
    Ok(report.to_json()?)
}
