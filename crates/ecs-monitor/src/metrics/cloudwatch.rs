//! CloudWatch metrics sink.

use async_trait::async_trait;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, MetricDatum as CwDatum, StandardUnit};
use aws_sdk_cloudwatch::Client;
use tracing::debug;

use super::{MetricDatum, MetricUnit, MetricsSink};
use crate::error::MonitorError;

/// Publishes each datum with its own `PutMetricData` call.
#[derive(Clone, Debug)]
pub struct CloudWatchSink {
    client: Client,
}

impl CloudWatchSink {
    /// Wrap an SDK client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a sink on top of a shared SDK configuration, optionally pinned
    /// to a region other than the ambient one.
    #[must_use]
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, region: Option<&str>) -> Self {
        let mut builder = aws_sdk_cloudwatch::config::Builder::from(sdk_config);
        if let Some(region) = region {
            builder = builder.region(aws_config::Region::new(region.to_string()));
        }
        Self::new(Client::from_conf(builder.build()))
    }

    fn to_cloudwatch(datum: &MetricDatum) -> CwDatum {
        let unit = match datum.unit {
            MetricUnit::Count => StandardUnit::Count,
        };

        CwDatum::builder()
            .metric_name(&datum.name)
            .dimensions(
                Dimension::builder()
                    .name(&datum.dimension_name)
                    .value(&datum.dimension_value)
                    .build(),
            )
            .unit(unit)
            .value(datum.value)
            .timestamp(DateTime::from_millis(datum.timestamp.timestamp_millis()))
            .build()
    }
}

#[async_trait]
impl MetricsSink for CloudWatchSink {
    fn name(&self) -> &'static str {
        "cloudwatch"
    }

    async fn publish(&self, datum: &MetricDatum) -> Result<(), MonitorError> {
        debug!(
            namespace = %datum.namespace,
            metric = %datum.name,
            resource = %datum.dimension_value,
            value = datum.value,
            "PutMetricData"
        );

        self.client
            .put_metric_data()
            .namespace(&datum.namespace)
            .metric_data(Self::to_cloudwatch(datum))
            .send()
            .await
            .map_err(|e| MonitorError::publish(&datum.name, DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
