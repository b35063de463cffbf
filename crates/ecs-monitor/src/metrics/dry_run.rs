//! Sink that logs data points instead of publishing them.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;

use super::{MetricDatum, MetricsSink};
use crate::error::MonitorError;

/// Logs every datum and keeps a copy in memory.
#[derive(Debug, Clone, Default)]
pub struct DryRunSink {
    published: Arc<Mutex<Vec<MetricDatum>>>,
}

impl DryRunSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Data points received so far, in order.
    #[must_use]
    pub fn published(&self) -> Vec<MetricDatum> {
        self.published
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MetricsSink for DryRunSink {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn publish(&self, datum: &MetricDatum) -> Result<(), MonitorError> {
        info!(
            namespace = %datum.namespace,
            metric = %datum.name,
            resource = %datum.dimension_value,
            value = datum.value,
            "Dry run: metric not published"
        );

        if let Ok(mut published) = self.published.lock() {
            published.push(datum.clone());
        }
        Ok(())
    }
}
