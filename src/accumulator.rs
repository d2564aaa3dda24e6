//! Destination for collected metrics.

use crate::metric::{FieldSet, Metric, TagSet};

/// Receives one call per emitted row.
pub trait Accumulator {
    fn add_fields(&mut self, measurement: &str, fields: FieldSet, tags: TagSet);
}

/// Accumulator that keeps every metric in memory, in emission order.
#[derive(Debug, Default)]
pub struct MetricBuffer {
    metrics: Vec<Metric>,
}

impl MetricBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn into_metrics(self) -> Vec<Metric> {
        self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn has_measurement(&self, measurement: &str) -> bool {
        self.metrics.iter().any(|m| m.measurement == measurement)
    }

    pub fn has_tag(&self, measurement: &str, key: &str) -> bool {
        self.metrics
            .iter()
            .any(|m| m.measurement == measurement && m.tags.contains_key(key))
    }

    pub fn has_field(&self, measurement: &str, key: &str) -> bool {
        self.metrics
            .iter()
            .any(|m| m.measurement == measurement && m.fields.contains_key(key))
    }
}

impl Accumulator for MetricBuffer {
    fn add_fields(&mut self, measurement: &str, fields: FieldSet, tags: TagSet) {
        self.metrics.push(Metric::new(measurement, fields, tags));
    }
}
