// Trend tracking across refresh cycles
use super::device::DeviceId;
use super::metric::Metric;
use crate::error::MonitorError;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendSignal {
    Up,
    Down,
    None,
}

/// Remembers the last value seen for every (metric, device) pair and turns
/// each new reading into a trend signal.
///
/// Buckets exist only for the metrics the tracker was built with; readings
/// for any other metric are rejected rather than opening a new series.
#[derive(Debug, Clone)]
pub struct TrendTracker {
    memory: HashMap<Metric, HashMap<DeviceId, Option<f64>>>,
}

impl TrendTracker {
    pub fn new(tracked: &[Metric]) -> Self {
        Self {
            memory: tracked.iter().map(|m| (*m, HashMap::new())).collect(),
        }
    }

    /// Record `value` for the pair and report how it moved since the previous reading.
    ///
    /// The stored value is always replaced, so an absent reading clears the
    /// baseline and the next reading after the gap yields `None` as well.
    /// Comparison is exact.
    pub fn update(
        &mut self,
        metric: Metric,
        device_id: &DeviceId,
        value: Option<f64>,
    ) -> Result<TrendSignal, MonitorError> {
        let series = self
            .memory
            .get_mut(&metric)
            .ok_or_else(|| MonitorError::InvalidMetricName(metric.field_name().to_string()))?;

        let previous = series.insert(device_id.clone(), value).flatten();

        Ok(match (previous, value) {
            (Some(prev), Some(next)) if next > prev => TrendSignal::Up,
            (Some(prev), Some(next)) if next < prev => TrendSignal::Down,
            _ => TrendSignal::None,
        })
    }

    /// Number of (metric, device) series seen so far.
    pub fn series_count(&self) -> usize {
        self.memory.values().map(HashMap::len).sum()
    }
}

impl Default for TrendTracker {
    fn default() -> Self {
        Self::new(&Metric::ALL)
    }
}
