// Card updater - turns a live record into paint operations for one device card
use crate::application::renderer::{CardUpdate, TrendIcon};
use crate::domain::device::{numeric_value, LiveRecord};
use crate::domain::metric::Metric;
use crate::domain::trend::TrendTracker;
use serde_json::Value;

const MISSING_VALUE: &str = "NA";
const DATE_ELEMENT_PREFIX: &str = "fechita";

#[derive(Debug, Clone)]
pub struct CardUpdater {
    metrics: Vec<Metric>,
}

impl CardUpdater {
    pub fn new(metrics: Vec<Metric>) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Build every update for one record, feeding each metric through the tracker.
    pub fn updates_for(&self, record: &LiveRecord, tracker: &mut TrendTracker) -> Vec<CardUpdate> {
        let device_id = &record.device_id;
        let mut updates = Vec::with_capacity(1 + self.metrics.len() * 2);

        updates.push(CardUpdate::Text {
            element_id: format!("{}_{}", DATE_ELEMENT_PREFIX, device_id),
            text: record.last_updated.clone().unwrap_or_default(),
        });

        for &metric in &self.metrics {
            updates.push(CardUpdate::Text {
                element_id: format!("{}_{}", metric.element_prefix(), device_id),
                text: format_value(metric, record.field(metric.display_field())),
            });

            let reading = record.reading(metric);
            match tracker.update(reading.metric, &reading.device_id, reading.value) {
                Ok(signal) => {
                    if let Some(icon) = TrendIcon::for_signal(signal) {
                        updates.push(CardUpdate::Trend {
                            element_id: format!("{}_{}", metric.icon_prefix(), device_id),
                            icon,
                        });
                    }
                }
                Err(e) => tracing::warn!("Skipping trend for device {}: {}", device_id, e),
            }
        }

        updates
    }
}

/// Display text for a metric value: `NA` when missing, otherwise the value followed
/// by its unit. A value outside the metric's display range is shown as `NA` plus the unit.
pub fn format_value(metric: Metric, value: Option<&Value>) -> String {
    let Some(value) = value else {
        return MISSING_VALUE.to_string();
    };

    let in_range = match metric.display_range() {
        Some((min, max)) => numeric_value(value).is_some_and(|v| (min..=max).contains(&v)),
        None => true,
    };

    let text = if in_range {
        display_text(value)
    } else {
        MISSING_VALUE.to_string()
    };
    format!("{}{}", text, metric.unit())
}

/// Whole-valued floats print without a fractional part (`35.0` becomes `35`).
fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) => f.to_string(),
            (None, None, None) => n.to_string(),
        },
        other => other.to_string(),
    }
}
