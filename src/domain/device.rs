// Device telemetry domain models
use super::metric::Metric;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stable device identifier. The backend sends it as either a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => DeviceId(s),
            RawId::Number(n) => DeviceId(n.to_string()),
        })
    }
}

/// One device's row from the live-data endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveRecord {
    #[serde(rename = "telemetria_id")]
    pub device_id: DeviceId,
    #[serde(rename = "ultima_fecha", default)]
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LiveRecord {
    /// Raw value of a backend field; JSON null counts as missing.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    /// Reading used for trend tracking, taken from the metric's own field.
    pub fn reading(&self, metric: Metric) -> MetricReading {
        MetricReading {
            device_id: self.device_id.clone(),
            metric,
            value: self.field(metric.field_name()).and_then(numeric_value),
            timestamp: self.last_updated.clone(),
        }
    }
}

/// Decode a live-data batch record by record. `null` means no updates; a record
/// that does not decode is logged and dropped so the rest of the batch still applies.
pub fn parse_live_payload(payload: Value) -> Vec<LiveRecord> {
    let items = match payload {
        Value::Null => return Vec::new(),
        Value::Array(items) => items,
        other => {
            tracing::warn!("Ignoring live-data payload that is not a list: {}", other);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<LiveRecord>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping live record {}: {}", index, e);
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    pub device_id: DeviceId,
    pub metric: Metric,
    pub value: Option<f64>,
    pub timestamp: Option<String>,
}

/// Numeric view of a backend value. Numeric strings count; anything else is no reading.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Initial rendering payload from the device-list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceListPayload {
    #[serde(rename = "text_ok", default)]
    pub summary_html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    Wait,
    Offline,
    Other(String),
}

impl From<String> for DeviceState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "WAIT" => Self::Wait,
            "OFFLINE" => Self::Offline,
            _ => Self::Other(raw),
        }
    }
}

impl<'de> Deserialize<'de> for DeviceState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(DeviceState::from)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceStatus {
    #[serde(rename = "estado")]
    pub state: DeviceState,
}

/// Aggregate health report from the device-status endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusReport {
    #[serde(rename = "estado", default)]
    pub devices: Vec<DeviceStatus>,
    #[serde(rename = "text", default)]
    pub html: Option<String>,
}

impl StatusReport {
    pub fn needs_attention(&self) -> bool {
        self.devices
            .iter()
            .any(|d| matches!(d.state, DeviceState::Wait | DeviceState::Offline))
    }
}

/// Result of a registration form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    #[serde(rename(deserialize = "msg"), default)]
    pub message: String,
    #[serde(rename(deserialize = "icono"), default)]
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_live_record_accepts_numeric_and_text_ids() {
        let records: Vec<LiveRecord> = serde_json::from_value(json!([
            { "telemetria_id": 17, "ultima_fecha": "2024-05-01 10:00:00", "co2_reading": 4.5 },
            { "telemetria_id": "R-22", "ethylene": null }
        ]))
        .unwrap();

        assert_eq!(records[0].device_id.as_str(), "17");
        assert_eq!(records[0].last_updated.as_deref(), Some("2024-05-01 10:00:00"));
        assert_eq!(records[1].device_id.as_str(), "R-22");
        assert!(records[1].last_updated.is_none());
        assert!(records[1].field("ethylene").is_none());
    }

    #[test]
    fn test_live_payload_null_and_empty_mean_no_updates() {
        assert!(parse_live_payload(Value::Null).is_empty());
        assert!(parse_live_payload(json!([])).is_empty());
        assert!(parse_live_payload(json!({ "error": "busy" })).is_empty());
    }

    #[test]
    fn test_live_payload_decodes_a_normal_batch() {
        let records = parse_live_payload(json!([
            { "telemetria_id": "D1", "co2_reading": 5 },
            { "telemetria_id": 2, "co2_reading": 6 }
        ]));

        let ids: Vec<&str> = records.iter().map(|r| r.device_id.as_str()).collect();
        assert_eq!(ids, vec!["D1", "2"]);
    }

    #[test]
    fn test_live_payload_skips_records_that_do_not_decode() {
        let records = parse_live_payload(json!([
            { "telemetria_id": "D1", "co2_reading": 5 },
            { "telemetria_id": null, "co2_reading": 7 },
            { "co2_reading": 8 },
            { "telemetria_id": 4.5 },
            "garbage",
            { "telemetria_id": "D6", "co2_reading": 9 }
        ]));

        let ids: Vec<&str> = records.iter().map(|r| r.device_id.as_str()).collect();
        assert_eq!(ids, vec!["D1", "D6"]);
        assert_eq!(records[0].reading(Metric::Co2).value, Some(5.0));
    }

    #[test]
    fn test_reading_coerces_numeric_strings() {
        let record: LiveRecord = serde_json::from_value(json!({
            "telemetria_id": 3,
            "temp_supply": "34.2",
            "temp_supply_1": 35,
            "controlling_mode": "CHILL"
        }))
        .unwrap();

        assert_eq!(record.reading(Metric::SupplyTemperature).value, Some(34.2));
        assert_eq!(record.reading(Metric::ControlMode).value, None);
        assert_eq!(record.reading(Metric::Co2).value, None);
    }

    #[test]
    fn test_status_report_flags_wait_and_offline() {
        let report: StatusReport = serde_json::from_value(json!({
            "estado": [{ "estado": "ONLINE" }, { "estado": "OFFLINE" }],
            "text": "<table></table>"
        }))
        .unwrap();
        assert!(report.needs_attention());

        let healthy: StatusReport =
            serde_json::from_value(json!({ "estado": [{ "estado": "ONLINE" }] })).unwrap();
        assert!(!healthy.needs_attention());
        assert!(!StatusReport::default().needs_attention());
    }

    #[test]
    fn test_receipt_reads_backend_keys() {
        let receipt: RegistrationReceipt =
            serde_json::from_value(json!({ "msg": "Saved", "icono": "success" })).unwrap();
        assert_eq!(receipt.message, "Saved");
        assert_eq!(receipt.icon, "success");
    }
}
