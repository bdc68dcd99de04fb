use crate::domain::metric::Metric;
use crate::error::MonitorError;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub backend: BackendSettings,
    #[serde(default)]
    pub endpoints: EndpointSettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EndpointSettings {
    pub device_list: String,
    pub live_data: String,
    pub device_status: String,
    pub register: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            device_list: "AdminPage/ListaDispositivoEmpresa".to_string(),
            live_data: "AdminPage/LiveData".to_string(),
            device_status: "AdminPage/TablaEstadoDispositivos".to_string(),
            register: "AdminPage/registrar".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PollingSettings {
    pub live_data_interval_ms: u64,
    /// Backend field names of the metrics shown on each card, in card order
    pub tracked_metrics: Vec<String>,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            live_data_interval_ms: 30_000,
            tracked_metrics: Metric::ALL
                .iter()
                .map(|m| m.field_name().to_string())
                .collect(),
        }
    }
}

impl PollingSettings {
    pub fn live_interval(&self) -> Duration {
        Duration::from_millis(self.live_data_interval_ms)
    }

    pub fn metrics(&self) -> Result<Vec<Metric>, MonitorError> {
        self.tracked_metrics.iter().map(|name| name.parse()).collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl MonitorConfig {
    fn validate(self) -> anyhow::Result<Self> {
        if self.backend.base_url.trim().is_empty() {
            anyhow::bail!("backend.base_url must not be empty");
        }
        if self.polling.live_data_interval_ms == 0 {
            return Err(MonitorError::InvalidInterval.into());
        }
        self.polling.metrics()?;
        Ok(self)
    }
}

/// Load `config/monitor.toml` (optional), overridden by `MONITOR_*` environment
/// variables, e.g. `MONITOR_BACKEND__BASE_URL`.
pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/monitor").required(false))
        .add_source(
            config::Environment::with_prefix("MONITOR")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("polling.tracked_metrics"),
        )
        .build()?;

    settings.try_deserialize::<MonitorConfig>()?.validate()
}

pub fn parse_monitor_config(toml: &str) -> anyhow::Result<MonitorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    settings.try_deserialize::<MonitorConfig>()?.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = parse_monitor_config(
            r#"
            [backend]
            base_url = "https://fleet.example.com/"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.request_timeout_ms, 10_000);
        assert_eq!(config.endpoints.live_data, "AdminPage/LiveData");
        assert_eq!(config.polling.live_interval(), Duration::from_secs(30));
        assert_eq!(config.polling.metrics().unwrap(), Metric::ALL.to_vec());
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides_and_metric_subset() {
        let config = parse_monitor_config(
            r#"
            [backend]
            base_url = "http://localhost/reefer"

            [endpoints]
            live_data = "api/live"

            [polling]
            live_data_interval_ms = 5000
            tracked_metrics = ["co2_reading", "ethylene"]
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoints.live_data, "api/live");
        assert_eq!(config.endpoints.register, "AdminPage/registrar");
        assert_eq!(config.polling.live_interval(), Duration::from_secs(5));
        assert_eq!(
            config.polling.metrics().unwrap(),
            vec![Metric::Co2, Metric::Ethylene]
        );
    }

    #[test]
    fn test_unknown_metric_is_rejected() {
        let err = parse_monitor_config(
            r#"
            [backend]
            base_url = "http://localhost"

            [polling]
            tracked_metrics = ["co2_reading", "c02_reading"]
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MonitorError>(),
            Some(MonitorError::InvalidMetricName(name)) if name == "c02_reading"
        ));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = parse_monitor_config(
            r#"
            [backend]
            base_url = "http://localhost"

            [polling]
            live_data_interval_ms = 0
            "#,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MonitorError>(),
            Some(MonitorError::InvalidInterval)
        ));
    }
}
