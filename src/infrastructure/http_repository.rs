// HTTP repository implementation for the fleet backend
use crate::application::fleet_repository::FleetRepository;
use crate::domain::device::{
    parse_live_payload, DeviceListPayload, LiveRecord, RegistrationReceipt, StatusReport,
};
use crate::error::MonitorError;
use crate::infrastructure::config::{BackendSettings, EndpointSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpFleetRepository {
    client: reqwest::Client,
    base_url: String,
    endpoints: EndpointSettings,
}

/// The status endpoint answers with a bare empty array when it has nothing to report.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusPayload {
    Empty(Vec<serde_json::Value>),
    Report(StatusReport),
}

impl HttpFleetRepository {
    pub fn new(backend: &BackendSettings, endpoints: EndpointSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(backend.request_timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: backend.base_url.trim_end_matches('/').to_string(),
            endpoints,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| MonitorError::network(endpoint, e))?;

        Self::read_json(endpoint, response).await
    }

    async fn read_json<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let reason = format!("HTTP status {}", response.status());
            return Err(MonitorError::network(endpoint, reason).into());
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", endpoint))
    }
}

#[async_trait]
impl FleetRepository for HttpFleetRepository {
    async fn fetch_device_list(&self) -> Result<DeviceListPayload> {
        self.get_json(&self.endpoints.device_list).await
    }

    async fn fetch_live_data(&self) -> Result<Vec<LiveRecord>> {
        let payload: serde_json::Value = self.get_json(&self.endpoints.live_data).await?;
        Ok(parse_live_payload(payload))
    }

    async fn fetch_device_status(&self) -> Result<StatusReport> {
        let payload: Option<StatusPayload> = self.get_json(&self.endpoints.device_status).await?;
        Ok(match payload {
            Some(StatusPayload::Report(report)) => report,
            Some(StatusPayload::Empty(_)) | None => StatusReport::default(),
        })
    }

    async fn submit_registration(
        &self,
        fields: &BTreeMap<String, String>,
    ) -> Result<RegistrationReceipt> {
        let endpoint = &self.endpoints.register;
        let form = fields
            .iter()
            .fold(Form::new(), |form, (name, value)| form.text(name.clone(), value.clone()));

        let response = self
            .client
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MonitorError::network(endpoint, e))?;

        Self::read_json(endpoint, response).await
    }
}
