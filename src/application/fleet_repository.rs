// Repository trait for the fleet backend
use crate::domain::device::{DeviceListPayload, LiveRecord, RegistrationReceipt, StatusReport};
use async_trait::async_trait;
use std::collections::BTreeMap;

#[async_trait]
pub trait FleetRepository: Send + Sync {
    /// Initial rendering payload, fetched once at startup
    async fn fetch_device_list(&self) -> anyhow::Result<DeviceListPayload>;

    /// Latest telemetry, one record per device. An empty list means no updates.
    async fn fetch_live_data(&self) -> anyhow::Result<Vec<LiveRecord>>;

    /// Aggregate health per device
    async fn fetch_device_status(&self) -> anyhow::Result<StatusReport>;

    /// Submit the registration form as a multipart body
    async fn submit_registration(
        &self,
        fields: &BTreeMap<String, String>,
    ) -> anyhow::Result<RegistrationReceipt>;
}
