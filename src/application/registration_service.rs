// Registration service - Use case for submitting the registration form
use crate::application::fleet_repository::FleetRepository;
use crate::application::renderer::Renderer;
use crate::domain::device::RegistrationReceipt;
use crate::error::MonitorError;
use std::collections::BTreeMap;
use std::sync::Arc;

const SUBMIT_FAILED_ALERT: &str = "Registration failed. Please try again.";

#[derive(Clone)]
pub struct RegistrationService {
    repository: Arc<dyn FleetRepository>,
    renderer: Arc<dyn Renderer>,
}

impl RegistrationService {
    pub fn new(repository: Arc<dyn FleetRepository>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            repository,
            renderer,
        }
    }

    /// Submit the form. On success the receipt is shown and returned so the
    /// caller can reset the form; on failure the operator is alerted and the
    /// form should be left as it was.
    pub async fn submit(
        &self,
        fields: &BTreeMap<String, String>,
    ) -> Result<RegistrationReceipt, MonitorError> {
        match self.repository.submit_registration(fields).await {
            Ok(receipt) => {
                tracing::info!("Registration submitted: {}", receipt.message);
                self.renderer.notify(&receipt.message, &receipt.icon);
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("Error submitting registration: {:#}", e);
                self.renderer.alert(SUBMIT_FAILED_ALERT);
                Err(MonitorError::FormSubmissionFailure(format!("{:#}", e)))
            }
        }
    }
}
