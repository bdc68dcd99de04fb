// Application state for HTTP handlers
use crate::application::fleet_service::FleetService;
use crate::application::registration_service::RegistrationService;
use crate::infrastructure::page_model::PageModel;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub fleet: Arc<FleetService>,
    pub registration: RegistrationService,
    pub page: Arc<PageModel>,
}
