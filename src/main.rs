// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{routing::{get, post}, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::fleet_service::FleetService;
use crate::application::polling::TracingObserver;
use crate::application::registration_service::RegistrationService;
use crate::infrastructure::config::load_monitor_config;
use crate::infrastructure::http_repository::HttpFleetRepository;
use crate::infrastructure::page_model::PageModel;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, page_snapshot, polling_status, refresh_now, register,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_monitor_config()?;
    let metrics = config.polling.metrics()?;

    // Create repository and rendering target (infrastructure layer)
    let repository = Arc::new(HttpFleetRepository::new(&config.backend, config.endpoints.clone())?);
    let page = Arc::new(PageModel::new());

    // Create services (application layer)
    let fleet = Arc::new(FleetService::new(
        repository.clone(),
        page.clone(),
        Arc::new(TracingObserver),
        metrics,
        config.polling.live_interval(),
    ));
    let registration = RegistrationService::new(repository, page.clone());

    fleet.initialize().await?;

    let state = Arc::new(AppState {
        fleet: fleet.clone(),
        registration,
        page,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/page", get(page_snapshot))
        .route("/polling", get(polling_status))
        .route("/refresh", post(refresh_now))
        .route("/register", post(register))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("Starting reefer-monitor on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    fleet.teardown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
