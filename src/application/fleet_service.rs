// Fleet service - Startup load, live refresh and status checks for the dashboard
use crate::application::card_updater::CardUpdater;
use crate::application::fleet_repository::FleetRepository;
use crate::application::polling::{ErrorObserver, PollingScheduler};
use crate::application::renderer::Renderer;
use crate::domain::metric::Metric;
use crate::domain::trend::TrendTracker;
use crate::error::MonitorError;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

const EXTRA_CONTENT_ELEMENT: &str = "contenidoExtra";
const LOAD_FAILED_ALERT: &str = "Failed to load devices. Please reload the page.";

pub struct FleetService {
    repository: Arc<dyn FleetRepository>,
    renderer: Arc<dyn Renderer>,
    cards: CardUpdater,
    tracker: Mutex<TrendTracker>,
    scheduler: PollingScheduler,
    live_interval: Duration,
}

impl FleetService {
    pub fn new(
        repository: Arc<dyn FleetRepository>,
        renderer: Arc<dyn Renderer>,
        observer: Arc<dyn ErrorObserver>,
        metrics: Vec<Metric>,
        live_interval: Duration,
    ) -> Self {
        Self {
            repository,
            renderer,
            tracker: Mutex::new(TrendTracker::new(&metrics)),
            cards: CardUpdater::new(metrics),
            scheduler: PollingScheduler::new(observer),
            live_interval,
        }
    }

    /// Initial load followed by periodic refresh. A failed load is reported
    /// to the operator and polling starts anyway.
    pub async fn initialize(self: &Arc<Self>) -> Result<(), MonitorError> {
        tracing::info!("Initializing fleet dashboard");

        if let Err(e) = self.load_initial_devices().await {
            tracing::warn!("Continuing without initial device list: {:#}", e);
        }

        self.start_periodic_updates()?;
        tracing::info!("Fleet dashboard initialized");
        Ok(())
    }

    pub fn teardown(&self) {
        self.stop_periodic_updates();
        tracing::info!("Fleet dashboard torn down");
    }

    /// Fetch and paint the device list, then check device health.
    pub async fn load_initial_devices(&self) -> anyhow::Result<()> {
        let payload = match self.repository.fetch_device_list().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Error loading devices: {:#}", e);
                self.renderer.alert(LOAD_FAILED_ALERT);
                return Err(e);
            }
        };

        if let Some(html) = &payload.summary_html {
            self.renderer.paint_html(EXTRA_CONTENT_ELEMENT, html);
        }
        tracing::debug!("Device list loaded");

        self.check_device_status().await;
        Ok(())
    }

    /// Raise the device alert when any device is waiting or offline. Errors are logged only.
    pub async fn check_device_status(&self) {
        match self.repository.fetch_device_status().await {
            Ok(report) => {
                tracing::debug!("Device status: {} devices reported", report.devices.len());
                if report.needs_attention() {
                    tracing::warn!("One or more devices are waiting or offline");
                    self.renderer
                        .show_device_alert(report.html.as_deref().unwrap_or_default());
                }
            }
            Err(e) => tracing::error!("Error checking device status: {:#}", e),
        }
    }

    /// Fetch live data and repaint every card. Returns the number of devices updated.
    ///
    /// A failed fetch leaves the trend memory untouched.
    pub async fn refresh_live_data(&self) -> anyhow::Result<usize> {
        let records = self.repository.fetch_live_data().await?;
        if records.is_empty() {
            tracing::debug!("Live refresh: no updates");
            return Ok(0);
        }

        for record in &records {
            let updates = {
                let mut tracker = self.lock_tracker();
                self.cards.updates_for(record, &mut tracker)
            };
            self.renderer.apply(&updates);
        }

        tracing::info!("Live refresh: {} devices", records.len());
        Ok(records.len())
    }

    pub fn start_periodic_updates(self: &Arc<Self>) -> Result<(), MonitorError> {
        // Weak so the timer does not keep the service alive.
        let service: Weak<Self> = Arc::downgrade(self);
        self.scheduler.start(self.live_interval, move || {
            let service = service.clone();
            async move {
                match service.upgrade() {
                    Some(service) => service.refresh_live_data().await.map(|_| ()),
                    None => Ok(()),
                }
            }
        })
    }

    pub fn stop_periodic_updates(&self) -> bool {
        self.scheduler.stop()
    }

    pub fn is_polling(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn polling_interval(&self) -> Option<Duration> {
        self.scheduler.period()
    }

    pub fn tracked_metrics(&self) -> &[Metric] {
        self.cards.metrics()
    }

    pub fn tracked_series(&self) -> usize {
        self.lock_tracker().series_count()
    }

    fn lock_tracker(&self) -> MutexGuard<'_, TrendTracker> {
        // every update is a single insert, a poisoned tracker is still consistent
        self.tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
