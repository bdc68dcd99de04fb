// HTTP request handlers
use crate::domain::metric::Metric;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Serialize)]
pub struct PollingStatus {
    pub running: bool,
    pub interval_ms: Option<u64>,
    pub tracked_metrics: Vec<Metric>,
    pub tracked_series: usize,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current state of the painted page
pub async fn page_snapshot(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.page.snapshot())
}

pub async fn polling_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let fleet = &state.fleet;
    Json(PollingStatus {
        running: fleet.is_polling(),
        interval_ms: fleet.polling_interval().map(whole_millis),
        tracked_metrics: fleet.tracked_metrics().to_vec(),
        tracked_series: fleet.tracked_series(),
    })
}

/// Saturates instead of truncating for periods beyond `u64::MAX` milliseconds.
fn whole_millis(period: Duration) -> u64 {
    u64::try_from(period.as_millis()).unwrap_or(u64::MAX)
}

/// Manual live-data refresh, outside the polling cadence
pub async fn refresh_now(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.fleet.refresh_live_data().await {
        Ok(devices) => (StatusCode::OK, Json(json!({ "devices": devices }))),
        Err(e) => {
            tracing::error!("Manual refresh failed: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": format!("{:#}", e) })),
            )
        }
    }
}

/// Forward the registration form to the backend
pub async fn register(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<BTreeMap<String, String>>,
) -> impl IntoResponse {
    match state.registration.submit(&fields).await {
        Ok(receipt) => (StatusCode::OK, Json(json!(receipt))),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fleet_service::FleetService;
    use crate::application::polling::TracingObserver;
    use crate::application::registration_service::RegistrationService;
    use crate::application::test_support::FakeRepository;
    use crate::infrastructure::page_model::PageModel;
    use axum::body::to_bytes;
    use axum::response::Response;
    use serde_json::Value;

    fn state(repo: Arc<FakeRepository>) -> Arc<AppState> {
        let page = Arc::new(PageModel::new());
        let fleet = Arc::new(FleetService::new(
            repo.clone(),
            page.clone(),
            Arc::new(TracingObserver),
            vec![Metric::Co2, Metric::Airflow],
            Duration::from_secs(30),
        ));
        Arc::new(AppState {
            fleet,
            registration: RegistrationService::new(repo, page.clone()),
            page,
        })
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_then_page_snapshot() {
        let repo = Arc::new(FakeRepository::default());
        repo.push_live(Ok(json!([{ "telemetria_id": 1, "co2_reading": 7, "avl": 60 }])));
        let state = state(repo);

        let response = refresh_now(State(state.clone())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["devices"], 1);

        let page = body_json(page_snapshot(State(state)).await.into_response()).await;
        assert_eq!(page["elements"]["co2_1"]["value"], "7%");
        assert_eq!(page["elements"]["avl_1"]["value"], "60CFM");
    }

    #[tokio::test]
    async fn test_refresh_failure_is_bad_gateway() {
        let repo = Arc::new(FakeRepository::default());
        repo.push_live(Err("connection refused"));

        let response = refresh_now(State(state(repo))).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_polling_status_reports_idle_scheduler() {
        let state = state(Arc::new(FakeRepository::default()));

        let status = body_json(polling_status(State(state)).await.into_response()).await;
        assert_eq!(status["running"], false);
        assert_eq!(status["interval_ms"], Value::Null);
        assert_eq!(status["tracked_metrics"], json!(["co2_reading", "avl"]));
    }

    #[test]
    fn test_interval_millis_saturate() {
        assert_eq!(whole_millis(Duration::from_secs(30)), 30_000);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn test_polling_status_reports_running_interval() {
        let state = state(Arc::new(FakeRepository::default()));
        state.fleet.start_periodic_updates().unwrap();

        let status = body_json(polling_status(State(state.clone())).await.into_response()).await;
        assert_eq!(status["running"], true);
        assert_eq!(status["interval_ms"], 30_000);

        state.fleet.teardown();
    }

    #[tokio::test]
    async fn test_register_returns_receipt() {
        let repo = Arc::new(FakeRepository::default());
        repo.set_registration(Ok(json!({ "msg": "Saved", "icono": "success" })));
        let fields = BTreeMap::from([("name".to_string(), "Reefer 12".to_string())]);

        let response = register(State(state(repo.clone())), Form(fields.clone()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Saved");
        assert_eq!(repo.submitted(), vec![fields]);
    }
}
