use super::RegistryState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    sheet: String,
    sheet_available: bool,
    uptime_seconds: u64,
}

pub async fn health_check(State(state): State<Arc<RegistryState>>) -> Json<HealthResponse> {
    let sheet_available = state.store.is_available();

    Json(HealthResponse {
        status: if sheet_available {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        sheet: state.store.sheet_name().to_string(),
        sheet_available,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
