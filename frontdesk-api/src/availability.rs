use axum::{
    extract::{Query, State},
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use frontdesk_shared::Slot;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityRequest {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub slots: Vec<Slot>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/availability", post(post_availability).get(get_availability))
}

/// POST /api/availability
/// Body: `{ "date": "YYYY-MM-DD" }`, date optional
async fn post_availability(
    State(state): State<AppState>,
    AppJson(req): AppJson<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    open_slots(&state, req)
}

/// GET /api/availability?date=YYYY-MM-DD
async fn get_availability(
    State(state): State<AppState>,
    Query(req): Query<AvailabilityRequest>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    open_slots(&state, req)
}

fn open_slots(state: &AppState, req: AvailabilityRequest) -> Result<Json<AvailabilityResponse>, AppError> {
    let date = match req.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::ValidationError(format!("Invalid date: {}", raw)))?,
        ),
        None => None,
    };

    let slots = state.store.list_open_slots(date);
    debug!("{} open slots (date filter: {:?})", slots.len(), date);

    Ok(Json(AvailabilityResponse { slots }))
}
