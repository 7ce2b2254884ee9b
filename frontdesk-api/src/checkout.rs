use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{parse_id, required, AppError};
use crate::extract::AppJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub appointment_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub url: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub confirmed: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/checkout", post(create_checkout))
        .route("/api/confirm", post(confirm_checkout))
}

/// POST /api/checkout
/// Opens a payment session for a live hold.
async fn create_checkout(
    State(state): State<AppState>,
    AppJson(req): AppJson<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let appointment_id = parse_id(required(req.appointment_id.as_deref(), "appointmentId")?, "appointmentId")?;

    let reservation = state
        .store
        .get_hold(&appointment_id)
        .ok_or_else(|| AppError::NotFoundError(format!("appointment {}", appointment_id)))?;
    if reservation.is_booked() {
        return Err(AppError::ConflictError(format!("appointment {} is already booked", appointment_id)));
    }

    let session = state.payments.create_checkout_session(appointment_id).await?;
    info!("Checkout session {} opened for appointment {}", session.id, appointment_id);

    Ok(Json(CheckoutResponse {
        url: session.url,
        session_id: session.id,
    }))
}

/// POST /api/confirm
/// Redirect path: the customer returns from checkout with a session id.
async fn confirm_checkout(
    State(state): State<AppState>,
    AppJson(req): AppJson<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, AppError> {
    let session_id = required(req.session_id.as_deref(), "sessionId")?;

    let session = state.payments.retrieve_session(session_id).await?;
    let appointment_id = session
        .appointment_id
        .ok_or_else(|| AppError::ValidationError("No appointment in session".to_string()))?;
    if !session.is_paid() {
        return Err(AppError::ValidationError(format!("Session {} is not paid", session.id)));
    }

    let outcome = state.store.confirm_hold(&appointment_id, session.payment_id)?;
    info!("Appointment {} confirmed via redirect ({:?})", appointment_id, outcome);

    Ok(Json(ConfirmResponse { confirmed: true }))
}
