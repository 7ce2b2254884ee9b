use axum::{
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use frontdesk_store::ReservationError;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/stripe/webhook", post(handle_payment_webhook))
}

/// POST /api/stripe/webhook
/// Receive checkout completion events from the payment provider
async fn handle_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    raw_body: String,
) -> Result<Json<WebhookAck>, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let event = state.payments.verify_webhook(&raw_body, signature).await?;
    info!("Received webhook: {} ({})", event.type_, event.id);

    if event.is_checkout_completed() {
        match event.data.appointment_id {
            Some(appointment_id) => {
                match state.store.confirm_hold(&appointment_id, event.data.payment_id) {
                    Ok(outcome) => {
                        info!("Appointment {} confirmed via webhook ({:?})", appointment_id, outcome);
                    },
                    // Redelivery cannot bring a lapsed hold back, so acknowledge anyway
                    Err(ReservationError::NotFound(msg)) => {
                        warn!("Webhook {} for unknown or expired {}", event.id, msg);
                    },
                    Err(err) => return Err(err.into()),
                }
            },
            None => warn!("Webhook {} carries no appointment id", event.id),
        }
    }

    Ok(Json(WebhookAck { received: true }))
}
