use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use frontdesk_shared::{Customer, HoldReceipt, Reservation, Slot};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{parse_id, required, AppError};
use crate::extract::AppJson;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldRequest {
    pub slot_id: Option<String>,
    pub customer: Option<CustomerInput>,
}

#[derive(Default, Deserialize)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl CustomerInput {
    fn into_customer(self) -> Result<Customer, AppError> {
        let name = required(self.name.as_deref(), "customer name")?;
        let phone = required(self.phone.as_deref(), "customer phone")?;
        let customer = Customer::new(name, phone);

        Ok(match self.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => customer.with_email(email),
            None => customer,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HoldResponse {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub slot: Option<Slot>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/hold", post(create_hold))
        .route("/api/holds/{appointment_id}", get(get_hold))
}

/// POST /api/hold
/// Body: `{ "slotId": "...", "customer": { "name", "phone", "email"? } }`
async fn create_hold(
    State(state): State<AppState>,
    AppJson(req): AppJson<HoldRequest>,
) -> Result<Json<HoldReceipt>, AppError> {
    let slot_id = parse_id(required(req.slot_id.as_deref(), "slotId")?, "slotId")?;
    let customer = req
        .customer
        .ok_or_else(|| AppError::ValidationError("Missing customer".to_string()))?
        .into_customer()?;

    let receipt = state.store.create_hold(slot_id, customer)?;
    info!("Hold {} placed via API", receipt.appointment_id);

    Ok(Json(receipt))
}

/// GET /api/holds/{appointment_id}
async fn get_hold(
    State(state): State<AppState>,
    Path(appointment_id): Path<String>,
) -> Result<Json<HoldResponse>, AppError> {
    let appointment_id = parse_id(&appointment_id, "appointmentId")?;

    let reservation = state
        .store
        .get_hold(&appointment_id)
        .ok_or_else(|| AppError::NotFoundError(format!("appointment {}", appointment_id)))?;
    let slot = state.store.catalog().find(&reservation.slot_id).cloned();

    Ok(Json(HoldResponse { reservation, slot }))
}
