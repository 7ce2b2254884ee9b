use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CoreResult;

/// Provider event type that means the customer finished paying.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

/// A hosted checkout session at the payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String, // Provider's ID (e.g., cs_123)
    pub url: String,
    pub appointment_id: Option<Uuid>,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// A verified webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub data: PaymentEventData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEventData {
    pub appointment_id: Option<Uuid>,
    pub payment_id: Option<String>,
}

impl PaymentEvent {
    pub fn is_checkout_completed(&self) -> bool {
        self.type_ == CHECKOUT_SESSION_COMPLETED
    }
}

/// Boundary to the payment provider. The reservation core never calls this;
/// the HTTP layer does, then relays success into `confirm_hold`.
#[async_trait]
pub trait PaymentAdapter: Send + Sync {
    /// Open a checkout session for a held appointment
    async fn create_checkout_session(&self, appointment_id: Uuid) -> CoreResult<CheckoutSession>;

    /// Look up a session after the customer is redirected back
    async fn retrieve_session(&self, session_id: &str) -> CoreResult<CheckoutSession>;

    /// Check a webhook signature and decode the event
    async fn verify_webhook(&self, raw_body: &str, signature: &str) -> CoreResult<PaymentEvent>;
}
