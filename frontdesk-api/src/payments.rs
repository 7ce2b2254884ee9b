use async_trait::async_trait;
use frontdesk_core::payment::{CheckoutSession, PaymentAdapter, PaymentEvent, PaymentStatus};
use frontdesk_core::{CoreError, CoreResult};
use uuid::Uuid;

const SESSION_PREFIX: &str = "cs_mock_";

/// Stand-in for the hosted checkout provider. Sessions encode the
/// appointment id in their own id, so no state is kept, and every retrieved
/// session reports as paid.
pub struct MockPaymentAdapter;

#[async_trait]
impl PaymentAdapter for MockPaymentAdapter {
    async fn create_checkout_session(&self, appointment_id: Uuid) -> CoreResult<CheckoutSession> {
        let id = format!("{}{}", SESSION_PREFIX, appointment_id.simple());
        Ok(CheckoutSession {
            url: format!("/success?session_id={}", id),
            id,
            appointment_id: Some(appointment_id),
            payment_status: PaymentStatus::Unpaid,
            payment_id: None,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> CoreResult<CheckoutSession> {
        let appointment_id = session_id
            .strip_prefix(SESSION_PREFIX)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown checkout session: {}", session_id)))?;

        Ok(CheckoutSession {
            id: session_id.to_string(),
            url: format!("/success?session_id={}", session_id),
            appointment_id: Some(appointment_id),
            payment_status: PaymentStatus::Paid,
            payment_id: Some(format!("pi_mock_{}", appointment_id.simple())),
        })
    }

    async fn verify_webhook(&self, raw_body: &str, signature: &str) -> CoreResult<PaymentEvent> {
        if signature.trim().is_empty() {
            return Err(CoreError::ValidationError("Missing webhook signature".to_string()));
        }
        serde_json::from_str(raw_body)
            .map_err(|e| CoreError::ValidationError(format!("Malformed webhook payload: {}", e)))
    }
}
