use frontdesk_core::payment::PaymentAdapter;
use frontdesk_store::ReservationStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ReservationStore>,
    pub payments: Arc<dyn PaymentAdapter>,
}

impl AppState {
    pub fn new(store: Arc<ReservationStore>, payments: Arc<dyn PaymentAdapter>) -> Self {
        Self { store, payments }
    }
}
