use anyhow::Context;
use frontdesk_api::{app, payments::MockPaymentAdapter, worker, AppState};
use frontdesk_catalog::SlotCatalog;
use frontdesk_core::{RandomIds, SystemClock};
use frontdesk_store::{app_config::Config, ReservationStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frontdesk_api=debug,frontdesk_store=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Frontdesk API on port {}", config.server.port);

    let clock = Arc::new(SystemClock);
    let ids = Arc::new(RandomIds);
    let catalog = SlotCatalog::for_today(config.catalog.clone(), clock.as_ref(), ids.as_ref());
    tracing::info!("Generated {} bookable slots", catalog.len());

    let store = Arc::new(ReservationStore::new(
        catalog,
        clock,
        ids,
        config.booking.hold_duration(),
    ));

    if let Some(every) = config.booking.sweep_interval() {
        worker::spawn_expiry_sweeper(store.clone(), every);
    }

    let app_state = AppState::new(store, Arc::new(MockPaymentAdapter));
    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
