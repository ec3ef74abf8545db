//! checkout-relay HTTP Server
//!
//! Axum-based relay between a checkout page and a Telegram operator chat:
//! submitted orders become pending sessions, the operator (or Stripe, via
//! the inline button) attaches a payment link, and the customer's polling
//! browser picks it up and redirects.

mod config;
mod handlers;
mod resolver;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relay_core::{MemorySessionStore, Notifier, PaymentLinkProvider, SessionStore};
use relay_payments::StripeClient;
use relay_telegram::TelegramClient;

use crate::config::ServerConfig;
use crate::resolver::Resolver;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = Arc::new(ServerConfig::from_env());

    // Operator channel
    let telegram = match TelegramClient::from_env() {
        Ok(client) => {
            tracing::info!("✓ Telegram operator channel configured");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("⚠ Telegram not configured - operator alerts disabled ({e})");
            tracing::warn!("  Set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID in .env");
            None
        }
    };
    let notifier = telegram
        .clone()
        .map(|client| client as Arc<dyn Notifier>);

    // Payment provider (optional - manual /paylink still works without it)
    let payments = match StripeClient::from_env() {
        Ok(client) => {
            tracing::info!("✓ Stripe configured");
            Some(Arc::new(client) as Arc<dyn PaymentLinkProvider>)
        }
        Err(e) => {
            tracing::warn!("⚠ Stripe not configured - /genlink disabled ({e})");
            tracing::warn!("  Set STRIPE_SECRET_KEY in .env");
            None
        }
    };
    let payments_configured = payments.is_some();

    // Session store and resolver
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let resolver = Arc::new(Resolver::new(
        store.clone(),
        notifier.clone(),
        payments,
    ));

    // Expiry sweep, independent of request handling
    let sweep_store = store.clone();
    let session_ttl = config.session_ttl;
    let sweep_interval = config.sweep_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.tick().await; // immediate first tick
        loop {
            ticker.tick().await;
            match sweep_store.sweep(session_ttl) {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Swept expired sessions"),
                Err(e) => tracing::error!(error = %e, "Session sweep failed"),
            }
        }
    });

    let state = AppState {
        store,
        notifier,
        resolver,
        telegram,
        payments_configured,
        config: config.clone(),
    };

    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("🚀 checkout-relay running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /                               - Liveness");
    tracing::info!("  GET  /health                         - Health check");
    tracing::info!("  POST /api/submit-customer-info       - Create a session");
    tracing::info!("  GET  /api/check-payment-link/{{id}}    - Poll for the link");
    tracing::info!("  POST /webhook/telegram               - Operator actions");
    tracing::info!("  GET  /set-webhook                    - Register the webhook");

    axum::serve(listener, app).await?;

    Ok(())
}
