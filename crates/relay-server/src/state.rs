//! Application State

use std::sync::Arc;

use relay_core::{Notifier, SessionStore};
use relay_telegram::TelegramClient;

use crate::config::ServerConfig;
use crate::resolver::Resolver;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session store (swappable; single instance, single process)
    pub store: Arc<dyn SessionStore>,

    /// Operator channel (None if Telegram is not configured)
    pub notifier: Option<Arc<dyn Notifier>>,

    /// Consumes inbound operator actions
    pub resolver: Arc<Resolver>,

    /// Raw Telegram client for callback acks and webhook registration
    pub telegram: Option<Arc<TelegramClient>>,

    /// Whether a payment provider is wired up
    pub payments_configured: bool,

    /// Environment configuration
    pub config: Arc<ServerConfig>,
}
