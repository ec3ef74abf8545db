//! Operator Notification Seam
//!
//! Outbound messages to the fixed operator channel. Implementations live in
//! the integration crates (Telegram today); the server only sees this trait,
//! so tests can record messages instead of hitting the network.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::Session;

/// Operator channel for order alerts and diagnostics
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a human-readable summary of a new session, with an actionable
    /// control keyed by the session id where the channel supports one.
    ///
    /// Best-effort: at most one delivery attempt per session. Callers must
    /// not fail the customer-facing request when this errors.
    async fn notify_new_order(&self, session: &Session) -> Result<()>;

    /// Send a plain message to the operator channel: diagnostics (malformed
    /// command, unknown session, provider failure) and confirmations.
    async fn send_text(&self, text: &str) -> Result<()>;
}
